//! HTTP surface: `POST /analyze/` and `GET /health`.

use crate::analysis::AnalysisResult;
use crate::core::{AnalysisError, ServerConfig};
use crate::pipelines::sentiment::{LocalAnalyzer, SentimentAnalysisPipelineBuilder};
use crate::pipelines::utils::{DeviceRequest, DeviceSelectable};
use crate::remote::{GroqClient, RemoteAnalyzer};
use crate::router::SentimentRouter;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Wire format of an analysis request.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequestBody {
    pub text: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub local_model_loaded: bool,
    pub remote_configured: bool,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AnalysisError::InvalidArgument(_) => {
                (StatusCode::BAD_REQUEST, "Invalid model specified".to_string())
            }
            AnalysisError::MalformedRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            AnalysisError::MissingCredential => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
        };

        if self.is_client_error() {
            info!(error = %self, "rejected request");
        } else {
            warn!(error = %self, "request failed");
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}

async fn analyze(
    State(router): State<Arc<SentimentRouter>>,
    payload: Result<Json<AnalyzeRequestBody>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AnalysisError> {
    let Json(body) = payload.map_err(|e| AnalysisError::MalformedRequest(e.body_text()))?;
    let result = router.analyze_raw(body.text, &body.model).await?;
    Ok(Json(result))
}

async fn health(State(router): State<Arc<SentimentRouter>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        local_model_loaded: router.local().is_loaded(),
        remote_configured: router.remote().has_credential(),
    })
}

/// CORS for the listed origins with credentials. Methods and headers are
/// mirrored from the preflight since wildcards are not allowed alongside
/// credentials.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim())
                .map_err(|e| anyhow::anyhow!("invalid CORS origin {origin:?}: {e}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn app(router: Arc<SentimentRouter>, cors_origins: &[String]) -> anyhow::Result<Router> {
    Ok(Router::new()
        .route("/analyze/", post(analyze))
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(router))
}

/// Load both backends from configuration.
pub async fn build_router(config: &ServerConfig) -> anyhow::Result<SentimentRouter> {
    let local = if config.skip_local_model {
        info!("local classifier disabled by configuration");
        LocalAnalyzer::unavailable()
    } else {
        let builder = SentimentAnalysisPipelineBuilder::distilbert(&config.model_repo)
            .revision(&config.revision);
        let builder = match config.device_request() {
            DeviceRequest::Cuda(index) => builder.cuda_device(index),
            DeviceRequest::Cpu => builder.cpu(),
            DeviceRequest::Default => builder,
        };
        builder.build_analyzer().await
    };

    let remote_config = config.remote_config();
    let credential = config.credential();
    if credential.is_none() {
        warn!("GROQ_API_KEY is not set, llama requests will fail with 503");
    }
    let client = GroqClient::new(&remote_config)?;
    let remote = RemoteAnalyzer::new(Arc::new(client), credential, remote_config)?;

    Ok(SentimentRouter::new(local, remote))
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let router = Arc::new(build_router(&config).await?);
    let app = app(router, &config.cors_origins)?;

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}
