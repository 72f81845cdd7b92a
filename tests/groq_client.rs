use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use secrecy::SecretString;
use sentiment_server::core::Message;
use sentiment_server::remote::{ChatCompletion, ChatCompletionError, ChatRequest, GroqClient};
use sentiment_server::{AnalysisResult, RemoteAnalyzer, RemoteConfig, Sentiment};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const API_KEY: &str = "gsk_test";

type Seen = Arc<Mutex<Vec<(String, Value)>>>;

/// Serves `app` on an ephemeral port and returns the completion URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/openai/v1/chat/completions")
}

fn config(url: String, timeout: Duration) -> RemoteConfig {
    RemoteConfig {
        url,
        timeout,
        ..RemoteConfig::default()
    }
}

fn analyzer(config: RemoteConfig) -> RemoteAnalyzer {
    let client = GroqClient::new(&config).unwrap();
    RemoteAnalyzer::new(
        Arc::new(client),
        Some(SecretString::new(API_KEY.to_string())),
        config,
    )
    .unwrap()
}

fn request(config: &RemoteConfig) -> ChatRequest {
    ChatRequest::new(config, vec![Message::user("how was it?")])
}

fn completion(content: Value) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn record_and_reply(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    seen.lock().unwrap().push((auth, body));
    Json(completion(json!("Negative, 0.81")))
}

#[tokio::test]
async fn successful_reply_is_parsed() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/openai/v1/chat/completions", post(record_and_reply))
        .with_state(seen.clone());
    let url = serve(app).await;

    let result = analyzer(config(url, Duration::from_secs(5)))
        .analyze("the ending ruined it")
        .await
        .unwrap();
    assert_eq!(result, AnalysisResult::new(Sentiment::Negative, 0.81));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth, &format!("Bearer {API_KEY}"));
    assert_eq!(body["model"], "llama-3.3-70b-versatile");
    assert_eq!(body["max_completion_tokens"], 20);
    assert_eq!(body["temperature"], 1.0);
    assert_eq!(body["top_p"], 1.0);
    assert_eq!(body["stream"], false);
    assert!(body.get("stop").is_none());
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");
    assert!(body["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("'the ending ruined it'"));
}

#[tokio::test]
async fn empty_choices_is_missing_content() {
    let app = Router::new().route(
        "/openai/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let config = config(serve(app).await, Duration::from_secs(5));

    let err = GroqClient::new(&config)
        .unwrap()
        .complete(API_KEY, &request(&config))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatCompletionError::MissingContent));

    let result = analyzer(config).analyze("anything").await.unwrap();
    assert_eq!(result, AnalysisResult::neutral());
}

#[tokio::test]
async fn null_content_is_missing_content() {
    let app = Router::new().route(
        "/openai/v1/chat/completions",
        post(|| async { Json(completion(Value::Null)) }),
    );
    let config = config(serve(app).await, Duration::from_secs(5));

    let err = GroqClient::new(&config)
        .unwrap()
        .complete(API_KEY, &request(&config))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatCompletionError::MissingContent));
}

#[tokio::test]
async fn error_status_is_absorbed() {
    let app = Router::new().route(
        "/openai/v1/chat/completions",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "message": "Invalid API Key" } })),
            )
        }),
    );
    let config = config(serve(app).await, Duration::from_secs(5));

    let err = GroqClient::new(&config)
        .unwrap()
        .complete(API_KEY, &request(&config))
        .await
        .unwrap_err();
    match err {
        ChatCompletionError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid API Key"));
        }
        other => panic!("expected an API error, got {other:?}"),
    }

    let result = analyzer(config).analyze("anything").await.unwrap();
    assert_eq!(result, AnalysisResult::neutral());
}

#[tokio::test]
async fn slow_service_times_out() {
    let app = Router::new().route(
        "/openai/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(completion(json!("positive 0.9")))
        }),
    );
    let config = config(serve(app).await, Duration::from_secs(1));

    let err = GroqClient::new(&config)
        .unwrap()
        .complete(API_KEY, &request(&config))
        .await
        .unwrap_err();
    match err {
        ChatCompletionError::Http(e) => assert!(e.is_timeout()),
        other => panic!("expected a timeout, got {other:?}"),
    }

    let result = analyzer(config).analyze("anything").await.unwrap();
    assert_eq!(result, AnalysisResult::neutral());
}
