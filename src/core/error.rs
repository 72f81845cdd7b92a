use thiserror::Error;

/// Failures that reach the caller of the router.
///
/// Backend failures (model not loaded, remote call failed) are not errors:
/// the analyzers absorb them into the neutral fallback result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The backend selector is not one of the supported models.
    #[error("invalid model specified: {0:?}")]
    InvalidArgument(String),

    /// The request body could not be decoded.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The remote backend was selected but no API key is configured.
    #[error("remote service API key is not configured")]
    MissingCredential,
}

impl AnalysisError {
    /// True for errors caused by the caller rather than the deployment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidArgument(_) | AnalysisError::MalformedRequest(_)
        )
    }
}
