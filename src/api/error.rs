use thiserror::Error;

/// Everything that can go wrong between a widget and the backend.
///
/// The `Display` text is what ends up in a widget's inline warning, so it is
/// kept short and free of internals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never completed (offline, DNS, CORS, ...).
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Request failed with status code {status}")]
    Status { status: u16, message: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    /// The transport handed back a response without a readable body stream.
    #[error("No response body (SSE not supported?)")]
    MissingBody,
    #[error("Request aborted")]
    Aborted,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Where the app goes when the dashboard configuration can't be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFailure {
    Unauthorized,
    ServerError,
    Other,
}

impl ConfigFailure {
    pub fn from_error(error: &ApiError) -> Self {
        match error.status() {
            Some(401) => ConfigFailure::Unauthorized,
            Some(500) => ConfigFailure::ServerError,
            _ => ConfigFailure::Other,
        }
    }

    pub fn redirect_path(&self) -> &'static str {
        match self {
            ConfigFailure::Unauthorized => "/login",
            ConfigFailure::ServerError => "/500",
            ConfigFailure::Other => "/not-found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> ApiError {
        ApiError::Status {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn test_config_failure_routes() {
        assert_eq!(ConfigFailure::from_error(&status(401)).redirect_path(), "/login");
        assert_eq!(ConfigFailure::from_error(&status(500)).redirect_path(), "/500");
        assert_eq!(ConfigFailure::from_error(&status(404)).redirect_path(), "/not-found");
        assert_eq!(
            ConfigFailure::from_error(&ApiError::Transport("offline".into())).redirect_path(),
            "/not-found"
        );
    }

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(status(503).to_string(), "Request failed with status code 503");
        assert_eq!(
            ApiError::MissingBody.to_string(),
            "No response body (SSE not supported?)"
        );
        assert!(status(409).is_conflict());
        assert!(!ApiError::Aborted.is_conflict());
    }
}
