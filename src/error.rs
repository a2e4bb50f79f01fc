use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Bitbucket API returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("No pipeline runs found")]
    EmptyResult,

    #[error("Failed to decode pipeline response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ObserverError {
    /// Short label for the failure class, used in fallback log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport failure",
            Self::Upstream { .. } => "upstream error",
            Self::EmptyResult => "empty result",
            Self::Decode(_) => "decode failure",
            Self::Config(_) => "configuration error",
        }
    }
}

pub type Result<T> = std::result::Result<T, ObserverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message_includes_status() {
        let err = ObserverError::Upstream {
            status: 404,
            message: "Not Found".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Bitbucket API returned status 404: Not Found"
        );
        assert_eq!(err.kind(), "upstream error");
    }

    #[test]
    fn test_decode_error_converts_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ObserverError = json_err.into();

        assert!(matches!(err, ObserverError::Decode(_)));
        assert_eq!(err.kind(), "decode failure");
    }
}
