use rmcp::model::{ErrorCode, ErrorData};

/// Errors raised by the Forge API client and server setup.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// The Forge API answered with a non-success status. The body is kept verbatim.
    #[error("HTTP {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<ForgeError> for ErrorData {
    fn from(err: ForgeError) -> Self {
        let code = match &err {
            ForgeError::UnknownTool(_) => ErrorCode::INVALID_PARAMS,
            ForgeError::Config(_) => ErrorCode::INVALID_PARAMS,
            _ => ErrorCode::INTERNAL_ERROR,
        };
        ErrorData::new(code, err.to_string(), None)
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
