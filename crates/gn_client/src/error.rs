use gn_core::ErrorPayload;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The proxy answered with a non-success status.
    #[error("{message}")]
    Proxy {
        status: u16,
        error: String,
        message: String,
    },

    /// The proxy could not be reached or its answer could not be read.
    #[error("{0}")]
    Network(String),
}

impl ClientError {
    pub fn from_payload(status: u16, payload: Option<ErrorPayload>) -> Self {
        let (error, message) = match payload {
            Some(payload) => (payload.error, payload.message),
            None => (format!("API error: {}", status), None),
        };
        ClientError::Proxy {
            status,
            error,
            message: message.unwrap_or_else(|| "Failed to fetch news".to_string()),
        }
    }

    /// Missing or rejected credentials, which get a dedicated screen
    /// instead of an inline error.
    pub fn is_api_key_error(&self) -> bool {
        match self {
            ClientError::Proxy { status, error, message } => {
                *status == 401 || message.contains("API key") || error.contains("authentication")
            }
            ClientError::Network(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}
