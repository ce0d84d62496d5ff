use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No credential was configured for the upstream provider.
    #[error("News API key is missing. Set NEWS_API_KEY (preferred) or NEXT_PUBLIC_NEWS_API_KEY in your environment variables.")]
    MissingApiKey,

    /// The upstream provider rejected the credential.
    #[error("Invalid API key. Please check your News API key configuration.")]
    Authentication,

    #[error("API error: {status}")]
    Upstream { status: u16 },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server itself is misconfigured, e.g. an unusable upstream base URL.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Errors caused by the caller's input rather than the server or upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter(_) | Error::InvalidParameter(_) | Error::InvalidUrl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
