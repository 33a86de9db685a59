use thiserror::Error;

#[derive(Error, Debug)]
pub enum EbrError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Credential resolution failed: {0}")]
    CredentialResolution(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Service error (HTTP {status}) {code}: {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Failed to parse service response: {0}")]
    ResponseParsing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for EbrError {
    fn from(err: reqwest::Error) -> Self {
        EbrError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EbrError>;
