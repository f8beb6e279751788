use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Unknown country code: {0}")]
    UnknownCountry(String),

    #[error("Unknown app id: {0}")]
    UnknownApp(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
