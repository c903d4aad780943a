use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Rate limit exceeded for client: {client_id}")]
    RateLimited { client_id: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GateError>;
