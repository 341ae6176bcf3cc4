use thiserror::Error;

#[derive(Error, Debug)]
pub enum WakeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("Extra material attribute not found: {0}")]
    ExtraNotFound(String),

    #[error("Wake potential source dropped: {0}")]
    WakeSourceDropped(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type WakeResult<T> = Result<T, WakeError>;
