use thiserror::Error;

#[derive(Debug, Error)]
pub enum FanoutError {
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("unknown target: {0}")]
    UnknownTarget(String),

    #[error("unknown request: {0}")]
    UnknownRequest(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("pod resolution failed for target '{target}': {reason}")]
    Resolution { target: String, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FanoutError>;
