use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("annealing requires a non-empty initial grid mapping")]
    EmptyInitialMapping,

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
