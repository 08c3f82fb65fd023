use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("expected FIELD=VALUE, got '{0}'")]
    InvalidAssignment(String),
    #[error("unknown stage '{0}'")]
    UnknownStage(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
