use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Storage connection error: {0}")]
    Connection(String),

    #[error("Experiment not found: {0}")]
    ExperimentNotFound(String),

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] expscope_core::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
