use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Row has {got} values but table has {expected} columns")]
    ColumnMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
