use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Group {group:?} has no data in column {column:?}")]
    GroupNotFound { column: String, group: String },

    #[error(transparent)]
    Core(#[from] expscope_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
