use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("invalid load policy: {0:?}")]
    InvalidPolicy(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("database error")]
    Database(#[from] sqlx::Error),
    #[error("store error: {0}")]
    Store(String),
}
