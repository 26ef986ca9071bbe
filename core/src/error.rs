use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Cannot read {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;
