use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while talking to the listings API
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid response from server")]
    InvalidResponse,

    #[error("HTTP status error ({0})")]
    HttpStatus(u16),

    #[error("failed to decode listings: {0}")]
    Decoding(String),

    #[error("network error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl NetworkError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        NetworkError::Transport(Box::new(err))
    }
}

/// Failures raised while reading the bundled dataset
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("bundled resource not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed bundled resource {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures raised while persisting favorites
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("failed to write favorites to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),
}
