/// Errors raised while loading config and sprite assets.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShooterError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize config")]
    ConfigSerialize(#[source] ron::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A sprite file contained no solid cells.
    #[error("sprite '{name}' is empty")]
    EmptySprite { name: String },
}

pub type Result<T> = std::result::Result<T, ShooterError>;
