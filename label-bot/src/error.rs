//! Bot error types

use label_sheet::LabelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// Network or decoding failure talking to the Bot API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bot API answered `ok: false`
    #[error("Telegram API error ({method}): {description}")]
    Api {
        method: &'static str,
        description: String,
    },

    /// Label sheet could not be produced
    #[error(transparent)]
    Label(#[from] LabelError),

    /// Background generation task panicked or was cancelled
    #[error("generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BotResult<T> = Result<T, BotError>;
