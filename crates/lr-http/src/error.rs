//! エラー型定義 (lr-http)

use thiserror::Error;

/// lr-http のエラー型
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Response body already consumed")]
    BodyConsumed,
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let target = err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "unknown url".to_string());
            HttpError::Timeout(target)
        } else {
            HttpError::Transport(err)
        }
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, HttpError>;
