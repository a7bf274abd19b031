//! エラー型定義 (lr-line)

use thiserror::Error;

use lr_http::HttpError;

/// lr-line のエラー型
#[derive(Error, Debug)]
pub enum LineError {
    #[error("LINE API error: {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Upload image failure: status {status} (placeholder message {message_id})")]
    UploadFailed { status: u16, message_id: String },

    #[error("Download image failure: status {status} from {url}")]
    DownloadFailed { status: u16, url: String },

    #[error("Response is missing field: {0}")]
    MissingField(&'static str),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, LineError>;
