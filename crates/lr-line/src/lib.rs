//! lr-line: LINE talk client for line-relay
//!
//! LINE のトーク API を RPC として呼び出すクライアントです。
//! 画像送信 (ローカルファイル / URL) はプレースホルダー送信とアップロードの二段階で行います。

pub mod api;
pub mod config;
pub mod contact;
pub mod error;
pub mod group;
pub mod media;
pub mod types;

#[cfg(test)]
mod mock;

pub use api::{LineApiClient, default_headers};
pub use config::{Config, HttpConfig, LineConfig};
pub use error::{LineError, Result};
pub use media::UPLOAD_CREATED;
pub use types::*;
