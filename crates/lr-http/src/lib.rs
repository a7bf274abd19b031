//! lr-http: HTTP transport layer for line-relay
//!
//! ドメインクライアントとネットワーク実装を切り離すための
//! トランスポート抽象 (`HttpClient`) とレスポンス抽象 (`HttpResponse`) を提供します。

pub mod chunks;
pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod timeout;

pub use chunks::{ContentChunks, DEFAULT_CHUNK_SIZE, TextChunks};
pub use client::{HttpClient, ReqwestHttpClient};
pub use error::{HttpError, Result};
pub use request::{FilePart, MultipartForm, Params, RequestBody};
pub use response::{HttpResponse, ReqwestHttpResponse};
pub use timeout::Timeout;

/// Header types used in the transport signatures
pub use reqwest::header;
