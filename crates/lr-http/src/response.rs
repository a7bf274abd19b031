//! HTTP response abstraction
//!
//! [`HttpResponse`] is the read-only view the rest of the workspace works
//! against; [`ReqwestHttpResponse`] is the production implementation.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde_json::Value;

use crate::chunks::{ContentChunks, TextChunks};
use crate::error::{HttpError, Result};

/// Read-only view over a received HTTP response.
///
/// Status and headers are available as soon as the response exists. Body
/// views are lazy: on a streamed response the body is only pulled from the
/// network when one of them is first evaluated.
#[async_trait]
pub trait HttpResponse: Send + Sized + 'static {
    /// HTTP status code
    fn status_code(&self) -> u16;

    /// Response headers
    fn headers(&self) -> &HeaderMap;

    /// Whether the status is 2xx
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code())
    }

    /// Raw, undecoded body bytes.
    async fn content(&mut self) -> Result<Bytes>;

    /// Body decoded with the charset declared in `Content-Type`.
    async fn text(&mut self) -> Result<String> {
        let body = self.content().await?;
        Ok(decode_text(self.headers(), &body))
    }

    /// Body parsed as JSON.
    ///
    /// # Errors
    /// [`HttpError::MalformedBody`] when the body is not valid JSON.
    async fn json(&mut self) -> Result<Value> {
        let body = self.content().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Consume the response and walk its body in chunks of at most
    /// `chunk_size` bytes.
    fn iter_content(self, chunk_size: usize) -> ContentChunks;

    /// Like [`HttpResponse::iter_content`], decoding the chunks as UTF-8.
    fn iter_text(self, chunk_size: usize) -> TextChunks {
        self.iter_content(chunk_size).decode_unicode()
    }
}

enum Body {
    Buffered(Bytes),
    Streaming(reqwest::Response),
    /// A streamed read failed part-way
    Consumed,
}

/// [`HttpResponse`] backed by a reqwest response
pub struct ReqwestHttpResponse {
    status: u16,
    headers: HeaderMap,
    body: Body,
}

impl ReqwestHttpResponse {
    /// Wrap a reqwest response. Unless `stream` is set the whole body is
    /// read before this returns.
    pub(crate) async fn receive(response: reqwest::Response, stream: bool) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();

        let body = if stream {
            Body::Streaming(response)
        } else {
            Body::Buffered(response.bytes().await?)
        };

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Whether the body is still on the wire.
    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Streaming(_))
    }
}

#[async_trait]
impl HttpResponse for ReqwestHttpResponse {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    async fn content(&mut self) -> Result<Bytes> {
        match std::mem::replace(&mut self.body, Body::Consumed) {
            Body::Buffered(bytes) => {
                self.body = Body::Buffered(bytes.clone());
                Ok(bytes)
            }
            Body::Streaming(response) => {
                let bytes = response.bytes().await?;
                self.body = Body::Buffered(bytes.clone());
                Ok(bytes)
            }
            Body::Consumed => Err(HttpError::BodyConsumed),
        }
    }

    fn iter_content(self, chunk_size: usize) -> ContentChunks {
        match self.body {
            Body::Buffered(bytes) => ContentChunks::from_bytes(bytes, chunk_size),
            Body::Streaming(response) => ContentChunks::new(
                response
                    .bytes_stream()
                    .map(|chunk| chunk.map_err(HttpError::from))
                    .boxed(),
                chunk_size,
            ),
            Body::Consumed => ContentChunks::new(
                stream::once(async { Err(HttpError::BodyConsumed) }).boxed(),
                chunk_size,
            ),
        }
    }
}

impl std::fmt::Debug for ReqwestHttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpResponse")
            .field("status", &self.status)
            .field("streaming", &self.is_streaming())
            .finish()
    }
}

/// Charset parameter of the `Content-Type` header, if any.
pub fn charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// Decode a body according to its declared charset.
///
/// Latin-1 is mapped byte-for-byte; every other charset, declared or not,
/// is decoded as UTF-8 with invalid sequences replaced.
pub fn decode_text(headers: &HeaderMap, body: &[u8]) -> String {
    match charset(headers) {
        Some(cs)
            if cs.eq_ignore_ascii_case("iso-8859-1")
                || cs.eq_ignore_ascii_case("latin1")
                || cs.eq_ignore_ascii_case("latin-1") =>
        {
            body.iter().map(|&b| b as char).collect()
        }
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_charset_parsing() {
        assert_eq!(
            charset(&headers_with("text/plain; charset=utf-8")),
            Some("utf-8".to_string())
        );
        assert_eq!(
            charset(&headers_with("text/html;Charset=\"ISO-8859-1\"")),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(charset(&headers_with("application/json")), None);
        assert_eq!(charset(&HeaderMap::new()), None);
    }

    #[test]
    fn test_decode_text_latin1() {
        let headers = headers_with("text/plain; charset=iso-8859-1");
        assert_eq!(decode_text(&headers, b"caf\xe9"), "café");
    }

    #[test]
    fn test_decode_text_defaults_to_utf8() {
        assert_eq!(decode_text(&HeaderMap::new(), "café".as_bytes()), "café");
        assert_eq!(decode_text(&HeaderMap::new(), b"bad\xff"), "bad\u{FFFD}");
    }
}
