//! In-memory transport for tests
//!
//! Records every request and answers through a caller-supplied closure.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use serde_json::Value;

use lr_http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use lr_http::{ContentChunks, HttpClient, HttpError, HttpResponse, Params, RequestBody, Timeout};

/// Canned response
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    headers: HeaderMap,
    /// `None` makes every body read fail
    body: Option<Bytes>,
}

impl MockResponse {
    pub fn bytes(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Some(body.into()),
        }
    }

    /// Response whose body cannot be read
    pub fn failing_body(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn json(status: u16, value: Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            status,
            headers,
            body: Some(Bytes::from(value.to_string())),
        }
    }
}

#[async_trait]
impl HttpResponse for MockResponse {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    async fn content(&mut self) -> lr_http::Result<Bytes> {
        self.body.clone().ok_or(HttpError::BodyConsumed)
    }

    fn iter_content(self, chunk_size: usize) -> ContentChunks {
        match self.body {
            Some(body) => ContentChunks::from_bytes(body, chunk_size),
            None => ContentChunks::new(
                stream::once(async { Err(HttpError::BodyConsumed) }).boxed(),
                chunk_size,
            ),
        }
    }
}

/// A request as the transport saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: HeaderMap,
    pub params: Vec<(String, String)>,
    pub stream: bool,
    pub body: Option<RequestBody>,
    pub timeout: Option<Timeout>,
}

type Responder = Box<dyn Fn(&RecordedRequest) -> lr_http::Result<MockResponse> + Send + Sync>;

/// Recording [`HttpClient`] test double
pub struct MockHttp {
    requests: Mutex<Vec<RecordedRequest>>,
    responder: Responder,
}

impl MockHttp {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> lr_http::Result<MockResponse> + Send + Sync + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Every request so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose URL ends with `suffix`
    pub fn count(&self, suffix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .count()
    }

    fn handle(&self, request: RecordedRequest) -> lr_http::Result<MockResponse> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    type Response = MockResponse;

    fn timeout(&self) -> Timeout {
        Timeout::default()
    }

    async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &Params,
        stream: bool,
        timeout: Option<Timeout>,
    ) -> lr_http::Result<MockResponse> {
        lr_http::client::validate_url(url)?;
        self.handle(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            headers: headers.clone(),
            params: params.to_vec(),
            stream,
            body: None,
            timeout,
        })
    }

    async fn post(
        &self,
        url: &str,
        headers: &HeaderMap,
        data: Option<RequestBody>,
        timeout: Option<Timeout>,
    ) -> lr_http::Result<MockResponse> {
        lr_http::client::validate_url(url)?;
        self.handle(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            headers: headers.clone(),
            params: Vec::new(),
            stream: false,
            body: data,
            timeout,
        })
    }
}
