//! HTTP transport
//!
//! [`HttpClient`] is the seam between domain clients and the network;
//! [`ReqwestHttpClient`] implements it with reqwest.

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::error::{HttpError, Result};
use crate::request::{Params, RequestBody};
use crate::response::{HttpResponse, ReqwestHttpResponse};
use crate::timeout::Timeout;

/// Transport contract for issuing GET/POST requests.
///
/// Each call returns once the response headers (and, for non-streamed
/// requests, the whole body) have arrived, or fails. No retries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    type Response: HttpResponse;

    /// Default timeout used when a call does not pass one
    fn timeout(&self) -> Timeout;

    /// Explicit timeout if given, otherwise the instance default
    fn effective_timeout(&self, explicit: Option<Timeout>) -> Timeout {
        explicit.unwrap_or_else(|| self.timeout())
    }

    /// GET request
    ///
    /// # Arguments
    /// * `headers` - request headers, sent unmodified
    /// * `params` - query parameters, appended in order
    /// * `stream` - defer reading the body until the caller asks for it
    /// * `timeout` - per-call override of the default timeout
    async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &Params,
        stream: bool,
        timeout: Option<Timeout>,
    ) -> Result<Self::Response>;

    /// POST request
    async fn post(
        &self,
        url: &str,
        headers: &HeaderMap,
        data: Option<RequestBody>,
        timeout: Option<Timeout>,
    ) -> Result<Self::Response>;
}

/// Reject empty target URLs before touching the network.
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(HttpError::InvalidRequest("url must not be empty".to_string()));
    }
    Ok(())
}

/// [`HttpClient`] implemented with reqwest
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    timeout: Timeout,
}

impl ReqwestHttpClient {
    /// Create a client with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Timeout::default())
    }

    /// Create a client with the given default timeout
    pub fn with_timeout(timeout: Timeout) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            timeout,
        })
    }

    /// Engine client for a call. Overrides get a dedicated client so the
    /// shared one keeps its configuration.
    fn client_for(&self, timeout: Timeout) -> Result<Cow<'_, Client>> {
        if timeout == self.timeout {
            Ok(Cow::Borrowed(&self.client))
        } else {
            Ok(Cow::Owned(build_client(timeout)?))
        }
    }
}

impl std::fmt::Debug for ReqwestHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpClient")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn build_client(timeout: Timeout) -> Result<Client> {
    Client::builder()
        .connect_timeout(timeout.connect())
        .read_timeout(timeout.read())
        .build()
        .map_err(HttpError::Transport)
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    type Response = ReqwestHttpResponse;

    fn timeout(&self) -> Timeout {
        self.timeout
    }

    async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
        params: &Params,
        stream: bool,
        timeout: Option<Timeout>,
    ) -> Result<ReqwestHttpResponse> {
        validate_url(url)?;
        let timeout = self.effective_timeout(timeout);
        let client = self.client_for(timeout)?;

        debug!(url, stream, params = params.len(), ?timeout, "GET");

        let response = client
            .get(url)
            .headers(headers.clone())
            .query(params)
            .send()
            .await?;

        ReqwestHttpResponse::receive(response, stream).await
    }

    async fn post(
        &self,
        url: &str,
        headers: &HeaderMap,
        data: Option<RequestBody>,
        timeout: Option<Timeout>,
    ) -> Result<ReqwestHttpResponse> {
        validate_url(url)?;
        let timeout = self.effective_timeout(timeout);
        let client = self.client_for(timeout)?;

        debug!(
            url,
            body = data.as_ref().map(RequestBody::kind).unwrap_or("none"),
            ?timeout,
            "POST"
        );

        let mut request = client.post(url).headers(headers.clone());
        request = match data {
            None => request,
            Some(RequestBody::Bytes(bytes)) => request.body(bytes),
            Some(RequestBody::Text(text)) => request.body(text),
            Some(RequestBody::Form(pairs)) => request.form(&pairs),
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Multipart(form)) => request.multipart(form.into_reqwest()?),
        };

        let response = request.send().await?;

        ReqwestHttpResponse::receive(response, false).await
    }
}
