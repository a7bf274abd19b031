//! LINE talk API client
//!
//! Every domain action is one RPC: `POST {talk_url}/{method}` with a JSON
//! argument object. The result is handed back as the server sent it.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use lr_http::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use lr_http::{HttpClient, HttpResponse, ReqwestHttpClient, RequestBody};

use crate::config::{Config, DEFAULT_UPLOAD_URL, LineConfig};
use crate::error::{LineError, Result};
use crate::types::*;

/// LINE talk API client
///
/// Owns its transport, the headers sent with every talk and upload request,
/// the endpoint URLs and the directory used to stage downloaded media.
pub struct LineApiClient<C: HttpClient = ReqwestHttpClient> {
    http: C,
    headers: HeaderMap,
    talk_url: String,
    upload_url: String,
    staging_dir: PathBuf,
}

impl LineApiClient<ReqwestHttpClient> {
    /// Create a client with a reqwest transport from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let http = ReqwestHttpClient::with_timeout(config.http.timeout()?)?;
        let headers = default_headers(&config.line)?;

        let mut client = Self::new(http, headers, &config.line.talk_url)
            .with_upload_url(&config.line.upload_url);
        if let Some(dir) = &config.line.staging_dir {
            client = client.with_staging_dir(dir);
        }
        Ok(client)
    }
}

impl<C: HttpClient> LineApiClient<C> {
    /// Create a new client over the given transport
    pub fn new(http: C, headers: HeaderMap, talk_url: impl Into<String>) -> Self {
        Self {
            http,
            headers,
            talk_url: talk_url.into(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Set the media upload endpoint
    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    /// Set the directory downloaded media is staged in
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn talk_url(&self) -> &str {
        &self.talk_url
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.talk_url.trim_end_matches('/'), method)
    }

    /// Issue one talk RPC and return its raw result.
    ///
    /// An empty body is a void result and comes back as `Value::Null`.
    pub async fn call(&self, method: &str, args: Value) -> Result<Value> {
        let url = self.method_url(method);

        debug!("Calling talk method: {}", method);

        let mut response = self
            .http
            .post(&url, &self.headers, Some(RequestBody::Json(args)), None)
            .await?;

        let status = response.status_code();
        if !response.is_success() {
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!("{} failed: {} (error body unreadable: {})", method, status, e);
                    String::new()
                }
            };
            error!("{} failed: {} - {}", method, status, error_text);
            return Err(LineError::Api {
                status,
                message: error_text,
            });
        }

        let body = response.content().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        Ok(response.json().await?)
    }

    /// Issue one talk RPC and decode its result.
    pub(crate) async fn call_as<T: DeserializeOwned>(&self, method: &str, args: Value) -> Result<T> {
        let value = self.call(method, args).await?;
        serde_json::from_value(value)
            .map_err(|e| LineError::ParseError(format!("{}: {}", method, e)))
    }

    /// Issue one talk RPC whose result carries no data.
    pub(crate) async fn call_unit(&self, method: &str, args: Value) -> Result<()> {
        self.call(method, args).await.map(|_| ())
    }

    // User

    /// Get the profile of the logged-in account
    pub async fn get_profile(&self) -> Result<Profile> {
        self.call_as("getProfile", json!({})).await
    }

    pub async fn get_settings(&self) -> Result<Settings> {
        self.call_as("getSettings", json!({})).await
    }

    pub async fn get_user_ticket(&self) -> Result<Ticket> {
        self.call_as("getUserTicket", json!({})).await
    }

    pub async fn update_profile(&self, profile: &Profile) -> Result<()> {
        self.call_unit("updateProfile", json!({"reqSeq": 0, "profile": profile}))
            .await
    }

    pub async fn update_settings(&self, settings: &Settings) -> Result<()> {
        self.call_unit("updateSettings", json!({"reqSeq": 0, "settings": settings}))
            .await
    }

    // Operation

    /// Fetch up to `count` operations after `revision`
    pub async fn fetch_operations(&self, revision: i64, count: i32) -> Result<Vec<Operation>> {
        self.call_as("fetchOperations", json!({"localRev": revision, "count": count}))
            .await
    }

    pub async fn get_last_op_revision(&self) -> Result<i64> {
        self.call_as("getLastOpRevision", json!({})).await
    }

    // Message

    pub async fn send_event(&self, message: &Message) -> Result<Message> {
        self.call_as("sendEvent", json!({"seq": 0, "message": message}))
            .await
    }

    /// Send a message; the returned copy carries the server-issued id
    pub async fn send_message(&self, message: &Message) -> Result<Message> {
        self.call_as("sendMessage", json!({"seq": 0, "message": message}))
            .await
    }

    pub async fn get_last_read_message_ids(&self, chat_id: &str) -> Result<LastReadMessageIds> {
        self.call_as("getLastReadMessageIds", json!({"syncReason": 0, "chatId": chat_id}))
            .await
    }

    pub async fn noop(&self) -> Result<()> {
        self.call_unit("noop", json!({})).await
    }
}

/// Headers sent with every talk and upload request
pub fn default_headers(config: &LineConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
        .map_err(|e| LineError::Config(format!("Invalid access token: {}", e)))?;
    headers.insert(AUTHORIZATION, auth);

    let agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| LineError::Config(format!("Invalid user agent: {}", e)))?;
    headers.insert(USER_AGENT, agent);

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockHttp, MockResponse};
    use lr_http::HttpError;

    fn client(mock: MockHttp) -> LineApiClient<MockHttp> {
        let mut headers = HeaderMap::new();
        headers.insert("x-line-access", HeaderValue::from_static("secret"));
        LineApiClient::new(mock, headers, "http://talk.test/S4/")
    }

    #[test]
    fn test_api_client_from_config() {
        let mut config = Config::default();
        config.line.access_token = "test-token".to_string();
        config.line.talk_url = "https://talk.example.com".to_string();

        let client = LineApiClient::from_config(&config).unwrap();
        assert_eq!(client.upload_url(), DEFAULT_UPLOAD_URL);
        assert_eq!(client.headers()[AUTHORIZATION], "Bearer test-token");
        assert!(client.headers().contains_key(USER_AGENT));
    }

    #[test]
    fn test_api_client_from_config_requires_token() {
        let config = Config::default();
        assert!(matches!(
            LineApiClient::from_config(&config),
            Err(LineError::Config(_))
        ));
    }

    #[test]
    fn test_default_headers_reject_invalid_token() {
        let config = LineConfig {
            access_token: "bad\ntoken".to_string(),
            ..Default::default()
        };
        assert!(matches!(default_headers(&config), Err(LineError::Config(_))));
    }

    #[tokio::test]
    async fn test_call_posts_json_with_default_headers() {
        let mock = MockHttp::new(|_| {
            Ok(MockResponse::json(
                200,
                json!({"mid": "U1", "displayName": "relay", "pictureStatus": "0h00"}),
            ))
        });
        let client = client(mock);

        let profile = client.get_profile().await.unwrap();
        assert_eq!(profile.mid, "U1");
        assert_eq!(profile.display_name, "relay");
        assert_eq!(profile.picture_status.as_deref(), Some("0h00"));

        let requests = client.http().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, "http://talk.test/S4/getProfile");
        assert_eq!(requests[0].headers["x-line-access"], "secret");
        assert!(matches!(requests[0].body, Some(RequestBody::Json(_))));
        assert!(requests[0].params.is_empty());
        assert!(requests[0].timeout.is_none());
    }

    #[tokio::test]
    async fn test_result_is_returned_verbatim() {
        let raw = json!({"notificationEnable": true, "privacySyncContacts": false, "e2ee": {"v": 2}});
        let expected = raw.clone();
        let client = client(MockHttp::new(move |_| Ok(MockResponse::json(200, raw.clone()))));

        let settings = client.get_settings().await.unwrap();
        assert_eq!(Value::Object(settings), expected);
    }

    #[tokio::test]
    async fn test_call_arguments() {
        let client = client(MockHttp::new(|_| Ok(MockResponse::json(200, json!([])))));

        let ops = client.fetch_operations(120, 50).await.unwrap();
        assert!(ops.is_empty());

        let requests = client.http().requests();
        match &requests[0].body {
            Some(RequestBody::Json(args)) => {
                assert_eq!(args["localRev"], 120);
                assert_eq!(args["count"], 50);
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_void_result() {
        let client = client(MockHttp::new(|_| Ok(MockResponse::bytes(200, ""))));
        client.noop().await.unwrap();
        client
            .update_profile(&Profile {
                mid: "U1".to_string(),
                display_name: "new name".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(client.http().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_send_message_returns_server_copy() {
        let client = client(MockHttp::new(|_| {
            Ok(MockResponse::json(200, json!({"id": "m100", "to": "U2", "text": "hi", "contentType": 0})))
        }));

        let sent = client.send_message(&Message::text("U2", "hi")).await.unwrap();
        assert_eq!(sent.id.as_deref(), Some("m100"));

        let requests = client.http().requests();
        match &requests[0].body {
            Some(RequestBody::Json(args)) => assert_eq!(args["message"]["text"], "hi"),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let client = client(MockHttp::new(|_| Ok(MockResponse::bytes(403, "forbidden"))));

        let err = client.get_last_op_revision().await.unwrap_err();
        match err {
            LineError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "forbidden");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_with_unreadable_body_keeps_status() {
        let client = client(MockHttp::new(|_| {
            Ok(MockResponse::failing_body(502))
        }));

        let err = client.get_profile().await.unwrap_err();
        match err {
            LineError::Api { status, message } => {
                assert_eq!(status, 502);
                assert!(message.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_surfaces() {
        let client = client(MockHttp::new(|_| Ok(MockResponse::bytes(200, "<html>"))));

        let err = client.get_profile().await.unwrap_err();
        assert!(matches!(err, LineError::Http(HttpError::MalformedBody(_))));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_parse_error() {
        let client = client(MockHttp::new(|_| Ok(MockResponse::json(200, json!("not a number")))));

        let err = client.get_last_op_revision().await.unwrap_err();
        assert!(matches!(err, LineError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let client = client(MockHttp::new(|request| {
            Err(HttpError::Timeout(request.url.clone()))
        }));

        let err = client.get_user_ticket().await.unwrap_err();
        assert!(matches!(err, LineError::Http(HttpError::Timeout(_))));
    }
}
