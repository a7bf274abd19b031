//! Media upload
//!
//! Sending an image takes three requests: a placeholder image message is
//! sent to obtain its id, the binary is posted to the media endpoint under
//! that id, and the endpoint must answer 201. If the upload is rejected the
//! placeholder stays on the server; `UploadFailed` reports its id.

use std::path::Path;

use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use lr_http::header::HeaderMap;
use lr_http::{HttpClient, HttpResponse, MultipartForm, RequestBody};

use crate::api::LineApiClient;
use crate::error::{LineError, Result};
use crate::types::{Message, UploadParams};

/// Status the media endpoint answers with once it has stored an upload
pub const UPLOAD_CREATED: u16 = 201;

const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

impl<C: HttpClient> LineApiClient<C> {
    /// POST a multipart form to `url` with the default headers
    pub async fn post_content(&self, url: &str, form: MultipartForm) -> Result<C::Response> {
        let response = self
            .http()
            .post(url, self.headers(), Some(RequestBody::Multipart(form)), None)
            .await?;
        Ok(response)
    }

    /// Send the image at `path` to `to`
    pub async fn send_image(&self, to: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Read before sending anything so a bad path creates no placeholder
        let data = tokio::fs::read(path).await?;
        let size = data.len() as u64;

        let placeholder = self.send_message(&Message::image_placeholder(to)).await?;
        let message_id = placeholder.id.ok_or(LineError::MissingField("message id"))?;

        let params = serde_json::to_string(&UploadParams::image(&message_id, size))
            .map_err(|e| LineError::ParseError(e.to_string()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let form = MultipartForm::new()
            .text("params", params)
            .file("file", file_name, data);

        info!("Uploading image for message {}: {} bytes", message_id, size);

        let response = self.post_content(self.upload_url(), form).await?;

        let status = response.status_code();
        if status != UPLOAD_CREATED {
            error!("Upload image failed: {} (placeholder {})", status, message_id);
            return Err(LineError::UploadFailed { status, message_id });
        }

        Ok(())
    }

    /// Download the image at `url` and send it to `to`
    ///
    /// The download is staged in a temporary file that is removed whether
    /// or not the upload succeeds.
    pub async fn send_image_with_url(&self, to: &str, url: &str) -> Result<()> {
        let staged = self.download_to_staging(url).await?;
        self.send_image(to, &staged).await
    }

    /// Stream `url` into a fresh file in the staging directory.
    ///
    /// The write handle is closed before this returns; the file itself
    /// lives as long as the returned path.
    async fn download_to_staging(&self, url: &str) -> Result<TempPath> {
        debug!("Downloading image: {}", url);

        let response = self.http().get(url, &HeaderMap::new(), &[], true, None).await?;

        let status = response.status_code();
        if !response.is_success() {
            error!("Download image failed: {} - {}", status, url);
            return Err(LineError::DownloadFailed {
                status,
                url: url.to_string(),
            });
        }

        let (file, path) = tempfile::Builder::new()
            .prefix("line-relay-")
            .suffix(".data")
            .tempfile_in(self.staging_dir())?
            .into_parts();

        let mut file = tokio::fs::File::from_std(file);
        let mut chunks = response.iter_content(DOWNLOAD_CHUNK_SIZE);
        let mut written = 0u64;
        while let Some(chunk) = chunks.next_chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        debug!("Staged {} bytes at {}", written, path.display());
        Ok(path)
    }
}
