//! Request bodies
//!
//! Bodies are plain data until the transport turns them into engine
//! requests, so test doubles can inspect exactly what would be sent.

use bytes::Bytes;
use serde_json::Value;

use crate::error::{HttpError, Result};

/// Query parameters, passed through in order.
pub type Params = [(String, String)];

/// POST body payload
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Raw bytes, sent as-is
    Bytes(Bytes),
    /// UTF-8 text, sent as-is
    Text(String),
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// JSON document
    Json(Value),
    /// `multipart/form-data`
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::Bytes(_) => "bytes",
            RequestBody::Text(_) => "text",
            RequestBody::Form(_) => "form",
            RequestBody::Json(_) => "json",
            RequestBody::Multipart(_) => "multipart",
        }
    }
}

/// A file attached to a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Bytes,
}

/// Multipart form made of text fields and file parts, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.files.push(FilePart {
            name: name.into(),
            file_name: file_name.into(),
            mime_type: None,
            bytes: bytes.into(),
        });
        self
    }

    /// Add a file part with an explicit MIME type.
    pub fn file_with_mime(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.files.push(FilePart {
            name: name.into(),
            file_name: file_name.into(),
            mime_type: Some(mime_type.into()),
            bytes: bytes.into(),
        });
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    /// First text field with the given name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First file part with the given name.
    pub fn file_part(&self, name: &str) -> Option<&FilePart> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Convert into the reqwest form.
    pub(crate) fn into_reqwest(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();

        for (name, value) in self.fields {
            form = form.text(name, value);
        }

        for file in self.files {
            let mut part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                .file_name(file.file_name);
            if let Some(mime) = file.mime_type {
                part = part.mime_str(&mime).map_err(|e| {
                    HttpError::InvalidRequest(format!("invalid MIME type '{}': {}", mime, e))
                })?;
            }
            form = form.part(file.name, part);
        }

        Ok(form)
    }
}
