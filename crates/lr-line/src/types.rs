//! LINE talk types
//!
//! Only the fields the client reads are typed; everything else the server
//! sends is kept in `extra` so results round-trip verbatim.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "i32", into = "i32")]
pub enum ContentType {
    #[default]
    None,
    Image,
    Video,
    Audio,
    Sticker,
    Other(i32),
}

impl From<i32> for ContentType {
    fn from(value: i32) -> Self {
        match value {
            0 => ContentType::None,
            1 => ContentType::Image,
            2 => ContentType::Video,
            3 => ContentType::Audio,
            7 => ContentType::Sticker,
            other => ContentType::Other(other),
        }
    }
}

impl From<ContentType> for i32 {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::None => 0,
            ContentType::Image => 1,
            ContentType::Video => 2,
            ContentType::Audio => 3,
            ContentType::Sticker => 7,
            ContentType::Other(other) => other,
        }
    }
}

/// Talk message
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Server-issued id, absent until the message is sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_metadata: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Plain text message
    pub fn text(to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Image message without content; the binary is attached afterwards
    /// through the media endpoint.
    pub fn image_placeholder(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            content_type: ContentType::Image,
            ..Default::default()
        }
    }
}

/// User profile
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub mid: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Contact
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub mid: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Group chat
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<Contact>,
    #[serde(default)]
    pub invitee: Vec<Contact>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Multi-user room
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub mid: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Invitation / user ticket
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_use_count: Option<i32>,
}

/// Entry of the operation log
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub revision: i64,
    #[serde(rename = "type")]
    pub op_type: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Account settings. Opaque to this client.
pub type Settings = Map<String, Value>;

/// Last-read message ids of a chat
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LastReadMessageIds {
    pub chat_id: String,
    #[serde(default)]
    pub last_read_message_ids: Vec<String>,
}

/// `params` field of a media upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadParams {
    pub name: String,
    pub oid: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub media_type: String,
    pub ver: String,
}

impl UploadParams {
    /// Parameters for attaching an image to message `oid`.
    pub fn image(oid: impl Into<String>, size: u64) -> Self {
        Self {
            name: "media".to_string(),
            oid: oid.into(),
            size,
            media_type: "image".to_string(),
            ver: "1.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_type_round_trips_as_integer() {
        assert_eq!(serde_json::to_value(ContentType::Image).unwrap(), json!(1));
        assert_eq!(serde_json::from_value::<ContentType>(json!(7)).unwrap(), ContentType::Sticker);
        assert_eq!(serde_json::from_value::<ContentType>(json!(42)).unwrap(), ContentType::Other(42));
    }

    #[test]
    fn test_image_placeholder_has_no_text() {
        let message = Message::image_placeholder("U1");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"to": "U1", "contentType": 1}));
    }

    #[test]
    fn test_message_keeps_unknown_fields() {
        let raw = json!({
            "id": "m1",
            "to": "U1",
            "from": "U2",
            "text": "hi",
            "contentType": 0,
            "createdTime": 1700000000000i64,
            "location": null
        });
        let message: Message = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(message.id.as_deref(), Some("m1"));
        assert_eq!(message.content_type, ContentType::None);
        assert_eq!(message.extra["createdTime"], json!(1700000000000i64));
        assert_eq!(serde_json::to_value(&message).unwrap(), raw);
    }

    #[test]
    fn test_operation_parsing() {
        let op: Operation = serde_json::from_value(json!({
            "revision": 10,
            "type": 26,
            "message": {"id": "m9", "to": "U1", "text": "yo"}
        }))
        .unwrap();
        assert_eq!(op.revision, 10);
        assert_eq!(op.op_type, 26);
        assert_eq!(op.message.unwrap().text.as_deref(), Some("yo"));
    }

    #[test]
    fn test_upload_params_wire_names() {
        let params = UploadParams::image("m1", 2048);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"name": "media", "oid": "m1", "size": 2048, "type": "image", "ver": "1.0"})
        );
    }
}
