use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::api::{Attachment, Component, Embed, Snowflake};

/// A received message event, reduced to the fields the message model reads.
/// Everything else the gateway sends rides along in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MessageGet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Snowflake>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,

    /// Whether the message mentions everyone.
    #[serde(default)]
    pub mention_everyone: bool,

    /// Raw text content; empty when the message carries none.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub embeds: Vec<Embed>,

    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_with_missing_fields() {
        let event: MessageGet = serde_json::from_value(json!({
            "id": "10",
            "content": "hello",
            "tts": false,
        }))
        .unwrap();
        assert_eq!(event.id, Some(Snowflake(10)));
        assert_eq!(event.content, "hello");
        assert!(!event.mention_everyone);
        assert!(event.attachments.is_empty());
        assert_eq!(event.extra.get("tts"), Some(&json!(false)));
    }
}
