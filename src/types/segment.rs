use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CordedError;
use crate::types::api::{
    ActionRow, AttachmentSend, Component, DirectComponent, Embed, File, MessageReference,
    Snowflake, TimestampStyle,
};

/// One typed, addressable unit of message content.
///
/// The wire form is `{"type": <kind>, "data": {...}}`; the kind tag is fixed
/// by the variant and determines the payload shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    Attachment(AttachmentData),
    Sticker(StickerData),
    Embed(EmbedData),
    Component(ComponentData),
    CustomEmoji(CustomEmojiData),
    MentionUser(MentionUserData),
    MentionRole(MentionRoleData),
    MentionChannel(MentionChannelData),
    MentionEveryone,
    Text(TextData),
    Timestamp(TimestampData),
    Reference(ReferenceData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Attachment,
    Sticker,
    Embed,
    Component,
    CustomEmoji,
    MentionUser,
    MentionRole,
    MentionChannel,
    MentionEveryone,
    Text,
    Timestamp,
    Reference,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Sticker => "sticker",
            Self::Embed => "embed",
            Self::Component => "component",
            Self::CustomEmoji => "custom_emoji",
            Self::MentionUser => "mention_user",
            Self::MentionRole => "mention_role",
            Self::MentionChannel => "mention_channel",
            Self::MentionEveryone => "mention_everyone",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AttachmentData {
    pub attachment: AttachmentSend,
    #[serde(default)]
    pub file: Option<File>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StickerData {
    pub id: Snowflake,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmbedData {
    pub embed: Embed,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComponentData {
    pub component: DirectComponent,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomEmojiData {
    pub name: String,
    pub id: Snowflake,
    #[serde(default)]
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MentionUserData {
    pub user_id: Snowflake,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MentionRoleData {
    pub role_id: Snowflake,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MentionChannelData {
    pub channel_id: Snowflake,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextData {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimestampData {
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TimestampStyle>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReferenceData {
    pub reference: MessageReference,
}

/// Source accepted by [`Segment::attachment`]: a filename, a file carrying
/// its own bytes, or ready-made attachment metadata.
pub enum AttachmentSource {
    Filename(String),
    File(File),
    Metadata(AttachmentSend),
}

impl From<&str> for AttachmentSource {
    fn from(filename: &str) -> Self {
        Self::Filename(filename.to_owned())
    }
}

impl From<String> for AttachmentSource {
    fn from(filename: String) -> Self {
        Self::Filename(filename)
    }
}

impl From<File> for AttachmentSource {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

impl From<AttachmentSend> for AttachmentSource {
    fn from(attachment: AttachmentSend) -> Self {
        Self::Metadata(attachment)
    }
}

impl TryFrom<Value> for AttachmentSource {
    type Error = CordedError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(filename) => Ok(Self::Filename(filename)),
            Value::Object(ref map) if map.contains_key("content") => {
                Ok(Self::File(serde_json::from_value(value)?))
            }
            Value::Object(ref map) if map.contains_key("filename") => {
                Ok(Self::Metadata(serde_json::from_value(value)?))
            }
            other => Err(CordedError::UnsupportedInput(format!(
                "attachment source must be a filename, file or attachment metadata, got {other}"
            ))),
        }
    }
}

impl Segment {
    pub fn kind(&self) -> SegmentKind {
        match self {
            Self::Attachment(_) => SegmentKind::Attachment,
            Self::Sticker(_) => SegmentKind::Sticker,
            Self::Embed(_) => SegmentKind::Embed,
            Self::Component(_) => SegmentKind::Component,
            Self::CustomEmoji(_) => SegmentKind::CustomEmoji,
            Self::MentionUser(_) => SegmentKind::MentionUser,
            Self::MentionRole(_) => SegmentKind::MentionRole,
            Self::MentionChannel(_) => SegmentKind::MentionChannel,
            Self::MentionEveryone => SegmentKind::MentionEveryone,
            Self::Text(_) => SegmentKind::Text,
            Self::Timestamp(_) => SegmentKind::Timestamp,
            Self::Reference(_) => SegmentKind::Reference,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(TextData {
            text: content.into(),
        })
    }

    pub fn sticker(id: impl Into<Snowflake>) -> Self {
        Self::Sticker(StickerData { id: id.into() })
    }

    pub fn embed(embed: Embed) -> Self {
        Self::Embed(EmbedData { embed })
    }

    /// Bare buttons and select menus are wrapped into a single-element
    /// [`ActionRow`]; rows and text inputs are stored as-is.
    pub fn component(component: impl Into<Component>) -> Self {
        let component = match component.into() {
            Component::ActionRow(row) => DirectComponent::ActionRow(row),
            Component::TextInput(input) => DirectComponent::TextInput(input),
            interactive @ (Component::Button(_) | Component::SelectMenu(_)) => {
                DirectComponent::ActionRow(ActionRow::new(vec![interactive]))
            }
        };
        Self::Component(ComponentData { component })
    }

    pub fn custom_emoji(name: impl Into<String>, id: impl Into<Snowflake>, animated: bool) -> Self {
        Self::CustomEmoji(CustomEmojiData {
            name: name.into(),
            id: id.into(),
            animated,
        })
    }

    pub fn mention_user(user_id: impl Into<Snowflake>) -> Self {
        Self::MentionUser(MentionUserData {
            user_id: user_id.into(),
        })
    }

    pub fn mention_role(role_id: impl Into<Snowflake>) -> Self {
        Self::MentionRole(MentionRoleData {
            role_id: role_id.into(),
        })
    }

    pub fn mention_channel(channel_id: impl Into<Snowflake>) -> Self {
        Self::MentionChannel(MentionChannelData {
            channel_id: channel_id.into(),
        })
    }

    pub fn mention_everyone() -> Self {
        Self::MentionEveryone
    }

    pub fn timestamp(timestamp: i64, style: Option<TimestampStyle>) -> Self {
        Self::Timestamp(TimestampData { timestamp, style })
    }

    pub fn reference(reference: impl Into<MessageReference>) -> Self {
        Self::Reference(ReferenceData {
            reference: reference.into(),
        })
    }

    /// Builds an attachment segment. A [`File`] source carries its own
    /// bytes; [`AttachmentSend`] metadata carries its own description; the
    /// explicit arguments fill whatever the source leaves open.
    pub fn attachment(
        source: impl Into<AttachmentSource>,
        description: Option<String>,
        content: Option<Vec<u8>>,
    ) -> Self {
        let (filename, description, content) = match source.into() {
            AttachmentSource::Filename(filename) => (filename, description, content),
            AttachmentSource::File(file) => (file.filename, description, Some(file.content)),
            AttachmentSource::Metadata(meta) => (meta.filename, meta.description, content),
        };
        let file = content.map(|content| File {
            filename: filename.clone(),
            content,
        });
        Self::Attachment(AttachmentData {
            attachment: AttachmentSend {
                filename,
                description,
            },
            file,
        })
    }

    /// Validates an untyped `{"type", "data"}` pair into a typed segment.
    ///
    /// Unknown kinds and malformed payloads fail with
    /// [`CordedError::Validation`] naming the offending kind.
    pub fn validate(value: &Value) -> Result<Self, CordedError> {
        let object = value
            .as_object()
            .ok_or_else(|| CordedError::validation("segment", "expected an object"))?;
        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CordedError::validation("segment", "missing \"type\" tag"))?;

        if kind == "mention_everyone" {
            return Ok(Self::MentionEveryone);
        }
        let data = object
            .get("data")
            .cloned()
            .ok_or_else(|| CordedError::validation(kind, "missing \"data\""))?;

        fn coerce<T: serde::de::DeserializeOwned>(
            kind: &str,
            data: Value,
        ) -> Result<T, CordedError> {
            serde_json::from_value(data).map_err(|e| CordedError::validation(kind, e.to_string()))
        }

        match kind {
            "attachment" => Ok(Self::Attachment(coerce(kind, data)?)),
            "sticker" => Ok(Self::Sticker(coerce(kind, data)?)),
            "embed" => Ok(Self::Embed(coerce(kind, data)?)),
            "component" => Ok(Self::Component(coerce(kind, data)?)),
            "custom_emoji" => Ok(Self::CustomEmoji(coerce(kind, data)?)),
            "mention_user" => Ok(Self::MentionUser(coerce(kind, data)?)),
            "mention_role" => Ok(Self::MentionRole(coerce(kind, data)?)),
            "mention_channel" => Ok(Self::MentionChannel(coerce(kind, data)?)),
            "text" => Ok(Self::Text(coerce(kind, data)?)),
            "timestamp" => Ok(Self::Timestamp(coerce(kind, data)?)),
            "reference" => Ok(Self::Reference(coerce(kind, data)?)),
            unknown => Err(CordedError::validation(unknown, "unknown segment kind")),
        }
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Segment::validate(&value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attachment(data) => write!(f, "<Attachment:{}>", data.attachment.filename),
            Self::Sticker(data) => write!(f, "<Sticker:{}>", data.id),
            Self::Embed(data) => {
                write!(f, "<Embed:{}>", data.embed.kind.as_deref().unwrap_or("rich"))
            }
            Self::Component(data) => write!(f, "<Component:{}>", data.component.kind()),
            Self::CustomEmoji(data) => {
                let prefix = if data.animated { "a" } else { "" };
                write!(f, "<{prefix}:{}:{}>", data.name, data.id)
            }
            Self::MentionUser(data) => write!(f, "<@{}>", data.user_id),
            Self::MentionRole(data) => write!(f, "<@&{}>", data.role_id),
            Self::MentionChannel(data) => write!(f, "<#{}>", data.channel_id),
            Self::MentionEveryone => f.write_str("@everyone"),
            Self::Text(data) => f.write_str(&data.text),
            Self::Timestamp(data) => {
                write!(f, "<t:{}", data.timestamp)?;
                if let Some(style) = data.style {
                    write!(f, ":{style}")?;
                }
                f.write_str(">")
            }
            Self::Reference(data) => {
                let id = data
                    .reference
                    .message_id
                    .map(|id| id.to_string())
                    .unwrap_or_default();
                write!(f, "<Reference:{id}>")
            }
        }
    }
}

macro_rules! impl_segment_data {
    ($($Variant:ident => $Data:ty, $kind:literal;)*) => {
        $(
            impl TryFrom<Segment> for $Data {
                type Error = CordedError;

                fn try_from(segment: Segment) -> Result<Self, Self::Error> {
                    match segment {
                        Segment::$Variant(data) => Ok(data),
                        other => Err(CordedError::TypeMismatch {
                            expected: $kind,
                            found: other.kind().as_str(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_segment_data! {
    Attachment => AttachmentData, "attachment";
    Sticker => StickerData, "sticker";
    Embed => EmbedData, "embed";
    Component => ComponentData, "component";
    CustomEmoji => CustomEmojiData, "custom_emoji";
    MentionUser => MentionUserData, "mention_user";
    MentionRole => MentionRoleData, "mention_role";
    MentionChannel => MentionChannelData, "mention_channel";
    Text => TextData, "text";
    Timestamp => TimestampData, "timestamp";
    Reference => ReferenceData, "reference";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::api::{Button, ButtonStyle};
    use serde_json::json;

    #[test]
    fn render_forms() {
        assert_eq!(Segment::sticker(9u64).to_string(), "<Sticker:9>");
        assert_eq!(
            Segment::custom_emoji("wave", 3u64, false).to_string(),
            "<:wave:3>"
        );
        assert_eq!(
            Segment::custom_emoji("wave", 3u64, true).to_string(),
            "<a:wave:3>"
        );
        assert_eq!(Segment::mention_user(42u64).to_string(), "<@42>");
        assert_eq!(Segment::mention_role(7u64).to_string(), "<@&7>");
        assert_eq!(Segment::mention_channel(8u64).to_string(), "<#8>");
        assert_eq!(Segment::mention_everyone().to_string(), "@everyone");
        assert_eq!(Segment::timestamp(100, None).to_string(), "<t:100>");
        assert_eq!(
            Segment::timestamp(100, Some(TimestampStyle::RelativeTime)).to_string(),
            "<t:100:R>"
        );
        assert_eq!(Segment::text("hi <raw>").to_string(), "hi <raw>");
    }

    #[test]
    fn component_factory_wraps_interactive_elements() {
        let segment = Segment::component(Button::new(ButtonStyle::Primary));
        let Segment::Component(data) = &segment else {
            panic!("expected component segment");
        };
        match &data.component {
            DirectComponent::ActionRow(row) => assert_eq!(row.components.len(), 1),
            other => panic!("expected action row, got {other:?}"),
        }
    }

    #[test]
    fn attachment_factory_sources() {
        let by_name = Segment::attachment("a.png", Some("desc".into()), None);
        let Segment::Attachment(data) = &by_name else {
            panic!("expected attachment segment");
        };
        assert_eq!(data.attachment.filename, "a.png");
        assert_eq!(data.attachment.description.as_deref(), Some("desc"));
        assert!(data.file.is_none());

        let by_file = Segment::attachment(
            File {
                filename: "b.png".into(),
                content: vec![1, 2],
            },
            None,
            None,
        );
        let Segment::Attachment(data) = &by_file else {
            panic!("expected attachment segment");
        };
        assert_eq!(data.file.as_ref().unwrap().content, vec![1, 2]);

        let by_meta = Segment::attachment(
            AttachmentSend {
                filename: "c.png".into(),
                description: Some("kept".into()),
            },
            Some("ignored".into()),
            Some(vec![3]),
        );
        let Segment::Attachment(data) = &by_meta else {
            panic!("expected attachment segment");
        };
        assert_eq!(data.attachment.description.as_deref(), Some("kept"));
        assert_eq!(data.file.as_ref().unwrap().filename, "c.png");
    }

    #[test]
    fn attachment_source_from_value() {
        assert!(AttachmentSource::try_from(json!("a.png")).is_ok());
        assert!(AttachmentSource::try_from(json!({"filename": "a", "content": [1]})).is_ok());
        assert!(matches!(
            AttachmentSource::try_from(json!(42)),
            Err(CordedError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn validate_round_trips_wire_form() {
        let segment = Segment::mention_user(42u64);
        let value = serde_json::to_value(&segment).unwrap();
        assert_eq!(
            value,
            json!({"type": "mention_user", "data": {"user_id": "42"}})
        );
        assert_eq!(Segment::validate(&value).unwrap(), segment);
    }

    #[test]
    fn validate_rejects_unknown_kind() {
        let err = Segment::validate(&json!({"type": "video", "data": {}})).unwrap_err();
        assert!(matches!(err, CordedError::Validation { kind, .. } if kind == "video"));
    }

    #[test]
    fn validate_rejects_missing_key() {
        let err = Segment::validate(&json!({"type": "sticker", "data": {}})).unwrap_err();
        assert!(matches!(err, CordedError::Validation { kind, .. } if kind == "sticker"));
    }

    #[test]
    fn validate_rejects_unknown_component_discriminator() {
        let value = json!({
            "type": "component",
            "data": {"component": {"type": 999, "custom_id": "x"}}
        });
        let err = Segment::validate(&value).unwrap_err();
        assert!(matches!(err, CordedError::Validation { kind, .. } if kind == "component"));
    }

    #[test]
    fn validate_accepts_bare_mention_everyone() {
        let segment = Segment::validate(&json!({"type": "mention_everyone"})).unwrap();
        assert_eq!(segment, Segment::MentionEveryone);
    }

    #[test]
    fn data_conversion_checks_the_kind() {
        let data = TextData::try_from(Segment::text("hi")).unwrap();
        assert_eq!(data.text, "hi");
        let err = TextData::try_from(Segment::mention_everyone()).unwrap_err();
        assert!(matches!(
            err,
            CordedError::TypeMismatch {
                expected: "text",
                found: "mention_everyone",
            }
        ));
    }
}
