use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CordedError;

/// A platform-assigned 64-bit identifier.
///
/// The wire form is a decimal string, but inbound payloads may also carry a
/// bare integer; both deserialize into the same canonical `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(pub u64);

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for u64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl FromStr for Snowflake {
    type Err = CordedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| CordedError::validation("snowflake", format!("not a decimal id: {s:?}")))
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(Snowflake(n)),
            Raw::Str(s) => s.parse().map_err(|_| {
                D::Error::custom(format!("snowflake is not a decimal id: {s:?}"))
            }),
        }
    }
}

/// Display style of an inline `<t:...>` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TimestampStyle {
    #[serde(rename = "t")]
    ShortTime,
    #[serde(rename = "T")]
    LongTime,
    #[serde(rename = "d")]
    ShortDate,
    #[serde(rename = "D")]
    LongDate,
    #[serde(rename = "f")]
    ShortDateTime,
    #[serde(rename = "F")]
    LongDateTime,
    #[serde(rename = "R")]
    RelativeTime,
}

impl TimestampStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTime => "t",
            Self::LongTime => "T",
            Self::ShortDate => "d",
            Self::LongDate => "D",
            Self::ShortDateTime => "f",
            Self::LongDateTime => "F",
            Self::RelativeTime => "R",
        }
    }
}

impl fmt::Display for TimestampStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampStyle {
    type Err = CordedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t" => Ok(Self::ShortTime),
            "T" => Ok(Self::LongTime),
            "d" => Ok(Self::ShortDate),
            "D" => Ok(Self::LongDate),
            "f" => Ok(Self::ShortDateTime),
            "F" => Ok(Self::LongDateTime),
            "R" => Ok(Self::RelativeTime),
            _ => Err(CordedError::validation(
                "timestamp",
                format!("unknown style: {s:?}"),
            )),
        }
    }
}

/// An embed, typed down to the fields this crate inspects; everything else
/// rides in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

/// Component type discriminator carried in every component object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ComponentType {
    ActionRow,
    Button,
    SelectMenu,
    TextInput,
}

impl From<ComponentType> for u8 {
    fn from(kind: ComponentType) -> Self {
        match kind {
            ComponentType::ActionRow => 1,
            ComponentType::Button => 2,
            ComponentType::SelectMenu => 3,
            ComponentType::TextInput => 4,
        }
    }
}

impl TryFrom<u8> for ComponentType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::ActionRow),
            2 => Ok(Self::Button),
            3 => Ok(Self::SelectMenu),
            4 => Ok(Self::TextInput),
            other => Err(format!("invalid component type: {other}")),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
    Link,
}

impl From<ButtonStyle> for u8 {
    fn from(style: ButtonStyle) -> Self {
        match style {
            ButtonStyle::Primary => 1,
            ButtonStyle::Secondary => 2,
            ButtonStyle::Success => 3,
            ButtonStyle::Danger => 4,
            ButtonStyle::Link => 5,
        }
    }
}

impl TryFrom<u8> for ButtonStyle {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Primary),
            2 => Ok(Self::Secondary),
            3 => Ok(Self::Success),
            4 => Ok(Self::Danger),
            5 => Ok(Self::Link),
            other => Err(format!("invalid button style: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TextInputStyle {
    Short,
    Paragraph,
}

impl From<TextInputStyle> for u8 {
    fn from(style: TextInputStyle) -> Self {
        match style {
            TextInputStyle::Short => 1,
            TextInputStyle::Paragraph => 2,
        }
    }
}

impl TryFrom<u8> for TextInputStyle {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Short),
            2 => Ok(Self::Paragraph),
            other => Err(format!("invalid text input style: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub style: ButtonStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl Button {
    pub fn new(style: ButtonStyle) -> Self {
        Self {
            kind: ComponentType::Button,
            style,
            label: None,
            custom_id: None,
            url: None,
            disabled: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SelectMenu {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub custom_id: String,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_values: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_values: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl SelectMenu {
    pub fn new(custom_id: impl Into<String>) -> Self {
        Self {
            kind: ComponentType::SelectMenu,
            custom_id: custom_id.into(),
            options: Vec::new(),
            placeholder: None,
            min_values: None,
            max_values: None,
            disabled: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextInput {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub custom_id: String,
    pub style: TextInputStyle,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl TextInput {
    pub fn new(
        custom_id: impl Into<String>,
        style: TextInputStyle,
        label: impl Into<String>,
    ) -> Self {
        Self {
            kind: ComponentType::TextInput,
            custom_id: custom_id.into(),
            style,
            label: label.into(),
            min_length: None,
            max_length: None,
            required: None,
            value: None,
            placeholder: None,
        }
    }
}

/// A row grouping interactive elements for display.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: ComponentType,
    pub components: Vec<Component>,
}

impl ActionRow {
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            kind: ComponentType::ActionRow,
            components,
        }
    }
}

/// Any interactive component, dispatched by its numeric `type` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    ActionRow(ActionRow),
    Button(Button),
    SelectMenu(SelectMenu),
    TextInput(TextInput),
}

impl Component {
    pub fn kind(&self) -> ComponentType {
        match self {
            Self::ActionRow(_) => ComponentType::ActionRow,
            Self::Button(_) => ComponentType::Button,
            Self::SelectMenu(_) => ComponentType::SelectMenu,
            Self::TextInput(_) => ComponentType::TextInput,
        }
    }
}

impl From<ActionRow> for Component {
    fn from(row: ActionRow) -> Self {
        Self::ActionRow(row)
    }
}

impl From<Button> for Component {
    fn from(button: Button) -> Self {
        Self::Button(button)
    }
}

impl From<SelectMenu> for Component {
    fn from(menu: SelectMenu) -> Self {
        Self::SelectMenu(menu)
    }
}

impl From<TextInput> for Component {
    fn from(input: TextInput) -> Self {
        Self::TextInput(input)
    }
}

fn component_discriminator<E: serde::de::Error>(value: &Value) -> Result<u64, E> {
    value
        .get("type")
        .and_then(Value::as_u64)
        .ok_or_else(|| E::missing_field("type"))
}

impl<'de> Deserialize<'de> for Component {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let component = match component_discriminator(&value)? {
            1 => Component::ActionRow(serde_json::from_value(value).map_err(D::Error::custom)?),
            2 => Component::Button(serde_json::from_value(value).map_err(D::Error::custom)?),
            3 => Component::SelectMenu(serde_json::from_value(value).map_err(D::Error::custom)?),
            4 => Component::TextInput(serde_json::from_value(value).map_err(D::Error::custom)?),
            other => return Err(D::Error::custom(format!("invalid component type: {other}"))),
        };
        Ok(component)
    }
}

/// The two component shapes allowed at the top level of a message payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DirectComponent {
    ActionRow(ActionRow),
    TextInput(TextInput),
}

impl DirectComponent {
    pub fn kind(&self) -> ComponentType {
        match self {
            Self::ActionRow(_) => ComponentType::ActionRow,
            Self::TextInput(_) => ComponentType::TextInput,
        }
    }
}

impl<'de> Deserialize<'de> for DirectComponent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let component = match component_discriminator(&value)? {
            1 => Self::ActionRow(serde_json::from_value(value).map_err(D::Error::custom)?),
            4 => Self::TextInput(serde_json::from_value(value).map_err(D::Error::custom)?),
            other => {
                return Err(D::Error::custom(format!(
                    "invalid top-level component type: {other}"
                )))
            }
        };
        Ok(component)
    }
}

/// Raw file bytes attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct File {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Outbound attachment metadata.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AttachmentSend {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An attachment record on a received message. `description` stays a raw
/// value: the platform is not trusted to always send a string there.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Snowflake>,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MessageReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_if_not_exists: Option<bool>,
}

impl MessageReference {
    pub fn to(message_id: impl Into<Snowflake>) -> Self {
        Self {
            message_id: Some(message_id.into()),
            ..Self::default()
        }
    }

    pub fn channel_id(mut self, channel_id: impl Into<Snowflake>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn guild_id(mut self, guild_id: impl Into<Snowflake>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    pub fn fail_if_not_exists(mut self, fail: bool) -> Self {
        self.fail_if_not_exists = Some(fail);
        self
    }
}

impl<T: Into<Snowflake>> From<T> for MessageReference {
    fn from(message_id: T) -> Self {
        Self::to(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snowflake_accepts_string_and_number() {
        let from_str: Snowflake = serde_json::from_value(json!("42")).unwrap();
        let from_num: Snowflake = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(serde_json::to_value(from_str).unwrap(), json!("42"));
    }

    #[test]
    fn snowflake_rejects_garbage() {
        assert!(serde_json::from_value::<Snowflake>(json!("abc")).is_err());
        assert!("1x".parse::<Snowflake>().is_err());
    }

    #[test]
    fn component_dispatches_on_type() {
        let value = json!({
            "type": 1,
            "components": [{"type": 2, "style": 1, "label": "go", "custom_id": "go"}]
        });
        let component: Component = serde_json::from_value(value).unwrap();
        match component {
            Component::ActionRow(row) => {
                assert_eq!(row.components.len(), 1);
                assert_eq!(row.components[0].kind(), ComponentType::Button);
            }
            other => panic!("expected action row, got {other:?}"),
        }
    }

    #[test]
    fn unknown_component_type_is_rejected() {
        let err = serde_json::from_value::<Component>(json!({"type": 999})).unwrap_err();
        assert!(err.to_string().contains("invalid component type"));
    }

    #[test]
    fn direct_component_rejects_bare_button() {
        let value = json!({"type": 2, "style": 1, "custom_id": "go"});
        assert!(serde_json::from_value::<DirectComponent>(value).is_err());
    }

    #[test]
    fn message_reference_omits_unset_fields() {
        let reference = MessageReference::to(7u64).fail_if_not_exists(false);
        assert_eq!(
            serde_json::to_value(&reference).unwrap(),
            json!({"message_id": "7", "fail_if_not_exists": false})
        );
    }
}
