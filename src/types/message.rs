use std::fmt;
use std::ops::{Add, AddAssign};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::types::action::{EditMessage, SendMessage};
use crate::types::api::{AttachmentSend, Snowflake, TimestampStyle};
use crate::types::event::MessageGet;
use crate::types::segment::{Segment, SegmentKind};
use crate::utils::unescape;

/// An ordered sequence of [`Segment`]s representing one chat message.
///
/// The wire form is a bare segment list. Order is meaningful: rendering and
/// serialization both walk the segments in position order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Message(Vec<Segment>);

static INLINE_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(@!|@&|@|#|/|a:|t:|:)([^<]+?)>|@everyone").unwrap());

/// Lazily scans `text` for inline markup, yielding interleaved text and
/// markup segments. Restart by calling [`tokenize`] again (or cloning an
/// unconsumed tokenizer).
pub fn tokenize(text: &str) -> Tokenizer<'_> {
    Tokenizer {
        text,
        pos: 0,
        pending: None,
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    text: &'a str,
    pos: usize,
    pending: Option<Segment>,
}

impl Iterator for Tokenizer<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }
        while self.pos < self.text.len() {
            let Some(caps) = INLINE_MARKUP.captures_at(self.text, self.pos) else {
                let rest = &self.text[self.pos..];
                self.pos = self.text.len();
                return Some(Segment::text(unescape(rest)));
            };
            let whole = caps.get(0).unwrap();
            let gap = &self.text[self.pos..whole.start()];
            self.pos = whole.end();
            let segment = match caps.get(1) {
                Some(kind) => classify(
                    kind.as_str(),
                    caps.get(2).map_or("", |param| param.as_str()),
                    whole.as_str(),
                ),
                // the bare @everyone alternative
                None => Some(Segment::mention_everyone()),
            };
            if !gap.is_empty() {
                self.pending = segment;
                return Some(Segment::text(unescape(gap)));
            }
            if segment.is_some() {
                return segment;
            }
            // slash command reference: dropped, keep scanning
        }
        None
    }
}

/// Maps one markup match to a segment, or `None` for the slash-command form.
/// Anything that does not validate degrades to a literal text segment; the
/// tokenizer never fails.
fn classify(kind: &str, param: &str, whole: &str) -> Option<Segment> {
    let literal = || Some(Segment::text(unescape(whole)));
    match kind {
        "@!" | "@" => match param.parse::<Snowflake>() {
            Ok(id) => Some(Segment::mention_user(id)),
            Err(_) => literal(),
        },
        "@&" => match param.parse::<Snowflake>() {
            Ok(id) => Some(Segment::mention_role(id)),
            Err(_) => literal(),
        },
        "#" => match param.parse::<Snowflake>() {
            Ok(id) => Some(Segment::mention_channel(id)),
            Err(_) => literal(),
        },
        "/" => {
            trace!(markup = whole, "dropping slash command reference");
            None
        }
        ":" | "a:" => {
            let mut parts = param.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(id), None) => match id.parse::<Snowflake>() {
                    Ok(id) => Some(Segment::custom_emoji(name, id, kind == "a:")),
                    Err(_) => literal(),
                },
                _ => literal(),
            }
        }
        "t:" => {
            let mut parts = param.splitn(3, ':');
            let (first, second, rest) = (parts.next(), parts.next(), parts.next());
            if rest.is_some() {
                return literal();
            }
            let seconds = first
                .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|s| s.parse::<i64>().ok());
            let Some(seconds) = seconds else {
                return literal();
            };
            match second {
                None => Some(Segment::timestamp(seconds, None)),
                Some(style) => match style.parse::<TimestampStyle>() {
                    Ok(style) => Some(Segment::timestamp(seconds, Some(style))),
                    Err(_) => literal(),
                },
            }
        }
        _ => literal(),
    }
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizes `text` through the inline markup grammar. This is the
    /// inverse of flattening; plain-string conversions ([`From<&str>`],
    /// concatenation) deliberately skip the grammar and wrap the whole
    /// string as one text segment.
    pub fn parse(text: &str) -> Self {
        tokenize(text).collect()
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }

    /// The ordered subsequence of segments of one kind.
    pub fn filter_kind(&self, kind: SegmentKind) -> impl Iterator<Item = &Segment> + '_ {
        self.0.iter().filter(move |segment| segment.kind() == kind)
    }

    /// Flattens the textual kinds (text, mentions, custom emoji, timestamps)
    /// back into plain text, skipping everything else.
    pub fn extract_content(&self) -> String {
        self.0
            .iter()
            .filter(|segment| {
                matches!(
                    segment.kind(),
                    SegmentKind::Text
                        | SegmentKind::CustomEmoji
                        | SegmentKind::MentionUser
                        | SegmentKind::MentionRole
                        | SegmentKind::MentionEveryone
                        | SegmentKind::MentionChannel
                        | SegmentKind::Timestamp
                )
            })
            .map(ToString::to_string)
            .collect()
    }

    /// Builds a message from a received message event.
    ///
    /// Fixed order: the everyone-mention, the tokenized content, then
    /// attachments (metadata only), embeds, and components. Inbound
    /// attachments are references, not payload to re-upload, so no file
    /// bytes are carried over; a description that is not a plain string is
    /// dropped to null.
    pub fn from_event(event: &MessageGet) -> Self {
        let mut message = Message::new();
        if event.mention_everyone {
            message.push(Segment::mention_everyone());
        }
        if !event.content.is_empty() {
            message.0.extend(tokenize(&event.content));
        }
        for attachment in &event.attachments {
            let description = match &attachment.description {
                Some(Value::String(description)) => Some(description.clone()),
                Some(_) => {
                    debug!(
                        filename = %attachment.filename,
                        "dropping non-string attachment description"
                    );
                    None
                }
                None => None,
            };
            message.push(Segment::attachment(
                AttachmentSend {
                    filename: attachment.filename.clone(),
                    description,
                },
                None,
                None,
            ));
        }
        for embed in &event.embeds {
            message.push(Segment::embed(embed.clone()));
        }
        for component in &event.components {
            message.push(Segment::component(component.clone()));
        }
        message
    }

    /// Serializes into the send-message API field set. Every key is `None`
    /// when it has nothing to carry; of multiple reference segments only the
    /// last survives. Reading-only, so calling it twice yields the same
    /// payload.
    pub fn to_payload(&self) -> SendMessage {
        let mut embeds = Vec::new();
        let mut reference = None;
        let mut components = Vec::new();
        let mut sticker_ids = Vec::new();
        let mut attachments = Vec::new();
        let mut files = Vec::new();
        for segment in &self.0 {
            match segment {
                Segment::Embed(data) => embeds.push(data.embed.clone()),
                Segment::Reference(data) => reference = Some(data.reference.clone()),
                Segment::Component(data) => components.push(data.component.clone()),
                Segment::Sticker(data) => sticker_ids.push(data.id),
                Segment::Attachment(data) => {
                    attachments.push(data.attachment.clone());
                    if let Some(file) = &data.file {
                        files.push(file.clone());
                    }
                }
                _ => {}
            }
        }
        let content = self.extract_content();
        SendMessage {
            content: (!content.is_empty()).then_some(content),
            embeds: non_empty(embeds),
            message_reference: reference,
            components: non_empty(components),
            sticker_ids: non_empty(sticker_ids),
            attachments: non_empty(attachments),
            files: non_empty(files),
        }
    }

    /// The edit-message field set: the same projection minus the reference,
    /// which cannot be changed after sending.
    pub fn to_edit_payload(&self) -> EditMessage {
        let payload = self.to_payload();
        EditMessage {
            content: payload.content,
            embeds: payload.embeds,
            components: payload.components,
            attachments: payload.attachments,
            files: payload.files,
        }
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// Normalizes a message, segment, or bare string and serializes it into the
/// send-message field set.
pub fn parse_message(message: impl Into<Message>) -> SendMessage {
    message.into().to_payload()
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

impl From<Segment> for Message {
    fn from(segment: Segment) -> Self {
        Self(vec![segment])
    }
}

impl From<Vec<Segment>> for Message {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self(vec![Segment::text(text)])
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self(vec![Segment::text(text)])
    }
}

impl FromIterator<Segment> for Message {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Segment> for Message {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Message {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Into<Message>> Add<T> for Message {
    type Output = Message;

    fn add(mut self, rhs: T) -> Message {
        self.0.extend(rhs.into().0);
        self
    }
}

impl<T: Into<Message>> AddAssign<T> for Message {
    fn add_assign(&mut self, rhs: T) {
        self.0.extend(rhs.into().0);
    }
}

impl Add<Message> for &str {
    type Output = Message;

    fn add(self, rhs: Message) -> Message {
        Message::from(self) + rhs
    }
}
