//! End-to-end properties of the message model.
//!
//! Each test drives the full pipeline: raw text through the tokenizer into
//! a message, and a message through the serializer into the send-message
//! field set.

use corded::types::{
    parse_message, AttachmentSend, File, Message, MessageReference, Segment, TimestampStyle,
};
use serde_json::json;

#[test]
fn textual_segments_round_trip_through_extract_content() {
    let message: Message = [
        Segment::mention_everyone(),
        Segment::text("meet "),
        Segment::mention_user(42u64),
        Segment::text(" in "),
        Segment::mention_channel(7u64),
        Segment::text(" at "),
        Segment::timestamp(1700000000, Some(TimestampStyle::ShortTime)),
        Segment::text(" "),
        Segment::custom_emoji("tada", 55u64, false),
    ]
    .into_iter()
    .collect();
    assert_eq!(Message::parse(&message.extract_content()), message);
}

#[test]
fn serialization_is_idempotent() {
    let message = Message::parse("hi <@1>")
        + Segment::sticker(3u64)
        + Segment::reference(MessageReference::to(9u64));
    assert_eq!(message.to_payload(), message.to_payload());
}

#[test]
fn malformed_markup_degrades_to_literal_text() {
    assert_eq!(
        Message::parse("<:bad>"),
        Message::from(vec![Segment::text("<:bad>")])
    );
    assert_eq!(
        Message::parse("<t:abc>"),
        Message::from(vec![Segment::text("<t:abc>")])
    );
}

#[test]
fn last_reference_wins() {
    let message: Message = [
        Segment::reference(1u64),
        Segment::text("hi"),
        Segment::reference(2u64),
    ]
    .into_iter()
    .collect();
    let value = serde_json::to_value(message.to_payload()).unwrap();
    assert_eq!(
        value,
        json!({
            "content": "hi",
            "message_reference": {"message_id": "2"},
        })
    );
}

#[test]
fn files_keep_segment_order_and_skip_byteless_attachments() {
    let message: Message = [
        Segment::attachment(
            File {
                filename: "one.png".into(),
                content: b"one".to_vec(),
            },
            None,
            None,
        ),
        Segment::attachment("two.png", None, None),
        Segment::attachment(
            File {
                filename: "three.png".into(),
                content: b"three".to_vec(),
            },
            None,
            None,
        ),
    ]
    .into_iter()
    .collect();
    let payload = message.to_payload();
    let attachments = payload.attachments.unwrap();
    assert_eq!(attachments.len(), 3);
    let files = payload.files.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].content, b"one".to_vec());
    assert_eq!(files[1].content, b"three".to_vec());
}

#[test]
fn bare_string_serializes_as_content() {
    let payload = parse_message("hello");
    let value = serde_json::to_value(payload).unwrap();
    assert_eq!(value, json!({"content": "hello"}));
}

#[test]
fn serializer_normalizes_bare_segments() {
    let payload = parse_message(Segment::sticker(5u64));
    let value = serde_json::to_value(payload).unwrap();
    assert_eq!(value, json!({"sticker_ids": ["5"]}));
}

#[test]
fn empty_message_serializes_to_no_fields() {
    let value = serde_json::to_value(Message::new().to_payload()).unwrap();
    assert_eq!(value, json!({}));
}

#[test]
fn edit_payload_carries_no_reference() {
    let message: Message = [
        Segment::text("edited"),
        Segment::reference(1u64),
        Segment::attachment(
            AttachmentSend {
                filename: "a.png".into(),
                description: None,
            },
            None,
            None,
        ),
    ]
    .into_iter()
    .collect();
    let value = serde_json::to_value(message.to_edit_payload()).unwrap();
    assert_eq!(
        value,
        json!({
            "content": "edited",
            "attachments": [{"filename": "a.png"}],
        })
    );
}

#[test]
fn segment_wire_form_survives_a_round_trip() {
    let message = Message::parse("hey <@!42> <a:wave:3>") + Segment::sticker(8u64);
    let value = serde_json::to_value(&message).unwrap();
    let back: Message = serde_json::from_value(value).unwrap();
    assert_eq!(back, message);
}
