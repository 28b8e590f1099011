/// Outbound send/edit message payloads.
pub mod action;
/// Discord API schema types.
pub mod api;
/// Inbound message events.
pub mod event;
/// The ordered segment container, tokenizer and adapters.
pub mod message;
/// The segment taxonomy.
pub mod segment;

pub use action::{EditMessage, SendMessage};
pub use api::*;
pub use event::MessageGet;
pub use message::{parse_message, tokenize, Message, Tokenizer};
pub use segment::*;
pub use serde_json::Value;
