use serde::de::DeserializeOwned;
use serde::Serialize;

/// An outbound API payload: `NAME` identifies the API call it feeds,
/// `Output` the response shape that call returns.
pub trait Payload: Serialize {
    const NAME: &'static str;
    type Output: DeserializeOwned + Clone;
}
