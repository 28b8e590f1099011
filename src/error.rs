use thiserror::Error;

#[derive(Error, Debug)]
pub enum CordedError {
    #[error("invalid {kind} segment: {reason}")]
    Validation { kind: String, reason: String },
    #[error("expected {expected} segment, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
    #[error("Serde Error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl CordedError {
    pub(crate) fn validation(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}
