pub mod error;
pub mod payload;
pub mod utils;

/// Types used in the Discord message protocol.
pub mod types;
