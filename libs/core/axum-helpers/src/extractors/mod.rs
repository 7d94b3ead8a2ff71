//! Request extractors that reject with the shared error envelope.

pub mod validated_json;

pub use validated_json::ValidatedJson;
