//! JSON text encoding of slot sequences.
//!
//! A payload must be a JSON array. Elements are decoded one by one so that a
//! single damaged element only costs its own slot.

use serde_json::Value;
use thiserror::Error;

use crate::descriptor::ItemDescriptor;

/// Payload-level decode failures. The whole sequence is unusable.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Not JSON at all.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// JSON, but not an array.
    #[error("payload is a JSON {0}, expected an array")]
    NotAnArray(&'static str),
}

/// One decoded sequence element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedSlot {
    /// `null`: the slot was empty.
    Empty,
    /// A well-formed descriptor.
    Item(ItemDescriptor),
    /// An element that is neither `null` nor a valid descriptor.
    Malformed(String),
}

impl DecodedSlot {
    /// The descriptor, if this element holds one.
    pub fn item(&self) -> Option<&ItemDescriptor> {
        match self {
            DecodedSlot::Item(item) => Some(item),
            _ => None,
        }
    }
}

/// Serialize a sequence to its persisted text form.
pub fn encode_sequence(slots: &[Option<ItemDescriptor>]) -> Result<String, serde_json::Error> {
    serde_json::to_string(slots)
}

/// Parse a persisted sequence.
pub fn decode_sequence(payload: &str) -> Result<Vec<DecodedSlot>, CodecError> {
    let elements = match serde_json::from_str::<Value>(payload)? {
        Value::Array(elements) => elements,
        other => return Err(CodecError::NotAnArray(json_type_name(&other))),
    };

    Ok(elements.into_iter().map(decode_element).collect())
}

fn decode_element(element: Value) -> DecodedSlot {
    if element.is_null() {
        return DecodedSlot::Empty;
    }
    match serde_json::from_value::<ItemDescriptor>(element) {
        Ok(item) => DecodedSlot::Item(item),
        Err(err) => DecodedSlot::Malformed(err.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
