// Response records for the eBay REST APIs

pub mod account;
pub mod browse;
pub mod inventory;
pub mod orders;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A response decoded into a typed record, or the raw JSON when its shape
/// does not match the record
///
/// A decoded record keeps the JSON it came from, so fields the record does
/// not model are never lost.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Decoded { record: T, json: Value },
    Raw(Value),
}

impl<T: DeserializeOwned> Decoded<T> {
    pub fn decode(value: Value) -> Self {
        match T::deserialize(&value) {
            Ok(record) => Decoded::Decoded {
                record,
                json: value,
            },
            Err(e) => {
                tracing::debug!(
                    record = std::any::type_name::<T>(),
                    error = %e,
                    "Response did not match record shape, keeping raw JSON"
                );
                Decoded::Raw(value)
            }
        }
    }
}

impl<T> Decoded<T> {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Decoded::Decoded { .. })
    }

    pub fn as_decoded(&self) -> Option<&T> {
        match self {
            Decoded::Decoded { record, .. } => Some(record),
            Decoded::Raw(_) => None,
        }
    }

    pub fn into_decoded(self) -> Option<T> {
        match self {
            Decoded::Decoded { record, .. } => Some(record),
            Decoded::Raw(_) => None,
        }
    }

    /// JSON of a response that did not match the record
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Decoded::Decoded { .. } => None,
            Decoded::Raw(value) => Some(value),
        }
    }

    /// Response JSON as received, for either variant
    pub fn json(&self) -> &Value {
        match self {
            Decoded::Decoded { json, .. } => json,
            Decoded::Raw(value) => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Decoded::Decoded { json, .. } => json,
            Decoded::Raw(value) => value,
        }
    }
}
