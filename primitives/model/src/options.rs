//! Descriptor option values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single option discovered on a descriptor element.
///
/// Options are carried name-first; the value is a JSON scalar (or, for
/// aggregate options, a JSON string holding the aggregate text as written in
/// the proto source).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    /// Option name as written in the proto file, without parentheses.
    pub name: String,
    /// Option value.
    pub value: Value,
}

impl OptionValue {
    /// Create a new option value.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// The option value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> { self.value.as_bool() }

    /// The option value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> { self.value.as_str() }
}
