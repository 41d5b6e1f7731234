//! Traffic-type table entries.

use serde::{Deserialize, Serialize};

/// A kind of rail traffic the departure board can be filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficType {
    /// Small key the front-end submits, e.g. "2".
    pub key: String,

    /// Display name, e.g. "Cercanías".
    pub name: String,

    /// Value the portal expects in its `trafficType` form field, e.g. "cercanias".
    pub value: String,
}

impl TrafficType {
    pub fn new(key: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}
