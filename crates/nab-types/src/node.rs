//! Graph field values and nodes.
//!
//! A node is a flat map of field name to [`GraphValue`]. Nested structure is
//! expressed only through [`Link`] values pointing at other souls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::soul::{Link, Soul};

/// A single field value stored in a graph node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Link(Link),
}

impl GraphValue {
    pub fn link(soul: &Soul) -> Self {
        GraphValue::Link(soul.link())
    }

    pub fn text(s: impl Into<String>) -> Self {
        GraphValue::Text(s.into())
    }

    pub fn as_link(&self) -> Option<&Soul> {
        match self {
            GraphValue::Link(link) => Some(&link.soul),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            GraphValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            GraphValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GraphValue::Null)
    }
}

impl From<Soul> for GraphValue {
    fn from(soul: Soul) -> Self {
        GraphValue::Link(Link { soul })
    }
}

impl From<&str> for GraphValue {
    fn from(s: &str) -> Self {
        GraphValue::Text(s.to_string())
    }
}

impl From<String> for GraphValue {
    fn from(s: String) -> Self {
        GraphValue::Text(s)
    }
}

impl From<i64> for GraphValue {
    fn from(n: i64) -> Self {
        GraphValue::Int(n)
    }
}

impl From<bool> for GraphValue {
    fn from(b: bool) -> Self {
        GraphValue::Bool(b)
    }
}

/// The field map of a graph node, ordered by field name.
pub type Node = BTreeMap<String, GraphValue>;

/// Typed accessors over a [`Node`].
pub trait NodeExt {
    /// The soul a field links to, if the field is a link.
    fn link(&self, field: &str) -> Option<&Soul>;

    /// The text value of a field, if the field is text.
    fn text(&self, field: &str) -> Option<&str>;

    /// Every soul linked from this node, in field order.
    fn linked_souls(&self) -> Vec<Soul>;

    /// Convert any serializable record into a node.
    fn from_record<T: Serialize>(record: &T) -> Result<Node, TypeError>;

    /// Decode this node into a typed record.
    fn to_record<T: serde::de::DeserializeOwned>(&self) -> Result<T, TypeError>;
}

impl NodeExt for Node {
    fn link(&self, field: &str) -> Option<&Soul> {
        self.get(field).and_then(GraphValue::as_link)
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(GraphValue::as_text)
    }

    fn linked_souls(&self) -> Vec<Soul> {
        self.values()
            .filter_map(GraphValue::as_link)
            .cloned()
            .collect()
    }

    fn from_record<T: Serialize>(record: &T) -> Result<Node, TypeError> {
        let value =
            serde_json::to_value(record).map_err(|e| TypeError::Serialization(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    fn to_record<T: serde::de::DeserializeOwned>(&self) -> Result<T, TypeError> {
        let value =
            serde_json::to_value(self).map_err(|e| TypeError::Serialization(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
