use std::fmt;

use serde::{Deserialize, Serialize};

/// Deterministic storage address of a graph node.
///
/// Souls are derived purely from an entity's key fields (see `nab-schema`),
/// so concurrent writers of the same logical entity converge on one node.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Soul(String);

impl Soul {
    pub fn new(soul: impl Into<String>) -> Self {
        Self(soul.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A link value pointing at this soul.
    pub fn link(&self) -> Link {
        Link { soul: self.clone() }
    }
}

impl fmt::Debug for Soul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Soul({})", self.0)
    }
}

impl fmt::Display for Soul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Soul {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Soul {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Soul {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A reference from one node's field to another node.
///
/// Serializes as `{"#": "<soul>"}`, the wire shape of the graph store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "#")]
    pub soul: Soul,
}

impl From<Soul> for Link {
    fn from(soul: Soul) -> Self {
        Self { soul }
    }
}
