use nab_types::ContentHash;
use serde_json::Value;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"nab-content-v1"`) that is
/// prepended to every hash computation, so a payload hash and a thing id
/// over identical bytes never collide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for raw thing payloads (`originalHash`).
    pub const CONTENT: Self = Self {
        domain: "nab-content-v1",
    };
    /// Hasher for thing identifiers.
    pub const THING: Self = Self {
        domain: "nab-thing-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ContentHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as canonical JSON with domain separation.
    ///
    /// Object keys are sorted at every depth before hashing, so field
    /// insertion order never changes the result.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ContentHash, HasherError> {
        let value =
            serde_json::to_value(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&canonical_json(&value)))
    }
}

/// Serialize a JSON value with object keys sorted at every depth.
pub fn canonical_json(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(&Value::String(key.clone()), out);
                out.push(b':');
                write_canonical(&map[key], out);
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out);
            }
            out.push(b']');
        }
        // Scalars have a single JSON rendering.
        scalar => out.extend_from_slice(scalar.to_string().as_bytes()),
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
