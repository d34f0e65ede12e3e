//! Derivation of a thing's content hash and identifier.

use nab_types::{ContentHash, ThingData, ThingKind};
use serde::Serialize;
use tracing::debug;

use crate::hasher::{ContentHasher, HasherError};

/// The two hashes that address a thing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThingAddress {
    /// Hash of the full raw payload.
    pub original_hash: ContentHash,
    /// Hash of the linkage fields plus `original_hash`.
    pub id: ContentHash,
}

/// The record a thing id is computed over.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThingIdRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    kind: ThingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    op_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_id: Option<&'a str>,
    original_hash: ContentHash,
}

/// Compute `originalHash` over the payload, then the thing `id` over the
/// linkage fields and `originalHash`.
///
/// Two payloads with identical content but different linkage get different
/// ids; identical payloads always get the same id.
pub fn address_thing(data: &ThingData) -> Result<ThingAddress, HasherError> {
    let original_hash = ContentHasher::CONTENT.hash_json(data)?;
    let record = ThingIdRecord {
        timestamp: data.timestamp,
        kind: data.kind,
        topic: data.topic.as_deref(),
        author_id: data.author_id.as_deref(),
        op_id: data.op_id.as_deref(),
        reply_to_id: data.reply_to_id.as_deref(),
        original_hash,
    };
    let id = ContentHasher::THING.hash_json(&record)?;
    debug!(id = %id.short_hex(), original = %original_hash.short_hex(), "addressed thing");
    Ok(ThingAddress { original_hash, id })
}
