//! Content addressing for the notabug peer.
//!
//! Provides a domain-separated BLAKE3 hasher over canonical (sorted-key)
//! JSON, and the two-step derivation of a thing's `originalHash` and `id`.
//!
//! All hashing wraps established libraries; there is no custom cryptography.

pub mod address;
pub mod hasher;

pub use address::{address_thing, ThingAddress};
pub use hasher::{canonical_json, ContentHasher, HasherError};
