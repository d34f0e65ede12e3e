//! Foundation types for the notabug peer.
//!
//! This crate provides the addressing, value and payload types shared by
//! every other `nab-*` crate. It performs no I/O.
//!
//! # Key Types
//!
//! - [`Soul`] -- Deterministic storage address of a graph node
//! - [`Link`] -- A `{"#": soul}` reference from one node to another
//! - [`GraphValue`] / [`Node`] -- Field values and the field map of a node
//! - [`ContentHash`] -- BLAKE3 content hash used for thing ids
//! - [`ThingKind`] / [`VoteKind`] -- Literal content and vote kinds
//! - [`ThingData`] -- The raw payload of a submission, comment, chat message or page
//! - [`DayBucket`] -- UTC `year/month/day` partition of a timestamp
//! - [`UserSession`] -- Authenticated identity (`alias`, public key)

pub mod error;
pub mod hash;
pub mod identity;
pub mod node;
pub mod soul;
pub mod temporal;
pub mod thing;

pub use error::TypeError;
pub use hash::ContentHash;
pub use identity::UserSession;
pub use node::{GraphValue, Node, NodeExt};
pub use soul::{Link, Soul};
pub use temporal::{now_millis, DayBucket};
pub use thing::{ThingData, ThingKind, VoteKind, CATCH_ALL_TOPIC};
