//! Graph store adapter for the notabug peer.
//!
//! The peer writes into an external, eventually-consistent graph database
//! whose nodes are addressed by [`Soul`](nab_types::Soul). This crate defines
//! the narrow interface the peer consumes and an in-memory implementation.
//!
//! # Operations
//!
//! - `get(soul)` -- read the current node, if any
//! - `put(soul, fields)` -- merge fields into a node (field-level last write wins)
//! - `set(bucket, member)` -- add a member link to a bucket (set union)
//! - `subscribe(soul)` -- receive every subsequent state of a node
//! - `first_value(soul)` -- await the first non-empty state, then detach
//!
//! # Storage Backends
//!
//! - [`InMemoryGraphStore`] -- `HashMap`-based store for tests, embedding and the CLI
//!
//! # Design Rules
//!
//! 1. Addresses are computed by callers; the store never derives souls.
//! 2. Bucket membership is keyed by the member soul, so repeated adds collapse.
//! 3. The store never interprets node contents beyond links.
//! 4. Errors are propagated opaquely; there is no retry policy here.

pub mod error;
pub mod handle;
pub mod memory;
pub mod router;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use handle::NodeHandle;
pub use memory::InMemoryGraphStore;
pub use router::NodeStream;
pub use traits::GraphStore;
