//! Write and index API of the notabug peer.
//!
//! A [`Peer`] bundles the graph store, the soul schema and the session
//! accessor, and is passed explicitly to every operation. Entry points
//! ([`Peer::submit`], [`Peer::comment`], [`Peer::chat`],
//! [`Peer::write_page`], [`Peer::vote`]) funnel through
//! [`Peer::put_thing`], which content-addresses the payload, writes the
//! body and metadata nodes, and hands the thing to the indexer.

pub mod config;
pub mod error;
pub mod peer;
pub mod read;
pub mod session;
pub mod thing;
pub mod upgrade;
pub mod write;

pub use config::PeerConfig;
pub use error::{PeerError, PeerResult};
pub use peer::Peer;
pub use session::{Anonymous, MemorySession, SessionProvider};
pub use thing::ThingHandle;
pub use upgrade::{canonicalize_collection, CollectionEntry, CollectionUpgrade, LegacyPair};
pub use write::{PageWrite, VoteHandle};

// Re-export key types
pub use nab_index::{IndexReport, Indexing};
pub use nab_schema::{Schema, UserCollection};
pub use nab_store::{GraphStore, InMemoryGraphStore, NodeHandle};
pub use nab_types::{ContentHash, DayBucket, Node, Soul, ThingData, ThingKind, UserSession, VoteKind};
