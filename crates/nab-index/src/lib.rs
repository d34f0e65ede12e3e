//! Secondary indexes for the notabug peer.
//!
//! After a thing is written, the [`Indexer`] adds it to every bucket it
//! belongs to so it can be discovered by topic, by day, by domain, by url
//! and through its thread.
//!
//! # Key Types
//!
//! - [`Indexer`] -- Fans a thing out into its buckets
//! - [`Indexing`] -- Outcome of an index call (skipped, done, or deferred)
//! - [`IndexReport`] -- The buckets a thing was added to
//! - [`domain_bucket`] -- Domain name a submission is filed under

pub mod domain;
pub mod error;
pub mod indexer;
pub mod outcome;

pub use domain::domain_bucket;
pub use error::{IndexError, IndexResult};
pub use indexer::Indexer;
pub use outcome::{IndexReport, Indexing};
