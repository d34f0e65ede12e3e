//! Soul registry for the notabug peer.
//!
//! Every entity the peer writes has a soul derived purely from its key
//! fields, never from write order, so concurrent writers converge on the
//! same node and the store's merge semantics resolve field updates.
//!
//! # Architecture
//!
//! - **Templates** are path patterns such as `nab/things/:thingid`. A
//!   template fills key fields into a soul, and tests whether an existing
//!   soul was built from it.
//! - **The schema** is the fixed set of templates for things, thing data,
//!   vote and comment buckets, topics, days, domains, urls and user
//!   collections, under a configurable namespace.
//! - **User collections** exist under legacy (arbitrary) souls or the
//!   current template; [`Schema::collection_version`] tells them apart.
//!
//! # Modules
//!
//! - [`error`] -- Error types for schema operations
//! - [`template`] -- [`SoulTemplate`] parsing, filling and matching
//! - [`schema`] -- The [`Schema`] registry and [`Entity`] kinds
//! - [`collection`] -- [`UserCollection`] names and [`SchemaVersion`]

pub mod collection;
pub mod error;
pub mod schema;
pub mod template;

pub use collection::{SchemaVersion, UserCollection};
pub use error::{Result, SchemaError};
pub use schema::{validate_namespace, Entity, Schema, DEFAULT_NAMESPACE};
pub use template::SoulTemplate;
