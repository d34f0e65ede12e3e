//! Lazy migration of a user's collections to the current soul schema.
//!
//! Older clients let the store pick an arbitrary soul for each collection
//! and stored members as `[key, soul]` pairs. Before a new member is added,
//! each collection still living under such a soul is copied, member by
//! member, to its current-schema soul and the user's link is repointed.

use nab_schema::{SchemaVersion, UserCollection};
use nab_store::NodeHandle;
use nab_types::{GraphValue, Node, Soul, UserSession};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::PeerResult;
use crate::peer::Peer;

/// A member stored in the legacy `[key, soul]` shape.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LegacyPair(pub String, pub Soul);

/// One field of a collection node, classified by shape.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionEntry {
    /// Already a `{"#": soul}` link.
    Canonical(Soul),
    /// A `[key, soul]` pair serialized into a text field.
    Legacy(LegacyPair),
    /// Anything else, carried over unchanged.
    Other(GraphValue),
}

impl CollectionEntry {
    pub fn classify(value: &GraphValue) -> Self {
        match value {
            GraphValue::Link(link) => CollectionEntry::Canonical(link.soul.clone()),
            GraphValue::Text(text) => match serde_json::from_str::<LegacyPair>(text) {
                Ok(pair) => CollectionEntry::Legacy(pair),
                Err(_) => CollectionEntry::Other(value.clone()),
            },
            other => CollectionEntry::Other(other.clone()),
        }
    }

    /// The canonical value for this entry.
    pub fn into_canonical(self) -> GraphValue {
        match self {
            CollectionEntry::Canonical(soul) => GraphValue::link(&soul),
            CollectionEntry::Legacy(LegacyPair(_, soul)) => GraphValue::link(&soul),
            CollectionEntry::Other(value) => value,
        }
    }
}

/// Rewrite every legacy pair in a collection node into a link, keeping
/// field keys.
pub fn canonicalize_collection(node: &Node) -> Node {
    node.iter()
        .map(|(key, value)| (key.clone(), CollectionEntry::classify(value).into_canonical()))
        .collect()
}

/// A collection that was moved to its current-schema soul.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionUpgrade {
    pub collection: UserCollection,
    pub from: Soul,
    pub to: Soul,
    pub fields: usize,
}

impl Peer {
    /// Migrate the logged-in user's collections to the current schema.
    ///
    /// A no-op when anonymous, and for every collection that is missing or
    /// already current. Returns the collections that were moved.
    pub async fn upgrade_souls(&self) -> PeerResult<Vec<CollectionUpgrade>> {
        match self.is_logged_in() {
            Some(user) => self.upgrade_collections(&user).await,
            None => Ok(Vec::new()),
        }
    }

    pub(crate) async fn upgrade_collections(
        &self,
        user: &UserSession,
    ) -> PeerResult<Vec<CollectionUpgrade>> {
        let root = self.user_root(user)?;
        let (things, comments, submissions) = tokio::try_join!(
            self.upgrade_collection(&root, user, UserCollection::Things),
            self.upgrade_collection(&root, user, UserCollection::Comments),
            self.upgrade_collection(&root, user, UserCollection::Submissions),
        )?;
        Ok([things, comments, submissions].into_iter().flatten().collect())
    }

    async fn upgrade_collection(
        &self,
        root: &NodeHandle,
        user: &UserSession,
        collection: UserCollection,
    ) -> PeerResult<Option<CollectionUpgrade>> {
        let Some(current) = root.follow(collection.name()).await? else {
            debug!(%collection, "no collection to upgrade");
            return Ok(None);
        };
        if self.schema().collection_version(collection, current.soul()) == SchemaVersion::Current {
            return Ok(None);
        }

        let target = self.schema().user_collection(&user.pub_key, collection)?;
        let fields = canonicalize_collection(&current.get().await?.unwrap_or_default());
        info!(from = %current.soul(), to = %target, fields = fields.len(), "upgrading collection");

        let upgrade = CollectionUpgrade {
            collection,
            from: current.soul().clone(),
            to: target.clone(),
            fields: fields.len(),
        };
        self.store().put(&target, fields).await?;
        root.link(collection.name(), &target).await?;
        Ok(Some(upgrade))
    }
}
