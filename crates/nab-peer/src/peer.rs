use std::sync::Arc;

use nab_index::Indexer;
use nab_schema::Schema;
use nab_store::{GraphStore, InMemoryGraphStore, NodeHandle};
use nab_types::{Soul, UserSession};

use crate::config::PeerConfig;
use crate::error::PeerResult;
use crate::session::SessionProvider;

/// The context every write and read runs against.
///
/// Cloning a `Peer` is cheap; clones share the store, schema and session.
#[derive(Clone)]
pub struct Peer {
    store: Arc<dyn GraphStore>,
    schema: Arc<Schema>,
    session: Arc<dyn SessionProvider>,
    indexer: Indexer,
}

impl Peer {
    pub fn new(
        store: Arc<dyn GraphStore>,
        session: Arc<dyn SessionProvider>,
        config: &PeerConfig,
    ) -> PeerResult<Self> {
        Ok(Self::with_schema(store, Arc::new(config.schema()?), session))
    }

    pub fn with_schema(
        store: Arc<dyn GraphStore>,
        schema: Arc<Schema>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let indexer = Indexer::new(Arc::clone(&store), Arc::clone(&schema));
        Self {
            store,
            schema,
            session,
            indexer,
        }
    }

    /// A peer over a fresh in-memory store.
    pub fn in_memory(session: Arc<dyn SessionProvider>, config: &PeerConfig) -> PeerResult<Self> {
        let store = Arc::new(InMemoryGraphStore::with_capacity(config.channel_capacity));
        Self::new(store, session, config)
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }

    /// The logged-in identity, if any.
    pub fn is_logged_in(&self) -> Option<UserSession> {
        self.session.current()
    }

    /// A handle bound to `soul`.
    pub fn node(&self, soul: Soul) -> NodeHandle {
        NodeHandle::new(Arc::clone(&self.store), soul)
    }

    /// The root node of a user's namespace.
    pub(crate) fn user_root(&self, user: &UserSession) -> PeerResult<NodeHandle> {
        Ok(self.node(self.schema.user_root(&user.pub_key)?))
    }
}

impl std::fmt::Debug for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer")
            .field("namespace", &self.schema.namespace())
            .field("user", &self.session.current().map(|u| u.alias))
            .finish()
    }
}
