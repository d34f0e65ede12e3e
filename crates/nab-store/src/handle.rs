//! A store handle bound to one soul.

use std::sync::Arc;

use nab_types::{GraphValue, Node, NodeExt, Soul};
use tokio::sync::broadcast::error::RecvError;

use crate::error::{StoreError, StoreResult};
use crate::router::NodeStream;
use crate::traits::GraphStore;

/// A handle to the node at one soul.
///
/// Handles are cheap to clone and carry no cached state: every read goes to
/// the store.
#[derive(Clone)]
pub struct NodeHandle {
    store: Arc<dyn GraphStore>,
    soul: Soul,
}

impl NodeHandle {
    pub fn new(store: Arc<dyn GraphStore>, soul: Soul) -> Self {
        Self { store, soul }
    }

    pub fn soul(&self) -> &Soul {
        &self.soul
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// A handle to another soul on the same store.
    pub fn sibling(&self, soul: Soul) -> NodeHandle {
        NodeHandle::new(Arc::clone(&self.store), soul)
    }

    pub async fn get(&self) -> StoreResult<Option<Node>> {
        self.store.get(&self.soul).await
    }

    pub async fn put(&self, fields: Node) -> StoreResult<()> {
        self.store.put(&self.soul, fields).await
    }

    /// Write a single field.
    pub async fn put_field(&self, field: &str, value: GraphValue) -> StoreResult<()> {
        let mut fields = Node::new();
        fields.insert(field.to_string(), value);
        self.put(fields).await
    }

    /// Point `field` at `target`.
    pub async fn link(&self, field: &str, target: &Soul) -> StoreResult<()> {
        self.put_field(field, GraphValue::link(target)).await
    }

    /// Add `member` to this bucket.
    pub async fn set(&self, member: &Soul) -> StoreResult<()> {
        self.store.set(&self.soul, member).await
    }

    /// Follow the link in `field`, if the node exists and the field is a link.
    pub async fn follow(&self, field: &str) -> StoreResult<Option<NodeHandle>> {
        let node = self.get().await?;
        Ok(node
            .as_ref()
            .and_then(|n| n.link(field))
            .map(|soul| self.sibling(soul.clone())))
    }

    /// Souls of every member linked from this node, in soul order.
    pub async fn members(&self) -> StoreResult<Vec<Soul>> {
        let mut souls = self
            .get()
            .await?
            .map(|n| n.linked_souls())
            .unwrap_or_default();
        souls.sort();
        Ok(souls)
    }

    /// Await the first state of this node in which `field` is a link, and
    /// return a handle to its target.
    ///
    /// Like [`first_value`](Self::first_value) this fires once and detaches.
    pub async fn first_link(&self, field: &str) -> StoreResult<NodeHandle> {
        let mut stream = self.subscribe();
        if let Some(next) = self.follow(field).await? {
            return Ok(next);
        }
        loop {
            match stream.recv().await {
                Ok(node) => {
                    if let Some(soul) = node.link(field) {
                        return Ok(self.sibling(soul.clone()));
                    }
                }
                Err(RecvError::Lagged(_)) => {
                    if let Some(next) = self.follow(field).await? {
                        return Ok(next);
                    }
                }
                Err(RecvError::Closed) => {
                    return Err(StoreError::SubscriptionClosed(self.soul.clone()))
                }
            }
        }
    }

    pub fn subscribe(&self) -> NodeStream {
        self.store.subscribe(&self.soul)
    }

    /// Await the first non-empty state of this node.
    pub async fn first_value(&self) -> StoreResult<Node> {
        self.store.first_value(&self.soul).await
    }
}

impl std::fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeHandle").field("soul", &self.soul).finish()
    }
}
