use async_trait::async_trait;
use nab_types::{GraphValue, Node, Soul};
use tokio::sync::broadcast::error::RecvError;

use crate::error::{StoreError, StoreResult};
use crate::router::NodeStream;

/// Soul-addressed graph store.
///
/// All implementations must satisfy these invariants:
/// - `put` merges fields into the node at `soul`, creating it if absent.
///   Fields not named in the write are left untouched.
/// - `set` is a set-union add: the member is keyed by its own soul, so
///   adding the same member twice leaves one entry.
/// - Every successful write is delivered to current subscribers of the soul
///   as the node's full post-write state.
/// - No operation retries or times out on its own.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Read a node by soul.
    ///
    /// Returns `Ok(None)` if nothing has been written at the soul.
    async fn get(&self, soul: &Soul) -> StoreResult<Option<Node>>;

    /// Merge `fields` into the node at `soul`.
    async fn put(&self, soul: &Soul, fields: Node) -> StoreResult<()>;

    /// Subscribe to every subsequent state of the node at `soul`.
    ///
    /// Dropping the returned stream detaches the subscription.
    fn subscribe(&self, soul: &Soul) -> NodeStream;

    /// Add `member` to the bucket node at `bucket`.
    async fn set(&self, bucket: &Soul, member: &Soul) -> StoreResult<()> {
        let mut fields = Node::new();
        fields.insert(member.to_string(), GraphValue::link(member));
        self.put(bucket, fields).await
    }

    /// Await the first non-empty state of the node at `soul`.
    ///
    /// Resolves immediately if the node already has data; otherwise waits
    /// for the first write. Fires once: the subscription is dropped as soon
    /// as a value is delivered.
    async fn first_value(&self, soul: &Soul) -> StoreResult<Node> {
        // Subscribe before reading so a write landing in between is not lost.
        let mut stream = self.subscribe(soul);
        if let Some(node) = self.get(soul).await? {
            if !node.is_empty() {
                return Ok(node);
            }
        }
        loop {
            match stream.recv().await {
                Ok(node) if !node.is_empty() => return Ok(node),
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => {
                    if let Some(node) = self.get(soul).await? {
                        if !node.is_empty() {
                            return Ok(node);
                        }
                    }
                }
                Err(RecvError::Closed) => return Err(StoreError::SubscriptionClosed(soul.clone())),
            }
        }
    }
}
