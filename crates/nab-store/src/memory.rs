use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use nab_types::{Node, Soul};
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::router::{NodeStream, SubscriptionRouter};
use crate::traits::GraphStore;

/// Default per-soul subscription buffer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// In-memory, HashMap-based graph store.
///
/// Intended for tests, embedding and the CLI. Nodes are held behind a
/// `RwLock`; writes merge field-by-field and are then broadcast to
/// subscribers of the written soul.
pub struct InMemoryGraphStore {
    nodes: RwLock<HashMap<Soul, Node>>,
    router: SubscriptionRouter,
}

impl InMemoryGraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new empty store with the given subscription buffer size.
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            router: SubscriptionRouter::new(channel_capacity),
        }
    }

    /// Rebuild a store from a snapshot taken with [`snapshot`](Self::snapshot).
    pub fn from_snapshot(snapshot: BTreeMap<Soul, Node>, channel_capacity: usize) -> Self {
        Self {
            nodes: RwLock::new(snapshot.into_iter().collect()),
            router: SubscriptionRouter::new(channel_capacity),
        }
    }

    /// Decode a snapshot from its JSON form.
    pub fn from_json(json: &str, channel_capacity: usize) -> StoreResult<Self> {
        let snapshot: BTreeMap<Soul, Node> =
            serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Self::from_snapshot(snapshot, channel_capacity))
    }

    /// Every node, ordered by soul.
    pub fn snapshot(&self) -> BTreeMap<Soul, Node> {
        let map = self.nodes.read().expect("lock poisoned");
        map.iter().map(|(s, n)| (s.clone(), n.clone())).collect()
    }

    /// Encode the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Number of nodes currently stored.
    pub fn len(&self) -> usize {
        self.nodes.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.read().expect("lock poisoned").is_empty()
    }

    /// A sorted list of all souls in the store.
    pub fn souls(&self) -> Vec<Soul> {
        let map = self.nodes.read().expect("lock poisoned");
        let mut souls: Vec<Soul> = map.keys().cloned().collect();
        souls.sort();
        souls
    }

    /// Number of souls with live subscription channels.
    pub fn subscription_count(&self) -> usize {
        self.router.channel_count()
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn get(&self, soul: &Soul) -> StoreResult<Option<Node>> {
        let map = self.nodes.read().expect("lock poisoned");
        Ok(map.get(soul).cloned())
    }

    async fn put(&self, soul: &Soul, fields: Node) -> StoreResult<()> {
        let merged = {
            let mut map = self.nodes.write().expect("lock poisoned");
            let node = map.entry(soul.clone()).or_default();
            node.extend(fields);
            node.clone()
        };
        trace!(%soul, fields = merged.len(), "put");
        self.router.route(soul, &merged);
        Ok(())
    }

    fn subscribe(&self, soul: &Soul) -> NodeStream {
        self.router.subscribe(soul)
    }
}

impl std::fmt::Debug for InMemoryGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryGraphStore")
            .field("node_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nab_types::{GraphValue, NodeExt};
    use std::sync::Arc;
    use std::time::Duration;

    fn fields(pairs: &[(&str, &str)]) -> Node {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), GraphValue::text(*v)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Core get/put
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn put_then_get() {
        let store = InMemoryGraphStore::new();
        let soul = Soul::from("nab/things/a");
        store.put(&soul, fields(&[("title", "hi")])).await.unwrap();
        let node = store.get(&soul).await.unwrap().expect("should exist");
        assert_eq!(node.text("title"), Some("hi"));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryGraphStore::new();
        assert!(store.get(&Soul::from("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_merges_fields() {
        let store = InMemoryGraphStore::new();
        let soul = Soul::from("n");
        store.put(&soul, fields(&[("a", "1"), ("b", "1")])).await.unwrap();
        store.put(&soul, fields(&[("b", "2"), ("c", "2")])).await.unwrap();
        let node = store.get(&soul).await.unwrap().unwrap();
        assert_eq!(node.text("a"), Some("1"));
        assert_eq!(node.text("b"), Some("2"));
        assert_eq!(node.text("c"), Some("2"));
    }

    // -----------------------------------------------------------------------
    // Set semantics
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn set_is_union_keyed_by_member() {
        let store = InMemoryGraphStore::new();
        let bucket = Soul::from("nab/t/news");
        let a = Soul::from("nab/things/a");
        let b = Soul::from("nab/things/b");
        store.set(&bucket, &a).await.unwrap();
        store.set(&bucket, &b).await.unwrap();
        store.set(&bucket, &a).await.unwrap();
        let node = store.get(&bucket).await.unwrap().unwrap();
        assert_eq!(node.len(), 2);
        assert_eq!(node.linked_souls(), vec![a, b]);
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn subscribers_receive_merged_state() {
        let store = InMemoryGraphStore::new();
        let soul = Soul::from("n");
        store.put(&soul, fields(&[("a", "1")])).await.unwrap();
        let mut stream = store.subscribe(&soul);
        store.put(&soul, fields(&[("b", "2")])).await.unwrap();
        let node = stream.recv().await.unwrap();
        assert_eq!(node.len(), 2);
    }

    #[tokio::test]
    async fn first_value_resolves_immediately_when_present() {
        let store = InMemoryGraphStore::new();
        let soul = Soul::from("n");
        store.put(&soul, fields(&[("a", "1")])).await.unwrap();
        let node = store.first_value(&soul).await.unwrap();
        assert_eq!(node.text("a"), Some("1"));
        assert_eq!(store.subscription_count(), 1);
        // The receiver is gone; the next write prunes the channel.
        store.put(&soul, fields(&[("a", "2")])).await.unwrap();
        assert_eq!(store.subscription_count(), 0);
    }

    #[tokio::test]
    async fn one_shot_reads_do_not_accumulate_channels() {
        let store = InMemoryGraphStore::new();
        for i in 0..5 {
            let soul = Soul::new(format!("nab/things/root{i}/data"));
            store.put(&soul, fields(&[("topic", "news")])).await.unwrap();
            store.first_value(&soul).await.unwrap();
        }
        assert_eq!(store.subscription_count(), 1);
    }

    #[tokio::test]
    async fn first_value_waits_for_write_and_fires_once() {
        let store = Arc::new(InMemoryGraphStore::new());
        let soul = Soul::from("later");
        let waiter = {
            let store = Arc::clone(&store);
            let soul = soul.clone();
            tokio::spawn(async move { store.first_value(&soul).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.put(&soul, fields(&[("topic", "news")])).await.unwrap();
        let node = waiter.await.unwrap().unwrap();
        assert_eq!(node.text("topic"), Some("news"));

        store.put(&soul, fields(&[("topic", "other")])).await.unwrap();
        assert_eq!(store.subscription_count(), 0);
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn json_snapshot_roundtrip() {
        let store = InMemoryGraphStore::new();
        store.put(&Soul::from("a"), fields(&[("x", "1")])).await.unwrap();
        store.set(&Soul::from("bucket"), &Soul::from("a")).await.unwrap();
        let json = store.to_json().unwrap();

        let restored = InMemoryGraphStore::from_json(&json, 8).unwrap();
        assert_eq!(restored.snapshot(), store.snapshot());
        assert_eq!(restored.souls(), vec![Soul::from("a"), Soul::from("bucket")]);
    }

    #[tokio::test]
    async fn malformed_snapshot_is_rejected() {
        assert!(matches!(
            InMemoryGraphStore::from_json("[1,2]", 8),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn debug_format() {
        let store = InMemoryGraphStore::default();
        assert!(store.is_empty());
        let debug = format!("{store:?}");
        assert!(debug.contains("node_count"));
    }
}
