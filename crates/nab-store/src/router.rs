use std::collections::HashMap;
use std::sync::RwLock;

use nab_types::{Node, Soul};
use tokio::sync::broadcast;
use tracing::trace;

/// A broadcast receiver of node states for one soul.
pub type NodeStream = broadcast::Receiver<Node>;

/// Fan-out router delivering node states to per-soul subscribers.
pub struct SubscriptionRouter {
    channels: RwLock<HashMap<Soul, broadcast::Sender<Node>>>,
    capacity: usize,
}

impl SubscriptionRouter {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Register a subscriber for `soul`.
    ///
    /// Channels whose receivers have all been dropped are pruned first, so
    /// one-shot reads of souls that are never written again do not linger.
    pub fn subscribe(&self, soul: &Soul) -> NodeStream {
        let mut channels = self.channels.write().expect("router lock poisoned");
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        if channels.len() < before {
            trace!(pruned = before - channels.len(), "pruned subscription channels");
        }
        channels
            .entry(soul.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Deliver `node` to subscribers of `soul`.
    ///
    /// Channels with no remaining receivers are pruned.
    pub fn route(&self, soul: &Soul, node: &Node) {
        let mut channels = self.channels.write().expect("router lock poisoned");
        let stale = match channels.get(soul) {
            Some(sender) => sender.send(node.clone()).is_err(),
            None => return,
        };
        if stale {
            trace!(%soul, "pruning subscription channel");
            channels.remove(soul);
        }
    }

    /// Number of souls with at least one registered channel.
    pub fn channel_count(&self) -> usize {
        self.channels.read().expect("router lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nab_types::GraphValue;

    fn node(v: &str) -> Node {
        let mut n = Node::new();
        n.insert("v".into(), GraphValue::text(v));
        n
    }

    #[test]
    fn routes_only_to_matching_soul() {
        let router = SubscriptionRouter::new(8);
        let mut a = router.subscribe(&Soul::from("a"));
        let mut b = router.subscribe(&Soul::from("b"));
        router.route(&Soul::from("a"), &node("1"));
        assert_eq!(a.try_recv().unwrap(), node("1"));
        assert!(b.try_recv().is_err());
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let router = SubscriptionRouter::new(8);
        let rx = router.subscribe(&Soul::from("a"));
        assert_eq!(router.channel_count(), 1);
        drop(rx);
        router.route(&Soul::from("a"), &node("1"));
        assert_eq!(router.channel_count(), 0);
    }

    #[test]
    fn subscribing_prunes_abandoned_channels() {
        let router = SubscriptionRouter::new(8);
        for soul in ["root1/data", "root2/data"] {
            drop(router.subscribe(&Soul::from(soul)));
        }
        assert_eq!(router.channel_count(), 2);
        let _live = router.subscribe(&Soul::from("root3/data"));
        assert_eq!(router.channel_count(), 1);
    }

    #[test]
    fn unsubscribed_soul_is_ignored() {
        let router = SubscriptionRouter::new(8);
        router.route(&Soul::from("nobody"), &node("1"));
        assert_eq!(router.channel_count(), 0);
    }
}
