//! The thing writer: the single path that creates things.

use nab_crypto::{address_thing, ThingAddress};
use nab_index::{IndexError, IndexReport, Indexing};
use nab_store::NodeHandle;
use nab_types::{now_millis, ContentHash, GraphValue, Node, NodeExt, Soul, ThingData};
use tracing::{info, warn};

use crate::error::PeerResult;
use crate::peer::Peer;

/// A freshly written thing.
#[derive(Debug)]
pub struct ThingHandle {
    pub id: ContentHash,
    pub original_hash: ContentHash,
    /// Soul of the body node.
    pub data_soul: Soul,
    node: NodeHandle,
    indexing: Indexing,
}

impl ThingHandle {
    pub fn soul(&self) -> &Soul {
        self.node.soul()
    }

    pub fn node(&self) -> &NodeHandle {
        &self.node
    }

    pub fn indexing(&self) -> &Indexing {
        &self.indexing
    }

    /// Wait until indexing has finished.
    ///
    /// Returns the report the first time; later calls return `None`.
    pub async fn wait_indexed(&mut self) -> PeerResult<Option<IndexReport>> {
        let indexing = std::mem::replace(&mut self.indexing, Indexing::Skipped);
        Ok(indexing.wait().await?)
    }
}

impl Peer {
    /// Persist a thing and index it.
    ///
    /// The timestamp defaults to now. The body goes to a content-addressed
    /// soul when anonymous and to an author-scoped soul when signed. The
    /// metadata node links to the body, vote buckets, comment buckets and,
    /// when present, topic, author, thread root and parent.
    ///
    /// Writing identical content twice lands on the same souls.
    pub async fn put_thing(&self, mut data: ThingData) -> PeerResult<ThingHandle> {
        if data.timestamp.is_none() {
            data.timestamp = Some(now_millis());
        }
        let ThingAddress { original_hash, id } = address_thing(&data)?;
        let thing_id = id.to_hex();
        let schema = self.schema();

        let thing_soul = schema.thing(&thing_id)?;
        let data_soul = match data.author_id.as_deref() {
            Some(author_id) => schema.thing_data_signed(&thing_id, author_id)?,
            None => schema.thing_data(&original_hash)?,
        };

        let mut meta = Node::new();
        meta.insert("id".into(), GraphValue::text(&thing_id));
        if let Some(ts) = data.timestamp {
            meta.insert("timestamp".into(), GraphValue::Int(ts));
        }
        meta.insert("kind".into(), GraphValue::text(data.kind.as_str()));
        meta.insert("originalHash".into(), GraphValue::text(original_hash.to_hex()));
        meta.insert("data".into(), GraphValue::link(&data_soul));
        for vote in [nab_types::VoteKind::Up, nab_types::VoteKind::Down] {
            meta.insert(
                vote.field().into(),
                GraphValue::link(&schema.thing_votes(&thing_id, vote)?),
            );
        }
        meta.insert(
            "allcomments".into(),
            GraphValue::link(&schema.thing_all_comments(&thing_id)?),
        );
        meta.insert(
            "comments".into(),
            GraphValue::link(&schema.thing_comments(&thing_id)?),
        );
        if let Some(topic) = data.topic.as_deref().filter(|t| !t.is_empty()) {
            meta.insert("topic".into(), GraphValue::link(&schema.topic(topic)?));
        }
        if let Some(author_id) = data.author_id.as_deref() {
            meta.insert("author".into(), GraphValue::link(&schema.user_root(author_id)?));
        }
        if let Some(op_id) = data.op_id.as_deref().filter(|s| !s.is_empty()) {
            meta.insert("op".into(), GraphValue::link(&schema.thing(op_id)?));
        }
        if let Some(reply_to) = data.reply_to_id.as_deref().filter(|s| !s.is_empty()) {
            meta.insert("replyTo".into(), GraphValue::link(&schema.thing(reply_to)?));
        }

        self.store().put(&data_soul, Node::from_record(&data)?).await?;
        self.store().put(&thing_soul, meta).await?;
        info!(
            id = %id.short_hex(),
            kind = %data.kind,
            signed = data.author_id.is_some(),
            "wrote thing"
        );

        let indexing = match self.indexer().index_thing(&thing_id, &data).await {
            Ok(indexing) => indexing,
            // The thing is stored; fields the indexer cannot bucket leave it unindexed.
            Err(IndexError::Type(e)) => {
                warn!(id = %id.short_hex(), error = %e, "thing not indexed");
                Indexing::Skipped
            }
            Err(e) => return Err(e.into()),
        };
        Ok(ThingHandle {
            id,
            original_hash,
            data_soul,
            node: self.node(thing_soul),
            indexing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{peer, TS};
    use nab_store::GraphStore;
    use nab_types::ThingKind;

    fn submission() -> ThingData {
        ThingData::new(ThingKind::Submission)
            .with_timestamp(TS)
            .with_topic("news")
            .with_title("hello")
            .with_body("world")
    }

    #[tokio::test]
    async fn metadata_links() {
        let (store, _, peer) = peer();
        let mut data = submission().with_op("op1").with_reply_to("c0");
        data.author_id = Some("pk".into());
        let thing = peer.put_thing(data).await.unwrap();
        let id = thing.id.to_hex();

        let meta = store.get(thing.soul()).await.unwrap().unwrap();
        assert_eq!(meta.text("id"), Some(id.as_str()));
        assert_eq!(meta.text("kind"), Some("submission"));
        assert_eq!(meta.get("timestamp"), Some(&GraphValue::Int(TS)));
        assert_eq!(meta.link("data"), Some(&thing.data_soul));
        assert_eq!(
            meta.link("votesup").unwrap().as_str(),
            format!("nab/things/{id}/votesup")
        );
        assert_eq!(
            meta.link("votesdown").unwrap().as_str(),
            format!("nab/things/{id}/votesdown")
        );
        assert_eq!(
            meta.link("allcomments").unwrap().as_str(),
            format!("nab/things/{id}/allcomments")
        );
        assert_eq!(meta.link("topic").unwrap().as_str(), "nab/t/news");
        assert_eq!(meta.link("author").unwrap().as_str(), "~pk");
        assert_eq!(meta.link("op").unwrap().as_str(), "nab/things/op1");
        assert_eq!(meta.link("replyTo").unwrap().as_str(), "nab/things/c0");
    }

    #[tokio::test]
    async fn anonymous_body_is_content_addressed() {
        let (_, _, peer) = peer();
        let thing = peer.put_thing(submission()).await.unwrap();
        assert_eq!(
            thing.data_soul.as_str(),
            format!("nab/things/{}/data", thing.original_hash)
        );
        let body = peer.thing_data(&thing.id.to_hex()).await.unwrap().unwrap();
        assert_eq!(body, submission());
    }

    #[tokio::test]
    async fn signed_body_is_author_scoped() {
        let (_, _, peer) = peer();
        let mut data = submission();
        data.author_id = Some("pk.1".into());
        let thing = peer.put_thing(data).await.unwrap();
        assert_eq!(
            thing.data_soul.as_str(),
            format!("nab/things/{}/data~pk.1.", thing.id)
        );
    }

    #[tokio::test]
    async fn timestamp_defaults_to_now() {
        let (_, _, peer) = peer();
        let before = now_millis();
        let thing = peer
            .put_thing(ThingData::new(ThingKind::Submission).with_topic("news"))
            .await
            .unwrap();
        let body = peer.thing_data(&thing.id.to_hex()).await.unwrap().unwrap();
        assert!(body.timestamp.unwrap() >= before);
    }

    #[tokio::test]
    async fn wait_indexed_reports_once() {
        let (_, _, peer) = peer();
        let mut thing = peer.put_thing(submission()).await.unwrap();
        assert!(thing.wait_indexed().await.unwrap().is_some());
        assert!(thing.wait_indexed().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unbucketable_timestamp_is_stored_unindexed() {
        let (store, _, peer) = peer();
        let data = submission().with_timestamp(i64::MAX);
        let thing = peer.put_thing(data.clone()).await.unwrap();
        assert!(matches!(thing.indexing(), Indexing::Skipped));
        assert_eq!(peer.thing_data(&thing.id.to_hex()).await.unwrap(), Some(data));
        assert!(store.get(&Soul::from("nab/t/news")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_content_is_idempotent() {
        let (store, _, peer) = peer();
        let a = peer.put_thing(submission()).await.unwrap();
        let nodes = store.len();
        let b = peer.put_thing(submission()).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.data_soul, b.data_soul);
        assert_eq!(store.len(), nodes);
        let members = peer.topic_members("news").await.unwrap();
        assert_eq!(members, vec![a.soul().clone()]);
    }
}
