//! Fan-out of a freshly written thing into its secondary index buckets.

use std::sync::Arc;

use nab_schema::Schema;
use nab_store::{GraphStore, NodeHandle};
use nab_types::{now_millis, DayBucket, NodeExt, Soul, ThingData, ThingKind, CATCH_ALL_TOPIC};
use tracing::{debug, warn};

use crate::domain::domain_bucket;
use crate::error::IndexResult;
use crate::outcome::{IndexReport, Indexing};

/// Adds things to their topic, day, domain, url and comment-list buckets.
///
/// Every write is a set-union add or a link overwrite at a deterministic
/// soul, so indexing the same thing twice is harmless.
#[derive(Clone)]
pub struct Indexer {
    store: Arc<dyn GraphStore>,
    schema: Arc<Schema>,
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("namespace", &self.schema.namespace())
            .finish()
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

impl Indexer {
    pub fn new(store: Arc<dyn GraphStore>, schema: Arc<Schema>) -> Self {
        Self { store, schema }
    }

    /// Index the thing `thing_id` written from `data`.
    ///
    /// A comment that names its thread root but no topic inherits the
    /// root's topic (`all` if the root has none). The root's data may not
    /// have arrived yet, so that path returns [`Indexing::Deferred`]
    /// immediately and completes in a background task.
    pub async fn index_thing(&self, thing_id: &str, data: &ThingData) -> IndexResult<Indexing> {
        let topic = present(&data.topic);
        let op_id = present(&data.op_id);

        let op_id = match (topic, op_id) {
            (None, None) => {
                debug!(thing = thing_id, "nothing to index");
                return Ok(Indexing::Skipped);
            }
            (Some(_), _) => {
                let report = self.write_buckets(thing_id, data).await?;
                return Ok(Indexing::Indexed(report));
            }
            (None, Some(op_id)) => op_id.to_string(),
        };

        let indexer = self.clone();
        let thing_id = thing_id.to_string();
        let data = data.clone();
        let handle = tokio::spawn(async move {
            let result = indexer.index_under_root_topic(&thing_id, &op_id, data).await;
            if let Err(e) = &result {
                warn!(thing = %thing_id, op = %op_id, error = %e, "deferred index failed");
            }
            result
        });
        Ok(Indexing::Deferred(handle))
    }

    async fn index_under_root_topic(
        &self,
        thing_id: &str,
        op_id: &str,
        mut data: ThingData,
    ) -> IndexResult<IndexReport> {
        let root = NodeHandle::new(Arc::clone(&self.store), self.schema.thing(op_id)?);
        let root_data = root.first_link("data").await?.first_value().await?;
        let topic = root_data
            .text("topic")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(CATCH_ALL_TOPIC);
        debug!(thing = thing_id, op = op_id, topic, "inherited topic from thread root");
        data.topic = Some(topic.to_string());
        self.write_buckets(thing_id, &data).await
    }

    async fn write_buckets(&self, thing_id: &str, data: &ThingData) -> IndexResult<IndexReport> {
        let thing_soul = self.schema.thing(thing_id)?;
        let thing = NodeHandle::new(Arc::clone(&self.store), thing_soul.clone());
        let mut report = IndexReport::new(thing_soul.clone());

        let day = DayBucket::from_millis(data.timestamp.unwrap_or_else(now_millis))?;
        let prefix = data.kind.topic_prefix();
        let base_topic = data
            .topic
            .as_deref()
            .unwrap_or(CATCH_ALL_TOPIC)
            .trim()
            .to_lowercase();
        let topic_name = format!("{prefix}{base_topic}");

        if !data.skip_all && base_topic != CATCH_ALL_TOPIC {
            let all_name = format!("{prefix}{CATCH_ALL_TOPIC}");
            self.add(&mut report, self.schema.topic(&all_name)?).await?;
            self.add(&mut report, self.schema.topic_day(&all_name, &day)?).await?;
        }

        if data.kind == ThingKind::Submission {
            let url = present(&data.url);
            let domain = domain_bucket(url, &base_topic);
            if domain.is_empty() {
                warn!(thing = thing_id, url = ?url, "submission url has no host; not filed by domain");
            } else {
                self.add(&mut report, self.schema.domain(&domain)?).await?;
            }

            if let Some(url) = url {
                let url_soul = self.schema.url(url)?;
                thing.link("url", &url_soul).await?;
                self.add(&mut report, url_soul).await?;
            }
        }

        if let Some(op_id) = present(&data.op_id) {
            let all_comments = self.schema.thing_all_comments(op_id)?;
            thing
                .sibling(self.schema.thing(op_id)?)
                .link("allcomments", &all_comments)
                .await?;
            self.add(&mut report, all_comments).await?;
        }

        if let Some(parent_id) = present(&data.reply_to_id).or(present(&data.op_id)) {
            let comments = self.schema.thing_comments(parent_id)?;
            self.add(&mut report, comments.clone()).await?;
            thing
                .sibling(self.schema.thing(parent_id)?)
                .link("comments", &comments)
                .await?;
        }

        self.add(&mut report, self.schema.topic(&topic_name)?).await?;
        self.add(&mut report, self.schema.topic_day(&topic_name, &day)?)
            .await?;

        debug!(thing = thing_id, buckets = report.buckets.len(), "indexed thing");
        Ok(report)
    }

    async fn add(&self, report: &mut IndexReport, bucket: Soul) -> IndexResult<()> {
        debug!(%bucket, thing = %report.thing, "adding to bucket");
        self.store.set(&bucket, &report.thing).await?;
        report.buckets.push(bucket);
        Ok(())
    }
}
