//! Read helpers over the index buckets and thing nodes.

use nab_schema::UserCollection;
use nab_types::{DayBucket, Node, NodeExt, Soul, ThingData};

use crate::error::PeerResult;
use crate::peer::Peer;

impl Peer {
    /// The metadata node of thing `id`.
    pub async fn thing(&self, id: &str) -> PeerResult<Option<Node>> {
        Ok(self.node(self.schema().thing(id)?).get().await?)
    }

    /// The body of thing `id`, reached through its `data` link.
    pub async fn thing_data(&self, id: &str) -> PeerResult<Option<ThingData>> {
        let thing = self.node(self.schema().thing(id)?);
        let Some(data) = thing.follow("data").await? else {
            return Ok(None);
        };
        match data.get().await? {
            Some(node) => Ok(Some(node.to_record()?)),
            None => Ok(None),
        }
    }

    /// Members of the bucket at `soul`, in soul order.
    pub async fn members(&self, soul: &Soul) -> PeerResult<Vec<Soul>> {
        Ok(self.node(soul.clone()).members().await?)
    }

    pub async fn topic_members(&self, topic: &str) -> PeerResult<Vec<Soul>> {
        self.members(&self.schema().topic(topic)?).await
    }

    pub async fn topic_day_members(
        &self,
        topic: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> PeerResult<Vec<Soul>> {
        let day = DayBucket { year, month, day };
        self.members(&self.schema().topic_day(topic, &day)?).await
    }

    pub async fn domain_members(&self, domain: &str) -> PeerResult<Vec<Soul>> {
        self.members(&self.schema().domain(domain)?).await
    }

    pub async fn url_members(&self, url: &str) -> PeerResult<Vec<Soul>> {
        self.members(&self.schema().url(url)?).await
    }

    /// Members of one of the logged-in user's collections, wherever the
    /// user root currently points. Empty when anonymous.
    pub async fn user_collection(&self, collection: UserCollection) -> PeerResult<Vec<Soul>> {
        let Some(user) = self.is_logged_in() else {
            return Ok(Vec::new());
        };
        match self.user_root(&user)?.follow(collection.name()).await? {
            Some(node) => Ok(node.members().await?),
            None => Ok(Vec::new()),
        }
    }
}
