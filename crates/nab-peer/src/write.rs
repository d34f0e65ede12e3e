//! Entry points for user-authored content.

use nab_schema::UserCollection;
use nab_types::{GraphValue, Soul, ThingData, ThingKind, UserSession, VoteKind};
use tracing::{debug, info};

use crate::error::{PeerError, PeerResult};
use crate::peer::Peer;
use crate::thing::ThingHandle;

/// Value written into a vote slot.
const VOTE_MARKER: &str = "1";

/// Result of [`Peer::write_page`].
#[derive(Debug)]
pub enum PageWrite {
    /// No page of that name existed; a new wikipage thing was written.
    Created(ThingHandle),
    /// The existing page's body was overwritten in place.
    Updated { thing: Soul, data: Soul },
}

impl PageWrite {
    /// Soul of the page's thing node.
    pub fn thing(&self) -> &Soul {
        match self {
            PageWrite::Created(handle) => handle.soul(),
            PageWrite::Updated { thing, .. } => thing,
        }
    }
}

/// A vote slot that has been written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteHandle {
    pub thing: Soul,
    pub bucket: Soul,
    pub kind: VoteKind,
    pub nonce: String,
}

impl Peer {
    /// Submit a link or text post.
    pub async fn submit(&self, data: ThingData) -> PeerResult<ThingHandle> {
        self.publish(data, ThingKind::Submission, Some(UserCollection::Submissions))
            .await
    }

    /// Reply to a thing. `op_id` names the thread root, `reply_to_id` the
    /// parent; without a topic the root's topic is inherited.
    pub async fn comment(&self, data: ThingData) -> PeerResult<ThingHandle> {
        self.publish(data, ThingKind::Comment, Some(UserCollection::Comments))
            .await
    }

    /// Post a chat message.
    pub async fn chat(&self, data: ThingData) -> PeerResult<ThingHandle> {
        self.publish(data, ThingKind::ChatMsg, None).await
    }

    async fn publish(
        &self,
        mut data: ThingData,
        kind: ThingKind,
        collection: Option<UserCollection>,
    ) -> PeerResult<ThingHandle> {
        data.kind = kind;
        data.normalize();
        let user = self.is_logged_in();
        if let Some(user) = &user {
            data.author = Some(user.alias.clone());
            data.author_id = Some(user.pub_key.clone());
        }

        let thing = self.put_thing(data).await?;

        if let Some(user) = user {
            self.upgrade_collections(&user).await?;
            self.append_to_collection(&user, UserCollection::Things, thing.soul())
                .await?;
            if let Some(collection) = collection {
                self.append_to_collection(&user, collection, thing.soul())
                    .await?;
            }
        }
        Ok(thing)
    }

    async fn append_to_collection(
        &self,
        user: &UserSession,
        collection: UserCollection,
        thing: &Soul,
    ) -> PeerResult<()> {
        let soul = self.schema().user_collection(&user.pub_key, collection)?;
        self.user_root(user)?.link(collection.name(), &soul).await?;
        self.store().set(&soul, thing).await?;
        debug!(%collection, %thing, "added to user collection");
        Ok(())
    }

    /// Create or edit the logged-in user's wiki page `name`.
    ///
    /// An existing page keeps its thing id; only the body field of its data
    /// node changes.
    pub async fn write_page(&self, name: &str, body: &str) -> PeerResult<PageWrite> {
        let user = self
            .is_logged_in()
            .ok_or_else(|| PeerError::Unauthenticated(format!("cannot write page {name}")))?;
        let pages = self.node(self.schema().user_pages(&user.pub_key)?);

        if let Some(page) = pages.follow(name).await? {
            if let Some(data) = page.follow("data").await? {
                data.put_field("body", GraphValue::text(body)).await?;
                info!(page = name, thing = %page.soul(), "updated page");
                return Ok(PageWrite::Updated {
                    thing: page.soul().clone(),
                    data: data.soul().clone(),
                });
            }
        }

        let mut data = ThingData::new(ThingKind::WikiPage)
            .with_title(name)
            .with_body(body);
        data.author = Some(user.alias.clone());
        data.author_id = Some(user.pub_key.clone());
        let thing = self.put_thing(data).await?;
        pages.link(name, thing.soul()).await?;
        info!(page = name, thing = %thing.soul(), "created page");
        Ok(PageWrite::Created(thing))
    }

    /// Record a vote on thing `id` in the slot named by `nonce`.
    ///
    /// Repeating a nonce rewrites the same slot. Nothing stops one voter
    /// from using many nonces.
    pub async fn vote(&self, id: &str, kind: VoteKind, nonce: &str) -> PeerResult<VoteHandle> {
        let thing = self.node(self.schema().thing(id)?);
        let bucket = self.schema().thing_votes(id, kind)?;
        thing.link(kind.field(), &bucket).await?;
        thing
            .sibling(bucket.clone())
            .put_field(nonce, GraphValue::text(VOTE_MARKER))
            .await?;
        debug!(thing = id, %kind, nonce, "voted");
        Ok(VoteHandle {
            thing: thing.soul().clone(),
            bucket,
            kind,
            nonce: nonce.to_string(),
        })
    }

    /// Number of distinct vote slots on thing `id`.
    pub async fn vote_count(&self, id: &str, kind: VoteKind) -> PeerResult<usize> {
        let bucket = self.node(self.schema().thing_votes(id, kind)?);
        Ok(bucket
            .get()
            .await?
            .map(|node| node.values().filter(|v| !v.is_null()).count())
            .unwrap_or(0))
    }
}
