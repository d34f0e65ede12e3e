//! The soul registry: one template per entity kind.

use std::collections::HashMap;

use nab_types::{ContentHash, DayBucket, Soul, VoteKind};
use tracing::debug;

use crate::collection::{SchemaVersion, UserCollection};
use crate::error::{Result, SchemaError};
use crate::template::SoulTemplate;

/// Namespace used for every non-user soul unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "nab";

/// Characters that are forbidden in a namespace.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '/', '~', ':', '*', '#'];

/// Every entity kind with an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Thing,
    ThingData,
    ThingDataSigned,
    ThingVotes,
    ThingAllComments,
    ThingComments,
    Topic,
    TopicDay,
    Domain,
    Url,
    UserRoot,
    UserPages,
    UserThings,
    UserComments,
    UserSubmissions,
}

impl Entity {
    pub const ALL: [Entity; 15] = [
        Entity::Thing,
        Entity::ThingData,
        Entity::ThingDataSigned,
        Entity::ThingVotes,
        Entity::ThingAllComments,
        Entity::ThingComments,
        Entity::Topic,
        Entity::TopicDay,
        Entity::Domain,
        Entity::Url,
        Entity::UserRoot,
        Entity::UserPages,
        Entity::UserThings,
        Entity::UserComments,
        Entity::UserSubmissions,
    ];

    fn pattern(&self, ns: &str) -> String {
        match self {
            Entity::Thing => format!("{ns}/things/:thingid"),
            Entity::ThingData => format!("{ns}/things/:thingid/data"),
            Entity::ThingDataSigned => format!("{ns}/things/:thingid/data~:authorId."),
            Entity::ThingVotes => format!("{ns}/things/:thingid/votes:votekind"),
            Entity::ThingAllComments => format!("{ns}/things/:thingid/allcomments"),
            Entity::ThingComments => format!("{ns}/things/:thingid/comments"),
            Entity::Topic => format!("{ns}/t/:topicname"),
            Entity::TopicDay => format!("{ns}/t/:topicname/days/:year/:month/:day"),
            Entity::Domain => format!("{ns}/domains/:domain"),
            Entity::Url => format!("{ns}/urls/*url"),
            Entity::UserRoot => "~:authorId".to_string(),
            Entity::UserPages => "~:authorId/pages".to_string(),
            Entity::UserThings => "~:authorId/things".to_string(),
            Entity::UserComments => "~:authorId/comments".to_string(),
            Entity::UserSubmissions => "~:authorId/submissions".to_string(),
        }
    }
}

/// Validate a soul namespace.
///
/// A namespace must be non-empty, must not start with `.` and must not
/// contain whitespace or any character with meaning in templates or souls.
pub fn validate_namespace(name: &str) -> Result<()> {
    let invalid = |reason: String| SchemaError::InvalidNamespace {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("namespace must not be empty".into()));
    }
    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(invalid(format!("contains forbidden character: {ch:?}")));
        }
    }
    if name.starts_with('.') {
        return Err(invalid("must not start with '.'".into()));
    }
    Ok(())
}

/// The registry of soul templates.
///
/// Typed helpers fill the right template from typed key fields; the
/// generic [`template`](Schema::template) accessor exposes the raw
/// templates for matching.
#[derive(Clone, Debug)]
pub struct Schema {
    namespace: String,
    templates: HashMap<Entity, SoulTemplate>,
}

impl Schema {
    /// Build the registry under `namespace`.
    pub fn new(namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;
        let templates = Entity::ALL
            .iter()
            .map(|e| Ok((*e, SoulTemplate::parse(&e.pattern(namespace))?)))
            .collect::<Result<HashMap<_, _>>>()?;
        debug!(namespace, templates = templates.len(), "built soul schema");
        Ok(Self {
            namespace: namespace.to_string(),
            templates,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn template(&self, entity: Entity) -> &SoulTemplate {
        // Every entity is inserted in `new`.
        &self.templates[&entity]
    }

    /// Fill the template of `entity` from raw key fields.
    pub fn soul(&self, entity: Entity, keys: &[(&str, &str)]) -> Result<Soul> {
        self.template(entity).soul(keys)
    }

    pub fn is_match(&self, entity: Entity, soul: &Soul) -> bool {
        self.template(entity).is_match(soul.as_str())
    }

    // ---------------------------------------------------------------
    // Things
    // ---------------------------------------------------------------

    pub fn thing(&self, thing_id: &str) -> Result<Soul> {
        self.soul(Entity::Thing, &[("thingid", thing_id)])
    }

    /// Anonymous body soul, keyed by the payload's content hash.
    pub fn thing_data(&self, original_hash: &ContentHash) -> Result<Soul> {
        self.soul(Entity::ThingData, &[("thingid", &original_hash.to_hex())])
    }

    /// Signed body soul, keyed by thing id and author.
    pub fn thing_data_signed(&self, thing_id: &str, author_id: &str) -> Result<Soul> {
        self.soul(
            Entity::ThingDataSigned,
            &[("thingid", thing_id), ("authorId", author_id)],
        )
    }

    pub fn thing_votes(&self, thing_id: &str, kind: VoteKind) -> Result<Soul> {
        self.soul(
            Entity::ThingVotes,
            &[("thingid", thing_id), ("votekind", kind.as_str())],
        )
    }

    pub fn thing_all_comments(&self, thing_id: &str) -> Result<Soul> {
        self.soul(Entity::ThingAllComments, &[("thingid", thing_id)])
    }

    pub fn thing_comments(&self, thing_id: &str) -> Result<Soul> {
        self.soul(Entity::ThingComments, &[("thingid", thing_id)])
    }

    // ---------------------------------------------------------------
    // Index buckets
    // ---------------------------------------------------------------

    pub fn topic(&self, topic_name: &str) -> Result<Soul> {
        self.soul(Entity::Topic, &[("topicname", topic_name)])
    }

    pub fn topic_day(&self, topic_name: &str, day: &DayBucket) -> Result<Soul> {
        let (year, month, d) = (day.year.to_string(), day.month.to_string(), day.day.to_string());
        self.soul(
            Entity::TopicDay,
            &[
                ("topicname", topic_name),
                ("year", &year),
                ("month", &month),
                ("day", &d),
            ],
        )
    }

    pub fn domain(&self, domain: &str) -> Result<Soul> {
        self.soul(Entity::Domain, &[("domain", domain)])
    }

    pub fn url(&self, url: &str) -> Result<Soul> {
        self.soul(Entity::Url, &[("url", url)])
    }

    // ---------------------------------------------------------------
    // User namespace
    // ---------------------------------------------------------------

    pub fn user_root(&self, author_id: &str) -> Result<Soul> {
        self.soul(Entity::UserRoot, &[("authorId", author_id)])
    }

    pub fn user_pages(&self, author_id: &str) -> Result<Soul> {
        self.soul(Entity::UserPages, &[("authorId", author_id)])
    }

    /// Current-schema soul of one of the user's collections.
    pub fn user_collection(&self, author_id: &str, collection: UserCollection) -> Result<Soul> {
        self.soul(collection.entity(), &[("authorId", author_id)])
    }

    /// Which addressing scheme an existing collection soul was built under.
    pub fn collection_version(&self, collection: UserCollection, soul: &Soul) -> SchemaVersion {
        if self.is_match(collection.entity(), soul) {
            SchemaVersion::Current
        } else {
            SchemaVersion::Legacy
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE).expect("default namespace is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> ContentHash {
        ContentHash::from_hash([0xab; 32])
    }

    #[test]
    fn thing_souls() {
        let s = Schema::default();
        assert_eq!(s.thing("abc").unwrap().as_str(), "nab/things/abc");
        assert_eq!(
            s.thing_data(&hash()).unwrap().as_str(),
            format!("nab/things/{}/data", "ab".repeat(32))
        );
        assert_eq!(
            s.thing_data_signed("abc", "pk.x").unwrap().as_str(),
            "nab/things/abc/data~pk.x."
        );
        assert_eq!(
            s.thing_votes("abc", VoteKind::Up).unwrap().as_str(),
            "nab/things/abc/votesup"
        );
        assert_eq!(
            s.thing_votes("abc", VoteKind::Down).unwrap().as_str(),
            "nab/things/abc/votesdown"
        );
        assert_eq!(
            s.thing_all_comments("abc").unwrap().as_str(),
            "nab/things/abc/allcomments"
        );
        assert_eq!(s.thing_comments("abc").unwrap().as_str(), "nab/things/abc/comments");
    }

    #[test]
    fn bucket_souls() {
        let s = Schema::default();
        let day = DayBucket { year: 2019, month: 3, day: 5 };
        assert_eq!(s.topic("chat:all").unwrap().as_str(), "nab/t/chat:all");
        assert_eq!(
            s.topic_day("news", &day).unwrap().as_str(),
            "nab/t/news/days/2019/3/5"
        );
        assert_eq!(s.domain("example.com").unwrap().as_str(), "nab/domains/example.com");
        assert_eq!(
            s.url("https://example.com/a").unwrap().as_str(),
            "nab/urls/https://example.com/a"
        );
    }

    #[test]
    fn user_souls() {
        let s = Schema::default();
        assert_eq!(s.user_root("pk").unwrap().as_str(), "~pk");
        assert_eq!(s.user_pages("pk").unwrap().as_str(), "~pk/pages");
        assert_eq!(
            s.user_collection("pk", UserCollection::Submissions).unwrap().as_str(),
            "~pk/submissions"
        );
    }

    #[test]
    fn collection_versions() {
        let s = Schema::default();
        let current = s.user_collection("pk", UserCollection::Things).unwrap();
        assert_eq!(
            s.collection_version(UserCollection::Things, &current),
            SchemaVersion::Current
        );
        assert_eq!(
            s.collection_version(UserCollection::Comments, &current),
            SchemaVersion::Legacy
        );
        assert_eq!(
            s.collection_version(UserCollection::Things, &Soul::from("jx8k2q0rGpMSJ")),
            SchemaVersion::Legacy
        );
    }

    #[test]
    fn custom_namespace() {
        let s = Schema::new("test").unwrap();
        assert_eq!(s.namespace(), "test");
        assert_eq!(s.thing("a").unwrap().as_str(), "test/things/a");
        assert!(!s.is_match(Entity::Thing, &Soul::from("nab/things/a")));
    }

    #[test]
    fn reject_bad_namespaces() {
        assert!(validate_namespace("nab").is_ok());
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("a/b").is_err());
        assert!(validate_namespace("~me").is_err());
        assert!(validate_namespace(".hidden").is_err());
        assert!(validate_namespace("has space").is_err());
    }

    #[test]
    fn empty_ids_are_rejected() {
        let s = Schema::default();
        assert!(matches!(s.thing(""), Err(SchemaError::EmptyKey { .. })));
    }
}
