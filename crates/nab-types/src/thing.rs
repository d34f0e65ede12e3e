//! Thing kinds and the raw payload a thing is built from.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::node::GraphValue;

/// Name of the implicit catch-all topic.
pub const CATCH_ALL_TOPIC: &str = "all";

/// The kind of a thing. Serializes to the literal kind strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThingKind {
    #[default]
    Submission,
    Comment,
    #[serde(rename = "chatmsg")]
    ChatMsg,
    #[serde(rename = "wikipage")]
    WikiPage,
}

impl ThingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThingKind::Submission => "submission",
            ThingKind::Comment => "comment",
            ThingKind::ChatMsg => "chatmsg",
            ThingKind::WikiPage => "wikipage",
        }
    }

    /// Prefix applied to topic names this kind is indexed under.
    pub fn topic_prefix(&self) -> &'static str {
        match self {
            ThingKind::ChatMsg => "chat:",
            ThingKind::Comment => "comments:",
            ThingKind::Submission | ThingKind::WikiPage => "",
        }
    }
}

impl fmt::Display for ThingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThingKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submission" => Ok(ThingKind::Submission),
            "comment" => Ok(ThingKind::Comment),
            "chatmsg" => Ok(ThingKind::ChatMsg),
            "wikipage" => Ok(ThingKind::WikiPage),
            other => Err(TypeError::UnknownThingKind(other.to_string())),
        }
    }
}

/// Direction of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Up => "up",
            VoteKind::Down => "down",
        }
    }

    /// Name of the thing field that links to this direction's vote bucket.
    pub fn field(&self) -> &'static str {
        match self {
            VoteKind::Up => "votesup",
            VoteKind::Down => "votesdown",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(VoteKind::Up),
            "down" => Ok(VoteKind::Down),
            other => Err(TypeError::UnknownVoteKind(other.to_string())),
        }
    }
}

/// The raw payload of a thing.
///
/// This is exactly what gets stored at the thing's data soul, and what the
/// `originalHash` is computed over. Absent optional fields are not
/// serialized, so they never contribute to a hash.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingData {
    pub kind: ThingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Suppresses indexing into the catch-all topic.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip_all: bool,
    /// Any further payload fields, carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, GraphValue>,
}

impl ThingData {
    pub fn new(kind: ThingKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_op(mut self, op_id: impl Into<String>) -> Self {
        self.op_id = Some(op_id.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to_id: impl Into<String>) -> Self {
        self.reply_to_id = Some(reply_to_id.into());
        self
    }

    /// Lowercase and trim the topic and domain in place.
    pub fn normalize(&mut self) {
        if let Some(topic) = self.topic.as_mut() {
            *topic = topic.trim().to_lowercase();
        }
        if let Some(domain) = self.domain.as_mut() {
            *domain = domain.trim().to_lowercase();
        }
    }
}
