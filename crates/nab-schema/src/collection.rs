use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::Entity;

/// A named per-user collection of authored things.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserCollection {
    Things,
    Comments,
    Submissions,
}

impl UserCollection {
    /// Field name on the user root node that links to this collection.
    pub fn name(&self) -> &'static str {
        match self {
            UserCollection::Things => "things",
            UserCollection::Comments => "comments",
            UserCollection::Submissions => "submissions",
        }
    }

    pub fn entity(&self) -> Entity {
        match self {
            UserCollection::Things => Entity::UserThings,
            UserCollection::Comments => Entity::UserComments,
            UserCollection::Submissions => Entity::UserSubmissions,
        }
    }
}

impl fmt::Display for UserCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Addressing scheme a user collection soul was built under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Any soul the current template does not produce.
    Legacy,
    Current,
}
