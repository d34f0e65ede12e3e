use serde::{Deserialize, Serialize};

/// An authenticated identity: display alias plus public identity key.
///
/// The public key doubles as the author id stamped on things and as the
/// root of the user's namespace (`~<pub_key>`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserSession {
    pub alias: String,
    #[serde(rename = "pub")]
    pub pub_key: String,
}

impl UserSession {
    pub fn new(alias: impl Into<String>, pub_key: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            pub_key: pub_key.into(),
        }
    }
}
