//! Access to the authenticated identity, if any.

use std::sync::RwLock;

use nab_types::UserSession;

/// Reports who is logged in.
pub trait SessionProvider: Send + Sync {
    /// The current identity, or `None` when anonymous.
    fn current(&self) -> Option<UserSession>;
}

/// A session that is never logged in.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

impl SessionProvider for Anonymous {
    fn current(&self) -> Option<UserSession> {
        None
    }
}

/// A session held in memory that can be logged in and out.
#[derive(Debug, Default)]
pub struct MemorySession {
    user: RwLock<Option<UserSession>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(user: UserSession) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn login(&self, user: UserSession) {
        *self.user.write().expect("session lock poisoned") = Some(user);
    }

    pub fn logout(&self) {
        *self.user.write().expect("session lock poisoned") = None;
    }
}

impl SessionProvider for MemorySession {
    fn current(&self) -> Option<UserSession> {
        self.user.read().expect("session lock poisoned").clone()
    }
}
