use nab_types::Soul;
use tokio::task::JoinHandle;

use crate::error::{IndexError, IndexResult};

/// The buckets one index pass added a thing to, in write order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexReport {
    pub thing: Soul,
    pub buckets: Vec<Soul>,
}

impl IndexReport {
    pub fn new(thing: Soul) -> Self {
        Self {
            thing,
            buckets: Vec::new(),
        }
    }

    pub fn contains(&self, bucket: &Soul) -> bool {
        self.buckets.contains(bucket)
    }
}

/// Outcome of an index call.
#[derive(Debug)]
pub enum Indexing {
    /// The thing has neither a topic nor a thread root.
    Skipped,
    /// Indexing completed before the call returned.
    Indexed(IndexReport),
    /// Indexing waits on the thread root's data and runs in the background.
    Deferred(JoinHandle<IndexResult<IndexReport>>),
}

impl Indexing {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Indexing::Deferred(_))
    }

    /// Wait for indexing to finish, whichever path it took.
    pub async fn wait(self) -> IndexResult<Option<IndexReport>> {
        match self {
            Indexing::Skipped => Ok(None),
            Indexing::Indexed(report) => Ok(Some(report)),
            Indexing::Deferred(handle) => handle
                .await
                .map_err(|e| IndexError::Deferred(e.to_string()))?
                .map(Some),
        }
    }
}
