pub mod local_store;
pub mod remote_store;

pub use local_store::LocalStore;
pub use remote_store::{RemoteProjectStore, RemoteTaskStore};

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};

use crate::error::AppResult;

/// An entity kept by a [`Store`]: knows its id, how it is created and how a
/// partial update merges into it.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Creation input with defaults already applied
    type New: Send + 'static;
    /// Partial update where absent fields keep their stored value
    type Patch: Send + 'static;

    /// Human-readable entity name used in logs and errors
    const KIND: &'static str;

    fn id(&self) -> i64;

    fn build(id: i64, created_at: String, input: Self::New) -> Self;

    fn apply(&mut self, patch: Self::Patch);
}

/// Storage trait shared by the local snapshot store and the SQL store
#[async_trait]
pub trait Store<R: Record>: Send + Sync {
    /// All records, newest first
    async fn list(&self) -> AppResult<Vec<R>>;

    /// Insert a record, assigning its id and creation timestamp
    async fn create(&self, input: R::New) -> AppResult<R>;

    /// Merge a patch into a record; `None` when the id does not exist
    async fn update(&self, id: i64, patch: R::Patch) -> AppResult<Option<R>>;

    /// Remove a record; `false` when the id does not exist
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// What a local store does when its snapshot cannot be written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistPolicy {
    /// Log the failure and report the mutation as successful
    #[default]
    BestEffort,
    /// Report the failure to the caller
    Strict,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Millisecond-precision UTC timestamp, e.g. `2026-01-31T09:15:00.000Z`
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

pub(crate) fn timestamp_now() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp_now().unwrap();
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
    }
}
