use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::AppResult;
use crate::store::{timestamp_now, PersistError, PersistPolicy, Record, Store};

/// In-process store mirrored to a JSON snapshot file after every mutation
pub struct LocalStore<R> {
    path: PathBuf,
    policy: PersistPolicy,
    inner: Mutex<Collection<R>>,
}

/// Records in insertion order plus the next id to hand out
struct Collection<R> {
    data: Vec<R>,
    next_id: i64,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next_id: 1,
        }
    }
}

/// On-disk layout: `{"data": [...], "nextId": n, "lastUpdated": "..."}`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotOut<'a, R> {
    data: &'a [R],
    next_id: i64,
    last_updated: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotIn<R> {
    #[serde(default = "Vec::new")]
    data: Vec<R>,
    #[serde(default)]
    next_id: i64,
}

impl<R: Record> Collection<R> {
    fn from_snapshot(snapshot: SnapshotIn<R>) -> Self {
        // Never hand out an id that is already taken, whatever the file claims
        let floor = snapshot.data.iter().map(Record::id).max().unwrap_or(0) + 1;
        Self {
            next_id: snapshot.next_id.max(floor),
            data: snapshot.data,
        }
    }
}

impl<R: Record> LocalStore<R> {
    /// Create an empty store that will persist to `path`
    pub fn empty(path: impl Into<PathBuf>, policy: PersistPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            inner: Mutex::new(Collection::default()),
        }
    }

    /// Load the store from its snapshot. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>, policy: PersistPolicy) -> Result<Self, PersistError> {
        let path = path.into();

        let collection = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let snapshot: SnapshotIn<R> =
                    serde_json::from_str(&content).map_err(|source| PersistError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                Collection::from_snapshot(snapshot)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Collection::default(),
            Err(source) => return Err(PersistError::Read { path, source }),
        };

        tracing::debug!(
            path = %path.display(),
            records = collection.data.len(),
            next_id = collection.next_id,
            "Loaded {} snapshot",
            R::KIND
        );

        Ok(Self {
            path,
            policy,
            inner: Mutex::new(collection),
        })
    }

    /// Like [`LocalStore::open`], but an unreadable snapshot is logged and
    /// replaced by an empty store.
    pub fn open_or_empty(path: impl Into<PathBuf>, policy: PersistPolicy) -> Self {
        let path = path.into();
        match Self::open(path.clone(), policy) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "No usable {} data found, starting fresh", R::KIND);
                Self::empty(path, policy)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full snapshot to a sibling temp file, then swap it in
    async fn persist(&self, collection: &Collection<R>) -> Result<(), PersistError> {
        let snapshot = SnapshotOut {
            data: &collection.data,
            next_id: collection.next_id,
            last_updated: timestamp_now()?,
        };
        let content = serde_json::to_string_pretty(&snapshot).map_err(PersistError::Serialize)?;

        let write_err = |source| PersistError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, content).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(write_err)?;

        Ok(())
    }

    async fn save(&self, collection: &Collection<R>) -> AppResult<()> {
        match self.persist(collection).await {
            Ok(()) => Ok(()),
            Err(err) => match self.policy {
                PersistPolicy::BestEffort => {
                    tracing::error!(error = %err, "Failed to save {} data", R::KIND);
                    Ok(())
                }
                PersistPolicy::Strict => Err(err.into()),
            },
        }
    }
}

#[async_trait]
impl<R: Record> Store<R> for LocalStore<R> {
    async fn list(&self) -> AppResult<Vec<R>> {
        let inner = self.inner.lock().await;
        Ok(inner.data.iter().rev().cloned().collect())
    }

    async fn create(&self, input: R::New) -> AppResult<R> {
        let created_at = timestamp_now()?;
        let mut inner = self.inner.lock().await;

        let id = inner.next_id;
        inner.next_id += 1;

        let record = R::build(id, created_at, input);
        inner.data.push(record.clone());
        self.save(&inner).await?;

        Ok(record)
    }

    async fn update(&self, id: i64, patch: R::Patch) -> AppResult<Option<R>> {
        let mut inner = self.inner.lock().await;

        let Some(record) = inner.data.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        record.apply(patch);
        let updated = record.clone();
        self.save(&inner).await?;

        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut inner = self.inner.lock().await;

        let Some(index) = inner.data.iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        inner.data.remove(index);
        self.save(&inner).await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            project_id: None,
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_ids_increase_and_list_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store: LocalStore<Task> =
            LocalStore::empty(dir.path().join("tasks.json"), PersistPolicy::Strict);

        let a = store.create(new_task("A")).await.unwrap();
        let b = store.create(new_task("B")).await.unwrap();
        let c = store.create(new_task("C")).await.unwrap();

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
        assert_eq!(titles(&store.list().await.unwrap()), vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let dir = tempfile::tempdir().unwrap();
        let store: LocalStore<Task> =
            LocalStore::empty(dir.path().join("tasks.json"), PersistPolicy::Strict);

        store.create(new_task("A")).await.unwrap();
        let b = store.create(new_task("B")).await.unwrap();
        assert!(store.delete(b.id).await.unwrap());

        let c = store.create(new_task("C")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_update_merges_and_missing_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store: LocalStore<Task> =
            LocalStore::empty(dir.path().join("tasks.json"), PersistPolicy::Strict);

        let created = store.create(new_task("Buy milk")).await.unwrap();
        let updated = store
            .update(
                created.id,
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.created_at, created.created_at);

        let missing = store.update(42, TaskPatch::default()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_false_every_time() {
        let dir = tempfile::tempdir().unwrap();
        let store: LocalStore<Task> =
            LocalStore::empty(dir.path().join("tasks.json"), PersistPolicy::Strict);

        assert!(!store.delete(99).await.unwrap());
        assert!(!store.delete(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_reopen_reproduces_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let store: LocalStore<Task> = LocalStore::empty(&path, PersistPolicy::Strict);
        store.create(new_task("A")).await.unwrap();
        let b = store.create(new_task("B")).await.unwrap();
        store.create(new_task("C")).await.unwrap();
        store
            .update(
                b.id,
                TaskPatch {
                    priority: Some(TaskPriority::High),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store.delete(3).await.unwrap();

        let reopened: LocalStore<Task> = LocalStore::open(&path, PersistPolicy::Strict).unwrap();
        assert_eq!(reopened.list().await.unwrap(), store.list().await.unwrap());

        // The counter survived: id 3 was deleted but stays burned
        let d = reopened.create(new_task("D")).await.unwrap();
        assert_eq!(d.id, 4);
    }

    #[tokio::test]
    async fn test_snapshot_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let store: LocalStore<Task> = LocalStore::empty(&path, PersistPolicy::Strict);
        store.create(new_task("A")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["data"].as_array().unwrap().len(), 1);
        assert_eq!(raw["nextId"], 2);
        assert!(raw["lastUpdated"].is_string());
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store: LocalStore<Task> =
            LocalStore::open(dir.path().join("absent.json"), PersistPolicy::BestEffort).unwrap();
        assert!(store.inner.try_lock().unwrap().data.is_empty());
    }

    #[test]
    fn test_open_corrupt_file_errors_and_fallback_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<LocalStore<Task>, _> = LocalStore::open(&path, PersistPolicy::BestEffort);
        assert!(matches!(result, Err(PersistError::Parse { .. })));

        let store: LocalStore<Task> = LocalStore::open_or_empty(&path, PersistPolicy::BestEffort);
        let inner = store.inner.try_lock().unwrap();
        assert!(inner.data.is_empty());
        assert_eq!(inner.next_id, 1);
    }

    #[test]
    fn test_open_raises_stale_next_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"{"data": [{"id": 5, "title": "old", "createdAt": "2026-01-01T00:00:00.000Z"}]}"#,
        )
        .unwrap();

        let store: LocalStore<Task> = LocalStore::open(&path, PersistPolicy::BestEffort).unwrap();
        assert_eq!(store.inner.try_lock().unwrap().next_id, 6);
    }

    #[tokio::test]
    async fn test_save_failure_policy() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be makes every write fail
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("tasks.json");

        let lenient: LocalStore<Task> = LocalStore::empty(&path, PersistPolicy::BestEffort);
        let task = lenient.create(new_task("kept in memory")).await.unwrap();
        assert_eq!(lenient.list().await.unwrap(), vec![task]);

        let strict: LocalStore<Task> = LocalStore::empty(&path, PersistPolicy::Strict);
        let err = strict.create(new_task("A")).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(PersistError::Write { .. })));
    }
}
