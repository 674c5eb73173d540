//! RocksDB checkpoint store implementation.

use std::path::Path;

use async_trait::async_trait;
use rocksdb::{ColumnFamily, IteratorMode, DB};
use tracing::debug;

use squash_core::{CheckpointStore, SquashResult};

use crate::column_families::{cf_names, get_column_family_descriptors, get_db_options};
use crate::error::StorageError;

/// Durable [`CheckpointStore`] over RocksDB.
///
/// Each `save` is a single atomic put, so a reader (or a crashed writer's
/// successor) never observes a torn checkpoint. Single-writer discipline
/// per run id is the orchestrator's job; this store only guarantees that
/// individual operations are atomic.
pub struct RocksDbCheckpointStore {
    db: DB,
}

impl RocksDbCheckpointStore {
    /// Open (or create) the checkpoint database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = DB::open_cf_descriptors(
            &get_db_options(),
            path,
            get_column_family_descriptors(),
        )
        .map_err(|e| StorageError::OpenFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "opened checkpoint database");
        Ok(Self { db })
    }

    fn checkpoints_cf(&self) -> Result<&ColumnFamily, StorageError> {
        self.db
            .cf_handle(cf_names::CHECKPOINTS)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound {
                name: cf_names::CHECKPOINTS.to_string(),
            })
    }
}

#[async_trait]
impl CheckpointStore for RocksDbCheckpointStore {
    async fn load(&self, run_id: &str) -> SquashResult<Option<Vec<u8>>> {
        let cf = self.checkpoints_cf()?;
        let value = self
            .db
            .get_cf(cf, run_id.as_bytes())
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        Ok(value)
    }

    async fn save(&self, run_id: &str, bytes: &[u8]) -> SquashResult<()> {
        let cf = self.checkpoints_cf()?;
        self.db
            .put_cf(cf, run_id.as_bytes(), bytes)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, run_id: &str) -> SquashResult<()> {
        let cf = self.checkpoints_cf()?;
        self.db
            .delete_cf(cf, run_id.as_bytes())
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn list_runs(&self) -> SquashResult<Vec<String>> {
        let cf = self.checkpoints_cf()?;
        let mut runs = Vec::new();
        for entry in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, _) = entry.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            runs.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn save_load_round_trip() {
        let dir = tempdir().expect("temp dir");
        let store = RocksDbCheckpointStore::open(dir.path()).expect("open");

        assert_eq!(store.load("squash-k2-c500-h3").await.unwrap(), None);
        store.save("squash-k2-c500-h3", b"progress").await.unwrap();
        assert_eq!(
            store.load("squash-k2-c500-h3").await.unwrap(),
            Some(b"progress".to_vec())
        );
    }

    #[tokio::test]
    async fn overwrites_and_deletes() {
        let dir = tempdir().expect("temp dir");
        let store = RocksDbCheckpointStore::open(dir.path()).expect("open");

        store.save("r", b"v1").await.unwrap();
        store.save("r", b"v2").await.unwrap();
        assert_eq!(store.load("r").await.unwrap(), Some(b"v2".to_vec()));

        store.delete("r").await.unwrap();
        store.delete("r").await.unwrap();
        assert_eq!(store.load("r").await.unwrap(), None);
    }

    #[tokio::test]
    async fn lists_runs_per_configuration() {
        let dir = tempdir().expect("temp dir");
        let store = RocksDbCheckpointStore::open(dir.path()).expect("open");

        store.save("squash-k2-c100-h2", b"a").await.unwrap();
        store.save("squash-k3-c100-h2", b"b").await.unwrap();
        let runs = store.list_runs().await.unwrap();
        assert_eq!(runs, vec!["squash-k2-c100-h2", "squash-k3-c100-h2"]);
    }

    #[tokio::test]
    async fn checkpoints_survive_reopen() {
        let dir = tempdir().expect("temp dir");
        {
            let store = RocksDbCheckpointStore::open(dir.path()).expect("open");
            store.save("r", b"persisted").await.unwrap();
        }
        let store = RocksDbCheckpointStore::open(dir.path()).expect("reopen");
        assert_eq!(store.load("r").await.unwrap(), Some(b"persisted".to_vec()));
    }
}
