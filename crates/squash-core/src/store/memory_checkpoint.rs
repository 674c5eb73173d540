//! In-memory checkpoint store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SquashResult;
use crate::traits::CheckpointStore;

/// Map-backed [`CheckpointStore`].
///
/// Checkpoints survive only for the lifetime of the process; use the
/// RocksDB store from `squash-storage` when resuming across restarts
/// matters.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    runs: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn load(&self, run_id: &str) -> SquashResult<Option<Vec<u8>>> {
        Ok(self.runs.lock().get(run_id).cloned())
    }

    async fn save(&self, run_id: &str, bytes: &[u8]) -> SquashResult<()> {
        self.runs.lock().insert(run_id.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, run_id: &str) -> SquashResult<()> {
        self.runs.lock().remove(run_id);
        Ok(())
    }

    async fn list_runs(&self) -> SquashResult<Vec<String>> {
        Ok(self.runs.lock().keys().cloned().collect())
    }
}
