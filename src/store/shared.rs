//! Async handle around the store: one writer at a time, snapshot after each change.
//!
//! Persistence is best effort. When SQLite is slow or failing, the service
//! keeps serving from memory and logs a warning instead of failing requests.

use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;

use super::{seed, Store};
use crate::db::Repository;
use crate::models::Datastore;
use crate::errors::AppError;

pub struct SharedStore {
    store: RwLock<Store>,
    repo: Option<Repository>,
    /// Revision of the newest snapshot handed to SQLite; serializes saves.
    persisted: Mutex<Option<i64>>,
    write_timeout: Duration,
}

impl SharedStore {
    pub fn new(store: Store, repo: Option<Repository>, write_timeout: Duration) -> Self {
        Self {
            store: RwLock::new(store),
            repo,
            persisted: Mutex::new(None),
            write_timeout,
        }
    }

    /// Restore the last snapshot, falling back to seed data (or an empty
    /// store when `use_seed` is false) if there is none or loading fails.
    pub async fn open(
        repo: Option<Repository>,
        use_seed: bool,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Self {
        let loaded = match &repo {
            Some(repo) => match timeout(read_timeout, repo.load()).await {
                Ok(Ok(snapshot)) => snapshot,
                Ok(Err(e)) => {
                    tracing::warn!("Failed to load snapshot, using fallback data: {}", e);
                    None
                }
                Err(_) => {
                    tracing::warn!(
                        "Loading snapshot timed out after {:?}, using fallback data",
                        read_timeout
                    );
                    None
                }
            },
            None => None,
        };

        let (store, fresh) = match loaded {
            Some(snapshot) => {
                tracing::info!("Restored snapshot at revision {}", snapshot.revision_id);
                (Store::from_datastore(snapshot), false)
            }
            None if use_seed => {
                tracing::info!("Starting from built-in sample data");
                (seed(), true)
            }
            None => (Store::new(), true),
        };

        let shared = Self::new(store, repo, write_timeout);
        if fresh {
            let snapshot = shared.read(Store::datastore).await;
            shared.persist(snapshot).await;
        }
        shared
    }

    /// Run a read-only closure against the current state.
    pub async fn read<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        let store = self.store.read().await;
        f(&*store)
    }

    /// Run one mutation under the write lock and persist if it changed anything.
    ///
    /// The snapshot is taken under the lock but saved after releasing it, so
    /// readers never wait on SQLite. Returns the operation's result together
    /// with the revision after it.
    pub async fn write<R>(
        &self,
        f: impl FnOnce(&mut Store) -> Result<R, AppError>,
    ) -> (Result<R, AppError>, i64) {
        let (result, revision_id, snapshot) = {
            let mut store = self.store.write().await;
            let before = store.revision_id();
            let result = f(&mut *store);
            let snapshot = (store.revision_id() != before).then(|| store.datastore());
            (result, store.revision_id(), snapshot)
        };

        if let Some(snapshot) = snapshot {
            self.persist(snapshot).await;
        }
        (result, revision_id)
    }

    /// Save `snapshot` unless a newer one was already saved.
    async fn persist(&self, snapshot: Datastore) {
        let Some(repo) = &self.repo else {
            return;
        };

        let mut persisted = self.persisted.lock().await;
        if persisted.is_some_and(|revision| revision >= snapshot.revision_id) {
            tracing::debug!("Skipping stale snapshot at revision {}", snapshot.revision_id);
            return;
        }

        match timeout(self.write_timeout, repo.save(&snapshot)).await {
            Ok(Ok(())) => *persisted = Some(snapshot.revision_id),
            Ok(Err(e)) => tracing::warn!(
                "Failed to persist revision {}, keeping in-memory state: {}",
                snapshot.revision_id,
                e
            ),
            Err(_) => tracing::warn!(
                "Persisting revision {} timed out after {:?}, keeping in-memory state",
                snapshot.revision_id,
                self.write_timeout
            ),
        }
    }
}
