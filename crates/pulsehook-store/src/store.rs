//! Job persistence contract.

use async_trait::async_trait;
use uuid::Uuid;

use pulsehook_core::Job;

use crate::error::StoreError;

/// Job store trait.
///
/// The trigger loop only calls [`JobStore::fetch_all`]; it never holds on to
/// records between ticks. `insert` and `remove` exist for administration.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch a snapshot of every job record.
    async fn fetch_all(&self) -> Result<Vec<Job>, StoreError>;

    /// Insert a new job.
    async fn insert(&self, job: &Job) -> Result<(), StoreError>;

    /// Delete a job by id. Returns whether a record existed.
    async fn remove(&self, id: &Uuid) -> Result<bool, StoreError>;
}

/// In-memory job store for testing.
pub struct MemoryJobStore {
    jobs: tokio::sync::RwLock<std::collections::HashMap<Uuid, Job>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            jobs: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }

    /// Create a store pre-populated with `jobs`.
    pub fn with_jobs(jobs: impl IntoIterator<Item = Job>) -> Self {
        Self {
            jobs: tokio::sync::RwLock::new(
                jobs.into_iter().map(|j| (j.id, j)).collect(),
            ),
        }
    }
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn fetch_all(&self) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.values().cloned().collect())
    }

    async fn insert(&self, job: &Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn remove(&self, id: &Uuid) -> Result<bool, StoreError> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_insert_and_fetch() {
        let store = MemoryJobStore::new();
        let job = Job::new("https://example.com/hook", "* * * * *");

        store.insert(&job).await.unwrap();

        let jobs = store.fetch_all().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, job.id);
    }

    #[tokio::test]
    async fn test_memory_store_remove() {
        let store = MemoryJobStore::new();
        let job = Job::new("https://example.com/hook", "* * * * *");

        store.insert(&job).await.unwrap();
        assert!(store.remove(&job.id).await.unwrap());
        assert!(!store.remove(&job.id).await.unwrap());
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_with_jobs() {
        let a = Job::new("https://a.test/x", "* * * * *");
        let b = Job::new("https://b.test/y", "0 0 * * *");
        let store = MemoryJobStore::with_jobs([a, b]);

        assert_eq!(store.fetch_all().await.unwrap().len(), 2);
    }
}
