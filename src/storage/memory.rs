use super::{
    Collection, Profile, ProfileStore, ProfileUpdate, Project, StoreError, StoreResult,
    UpdateOutcome,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory profile store (for development/testing).
///
/// Nothing survives a restart. Tests can switch it offline to exercise the
/// unreachable-store paths.
pub struct MemoryStore {
    collection: RwLock<Collection>,
    online: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collection: RwLock::new(Collection::default()),
            online: AtomicBool::new(true),
        }
    }

    /// Make every subsequent operation fail
    #[cfg(test)]
    pub fn disconnect(&self) {
        self.online.store(false, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn reconnect(&self) {
        self.online.store(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile(&self) -> StoreResult<Option<Profile>> {
        self.check_online()?;
        Ok(self.collection.read().await.profile().cloned())
    }

    async fn insert_profile_if_absent(&self, profile: Profile) -> StoreResult<bool> {
        self.check_online()?;
        Ok(self.collection.write().await.insert_profile_if_absent(profile))
    }

    async fn update_profile(
        &self,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<UpdateOutcome> {
        self.check_online()?;
        Ok(self.collection.write().await.update_profile(&update, now))
    }

    async fn push_project(&self, project: Project, now: DateTime<Utc>) -> StoreResult<bool> {
        self.check_online()?;
        Ok(self.collection.write().await.push_project(project, now))
    }

    async fn increment_visitors(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        self.check_online()?;
        Ok(self.collection.write().await.increment_visitors(now))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_online()?;
        // Waits out any writer holding the collection
        drop(self.collection.read().await);
        Ok(())
    }
}
