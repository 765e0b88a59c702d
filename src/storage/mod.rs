pub mod document;
pub mod json_file;
pub mod memory;

pub use document::{Collection, Document, Profile, ProfileUpdate, Project, UpdateOutcome};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

/// Errors raised by a profile store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed collection: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Access to the portfolio collection.
///
/// Every operation is atomic with respect to the others on the same store,
/// including the insert-if-absent and increment sequences.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile document, if any
    async fn find_profile(&self) -> StoreResult<Option<Profile>>;

    /// Insert the profile unless one exists. Returns true if inserted.
    async fn insert_profile_if_absent(&self, profile: Profile) -> StoreResult<bool>;

    /// Apply a partial update and refresh `updatedAt`
    async fn update_profile(
        &self,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<UpdateOutcome>;

    /// Append a project. Returns false if no profile matched.
    async fn push_project(&self, project: Project, now: DateTime<Utc>) -> StoreResult<bool>;

    /// Increment the visitor counter and return the new count
    async fn increment_visitors(&self, now: DateTime<Utc>) -> StoreResult<u64>;

    /// Trivial read used by the health check
    async fn ping(&self) -> StoreResult<()>;
}

/// Seed the profile on startup. Safe to call on every start.
pub async fn ensure_profile(store: &dyn ProfileStore, seed: Profile) -> StoreResult<bool> {
    let inserted = store.insert_profile_if_absent(seed).await?;
    if inserted {
        info!("Inserted initial profile document");
    } else {
        info!("Profile document already present");
    }
    Ok(inserted)
}
