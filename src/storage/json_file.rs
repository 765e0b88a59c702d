use super::{
    Collection, Profile, ProfileStore, ProfileUpdate, Project, StoreError, StoreResult,
    UpdateOutcome,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Persistent collection stored as a JSON array of documents in one file.
///
/// Every call reads the file again; nothing is cached between requests.
/// Writes land in a temp sibling that is renamed over the collection, and
/// read-modify-write sequences hold `write_lock` for their whole duration.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the collection file (and its directory) if it does not exist
    pub async fn initialize(&self) -> StoreResult<usize> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if !fs::try_exists(&self.path).await? {
            info!(path = ?self.path, "Creating empty collection");
            self.save(&Collection::default()).await?;
        }

        let documents = self.load().await?.documents.len();
        Ok(documents)
    }

    async fn load(&self) -> StoreResult<Collection> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Unavailable(format!(
                    "collection file {} is missing",
                    self.path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Collection::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, collection: &Collection) -> StoreResult<()> {
        let temp_path = self.path.with_extension("tmp");
        let bytes = serde_json::to_vec_pretty(collection)?;
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &self.path).await?;
        debug!(documents = collection.documents.len(), "Collection saved");
        Ok(())
    }

    async fn modify<T, F>(&self, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Collection) -> T + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.load().await?;
        let result = apply(&mut collection);
        self.save(&collection).await?;
        Ok(result)
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn find_profile(&self) -> StoreResult<Option<Profile>> {
        Ok(self.load().await?.profile().cloned())
    }

    async fn insert_profile_if_absent(&self, profile: Profile) -> StoreResult<bool> {
        self.modify(|collection| collection.insert_profile_if_absent(profile))
            .await
    }

    async fn update_profile(
        &self,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<UpdateOutcome> {
        self.modify(|collection| collection.update_profile(&update, now))
            .await
    }

    async fn push_project(&self, project: Project, now: DateTime<Utc>) -> StoreResult<bool> {
        self.modify(|collection| collection.push_project(project, now))
            .await
    }

    async fn increment_visitors(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        self.modify(|collection| collection.increment_visitors(now))
            .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.load().await.map(|_| ())
    }
}
