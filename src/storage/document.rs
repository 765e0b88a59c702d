use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document in the portfolio collection.
///
/// Both roles share one collection and are told apart by the `type` field:
/// `"main"` for the profile, `"counter"` for the visitor counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Document {
    #[serde(rename = "main")]
    Profile(Profile),
    #[serde(rename = "counter")]
    Counter(VisitorCounter),
}

/// The singleton portfolio profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub projects: Vec<Project>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A project embedded in the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// The singleton visitor counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorCounter {
    pub count: u64,
    pub last_visit: DateTime<Utc>,
}

/// Fields that may be changed by a profile update.
/// Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Result of a profile update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: bool,
    pub modified: bool,
    /// `updatedAt` as stored after the update
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Create a project with a fresh unique id
    pub fn new(name: String, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            created_at: now,
        }
    }
}

impl Profile {
    /// Apply a partial update. Returns true if anything changed.
    pub fn apply(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) -> bool {
        let mut modified = false;
        modified |= assign(&mut self.name, &update.name);
        modified |= assign(&mut self.title, &update.title);
        modified |= assign(&mut self.location, &update.location);
        modified |= assign(&mut self.email, &update.email);
        modified |= assign(&mut self.bio, &update.bio);
        modified |= assign(&mut self.skills, &update.skills);
        modified |= self.touch(now);
        modified
    }

    /// Refresh `updated_at`, never moving it before `created_at`.
    fn touch(&mut self, now: DateTime<Utc>) -> bool {
        let updated_at = now.max(self.created_at);
        if updated_at == self.updated_at {
            return false;
        }
        self.updated_at = updated_at;
        true
    }
}

fn assign<T: PartialEq + Clone>(field: &mut T, value: &Option<T>) -> bool {
    match value {
        Some(value) if field != value => {
            *field = value.clone();
            true
        }
        _ => false,
    }
}

/// The whole document collection, as persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub documents: Vec<Document>,
}

impl Collection {
    pub fn profile(&self) -> Option<&Profile> {
        self.documents.iter().find_map(|doc| match doc {
            Document::Profile(profile) => Some(profile),
            _ => None,
        })
    }

    fn profile_mut(&mut self) -> Option<&mut Profile> {
        self.documents.iter_mut().find_map(|doc| match doc {
            Document::Profile(profile) => Some(profile),
            _ => None,
        })
    }

    fn counter_mut(&mut self) -> Option<&mut VisitorCounter> {
        self.documents.iter_mut().find_map(|doc| match doc {
            Document::Counter(counter) => Some(counter),
            _ => None,
        })
    }

    /// Insert the profile unless one already exists
    pub fn insert_profile_if_absent(&mut self, profile: Profile) -> bool {
        if self.profile().is_some() {
            return false;
        }
        self.documents.push(Document::Profile(profile));
        true
    }

    pub fn update_profile(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) -> UpdateOutcome {
        match self.profile_mut() {
            Some(profile) => UpdateOutcome {
                matched: true,
                modified: profile.apply(update, now),
                updated_at: Some(profile.updated_at),
            },
            None => UpdateOutcome {
                matched: false,
                modified: false,
                updated_at: None,
            },
        }
    }

    /// Append a project to the profile. Returns false if there is no profile.
    pub fn push_project(&mut self, project: Project, now: DateTime<Utc>) -> bool {
        match self.profile_mut() {
            Some(profile) => {
                profile.projects.push(project);
                profile.touch(now);
                true
            }
            None => false,
        }
    }

    /// Bump the visitor counter, creating it at 1 if absent
    pub fn increment_visitors(&mut self, now: DateTime<Utc>) -> u64 {
        if let Some(counter) = self.counter_mut() {
            counter.count += 1;
            counter.last_visit = now;
            return counter.count;
        }
        self.documents.push(Document::Counter(VisitorCounter {
            count: 1,
            last_visit: now,
        }));
        1
    }
}
