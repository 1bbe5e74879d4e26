//! Custom (derived) miscrit profiles.
//!
//! This module provides:
//! - The stored profile record (`{name, baseName, stats}`)
//! - The repository contract the profile list is persisted through
//! - An in-memory repository
//! - Profile authoring: validation, create, edit/rename, delete

use miscrit_common::{StatBlock, StoreResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::roster::Roster;

/// Key under which the profile list is stored.
pub const CUSTOM_PROFILES_KEY: &str = "customMiscrits";

/// Longest allowed custom profile name, in characters.
pub const MAX_PROFILE_NAME_LEN: usize = 25;

/// Errors that can occur while authoring a profile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// No base miscrit was chosen.
    #[error("A base miscrit must be selected")]
    MissingBase,

    /// The chosen base miscrit does not exist.
    #[error("Unknown base miscrit: {0}")]
    UnknownBase(String),

    /// Another miscrit already uses this name.
    #[error("A miscrit named \"{0}\" already exists")]
    NameTaken(String),

    /// No profile with this name exists.
    #[error("Custom profile not found: {0}")]
    NotFound(String),
}

/// Result type for profile authoring.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// A stored custom profile: a renamed, re-statted copy of a base miscrit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProfile {
    /// Unique display name.
    pub name: String,
    /// Name of the base miscrit this profile derives from.
    pub base_name: String,
    /// Custom stats.
    #[serde(default)]
    pub stats: StatBlock,
}

/// Durable storage for the custom profile list.
///
/// Implementations must swallow unreadable data: `load_all` returns an
/// empty list rather than an error.
pub trait ProfileRepository {
    /// Load every stored profile.
    fn load_all(&self) -> Vec<CustomProfile>;

    /// Replace the stored list.
    fn save_all(&self, profiles: &[CustomProfile]) -> StoreResult<()>;
}

/// Repository that keeps profiles in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    profiles: Mutex<Vec<CustomProfile>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-filled with profiles.
    #[must_use]
    pub fn with_profiles(profiles: Vec<CustomProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
        }
    }
}

impl ProfileRepository for MemoryRepository {
    fn load_all(&self) -> Vec<CustomProfile> {
        self.profiles.lock().clone()
    }

    fn save_all(&self, profiles: &[CustomProfile]) -> StoreResult<()> {
        *self.profiles.lock() = profiles.to_vec();
        Ok(())
    }
}

/// Input for creating or editing a profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileDraft {
    /// Base miscrit name.
    pub base_name: String,
    /// Requested display name; may be blank.
    pub name: String,
    /// Custom stats.
    pub stats: StatBlock,
}

/// Trim and truncate a requested name, defaulting to `"<base> (Own)"`.
#[must_use]
pub fn sanitize_name(requested: &str, base_name: &str) -> String {
    let name: String = requested.trim().chars().take(MAX_PROFILE_NAME_LEN).collect();
    if name.is_empty() {
        format!("{base_name} (Own)")
    } else {
        name
    }
}

/// The custom profile list and the repository it persists to.
pub struct ProfileBook<R: ProfileRepository> {
    repository: R,
    profiles: Vec<CustomProfile>,
}

impl<R: ProfileRepository> ProfileBook<R> {
    /// Open the book, loading every stored profile.
    pub fn open(repository: R) -> Self {
        let profiles = repository.load_all();
        debug!("Loaded {} custom profiles", profiles.len());
        Self {
            repository,
            profiles,
        }
    }

    /// Current profiles in stored order.
    #[must_use]
    pub fn profiles(&self) -> &[CustomProfile] {
        &self.profiles
    }

    /// Look up a profile by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CustomProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Validate a draft against the roster without saving it.
    ///
    /// `editing` names the profile being modified, which may keep its name.
    pub fn prepare(
        &self,
        draft: &ProfileDraft,
        roster: &Roster,
        editing: Option<&str>,
    ) -> ProfileResult<CustomProfile> {
        let base_name = draft.base_name.trim();
        if base_name.is_empty() {
            return Err(ProfileError::MissingBase);
        }
        if !roster.base().iter().any(|m| m.name == base_name) {
            return Err(ProfileError::UnknownBase(base_name.to_string()));
        }

        let name = sanitize_name(&draft.name, base_name);
        let clashes = |other: &str| other == name && editing != Some(other);
        let taken = roster.iter().any(|m| clashes(&m.name))
            || self.profiles.iter().any(|p| clashes(&p.name));
        if taken {
            return Err(ProfileError::NameTaken(name));
        }

        Ok(CustomProfile {
            name,
            base_name: base_name.to_string(),
            stats: draft.stats,
        })
    }

    /// Validate and store a draft, returning the saved profile.
    ///
    /// Renaming removes the old record and appends the new one; otherwise a
    /// record with the same name is replaced in place or the draft appended.
    pub fn save(
        &mut self,
        draft: &ProfileDraft,
        roster: &Roster,
        editing: Option<&str>,
    ) -> ProfileResult<CustomProfile> {
        let profile = self.prepare(draft, roster, editing)?;

        match editing.filter(|old| *old != profile.name) {
            Some(old) => {
                self.profiles.retain(|p| p.name != old);
                self.profiles.push(profile.clone());
            },
            None => match self.profiles.iter_mut().find(|p| p.name == profile.name) {
                Some(existing) => *existing = profile.clone(),
                None => self.profiles.push(profile.clone()),
            },
        }

        self.persist();
        Ok(profile)
    }

    /// Remove a profile by name.
    pub fn delete(&mut self, name: &str) -> ProfileResult<()> {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.name != name);
        if self.profiles.len() == before {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        self.persist();
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save_all(&self.profiles) {
            warn!("Could not save custom profiles: {e}");
        }
    }
}
