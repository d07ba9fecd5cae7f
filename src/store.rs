// 🗄️ Storage Ports
// What the engine needs from the user-account side and from profile storage.
// rusqlite::Connection implements both (see db.rs).

use crate::birth::UserBirthDetails;
use crate::profile::AstrologyProfile;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only access to stored user birth details
pub trait UserDirectory {
    /// None if the user does not exist
    fn find_birth_details(&self, user_id: &str) -> Result<Option<UserBirthDetails>>;
}

/// Result of a create-or-replace
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    /// The row as stored after the write
    pub profile: AstrologyProfile,

    /// Fingerprint that was replaced (None = profile was created)
    pub previous_fingerprint: Option<String>,
}

impl UpsertOutcome {
    pub fn was_created(&self) -> bool {
        self.previous_fingerprint.is_none()
    }

    /// True if the derived values differ from what was stored before
    pub fn changed(&self) -> bool {
        self.previous_fingerprint.as_deref() != Some(self.profile.fingerprint.as_str())
    }
}

/// Persistence for the one-per-user profile aggregate
pub trait ProfileStore {
    /// Create, or replace every derived field of, the profile for `profile.user_id`.
    ///
    /// Must be atomic: either the whole profile is written or nothing is.
    fn upsert_profile(&self, profile: &AstrologyProfile) -> Result<UpsertOutcome>;

    fn find_profile(&self, user_id: &str) -> Result<Option<AstrologyProfile>>;

    fn record_event(&self, event: &Event) -> Result<()>;
}

// ============================================================================
// AUDIT EVENTS
// ============================================================================

/// Event for audit trail ("every change is an event")
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}
