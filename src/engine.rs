// ⚙️ Profile Engine
// Load birth details → derive → persist (create or full replace) → audit
//
// Preconditions are checked before any derivation; on failure the store is
// never touched. The upsert itself is one atomic write, never retried here.

use crate::birth::BirthRecord;
use crate::clock::{Clock, SystemClock};
use crate::error::ProfileError;
use crate::profile::{AstrologyProfile, ProfileStatus};
use crate::store::{Event, ProfileStore, UpsertOutcome, UserDirectory};
use tracing::{debug, info, instrument, warn};

pub const PROFILE_ENTITY: &str = "astrology_profile";

pub struct ProfileEngine<C: Clock = SystemClock> {
    clock: C,
    actor: String,
}

impl ProfileEngine<SystemClock> {
    pub fn new() -> Self {
        ProfileEngine::with_clock(SystemClock)
    }
}

impl Default for ProfileEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ProfileEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        ProfileEngine {
            clock,
            actor: "profile_engine".to_string(),
        }
    }

    /// Name recorded as the actor of audit events
    pub fn with_actor(mut self, actor: &str) -> Self {
        self.actor = actor.to_string();
        self
    }

    /// Derive (but do not store) the profile for a user
    #[instrument(name = "profile_engine.compute", skip(self, users))]
    pub fn compute_profile<U>(
        &self,
        users: &U,
        user_id: &str,
    ) -> Result<AstrologyProfile, ProfileError>
    where
        U: UserDirectory + ?Sized,
    {
        let details = users
            .find_birth_details(user_id)?
            .ok_or_else(|| ProfileError::user_not_found(user_id))?;

        let birth_date = details
            .birth_date()
            .ok_or_else(|| ProfileError::birth_date_required(user_id))?;

        let birth = BirthRecord::from_iso_date(birth_date, details.name.as_deref())?;
        debug!(birth_date = %birth.iso_date(), has_name = birth.name.is_some(), "deriving profile");

        // One clock read: the snapshot time and the Personal Year share it
        let now = self.clock.now();
        let profile = AstrologyProfile::compute(user_id, &birth, details.birth_time(), now);

        debug!(
            sun_sign = %profile.sun_sign,
            life_path = profile.life_path,
            personal_year = profile.personal_year,
            "profile derived"
        );

        Ok(profile)
    }

    /// Compute and persist the profile for `user_id`, replacing any earlier one
    #[instrument(name = "profile_engine.upsert", skip(self, users, store))]
    pub fn upsert_profile<U, S>(
        &self,
        users: &U,
        store: &S,
        user_id: &str,
    ) -> Result<AstrologyProfile, ProfileError>
    where
        U: UserDirectory + ?Sized,
        S: ProfileStore + ?Sized,
    {
        let profile = self.compute_profile(users, user_id)?;
        let outcome = store.upsert_profile(&profile)?;

        info!(
            created = outcome.was_created(),
            changed = outcome.changed(),
            fingerprint = %outcome.profile.fingerprint,
            "profile stored"
        );

        self.audit(store, &outcome);

        Ok(outcome.profile)
    }

    /// Most recently stored profile, or `NotComputed`
    #[instrument(name = "profile_engine.get", skip(self, store))]
    pub fn get_profile<S>(&self, store: &S, user_id: &str) -> Result<ProfileStatus, ProfileError>
    where
        S: ProfileStore + ?Sized,
    {
        Ok(store.find_profile(user_id)?.into())
    }

    fn audit<S: ProfileStore + ?Sized>(&self, store: &S, outcome: &UpsertOutcome) {
        let event_type = if outcome.was_created() {
            "profile_created"
        } else {
            "profile_recomputed"
        };

        let profile = &outcome.profile;
        let event = Event::new(
            event_type,
            PROFILE_ENTITY,
            &profile.user_id,
            serde_json::json!({
                "profile_id": profile.id,
                "fingerprint": profile.fingerprint,
                "previous_fingerprint": outcome.previous_fingerprint,
                "changed": outcome.changed(),
                "sun_sign": profile.sun_sign,
                "life_path": profile.life_path,
            }),
            &self.actor,
            self.clock.now(),
        );

        // Audit failure never fails an already committed upsert
        if let Err(e) = store.record_event(&event) {
            warn!(error = %e, "failed to record audit event");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
