// ✨ Astrology Profile - the persisted aggregate (one per user)
//
// Built fresh on every computation and never mutated in place:
// a recomputation replaces ALL derived fields and the full_data snapshot.
//
// Identity: id (UUID) + user_id, stable across recomputations
// Values:   everything derived from the current birth record

use crate::birth::BirthRecord;
use crate::lucky::{lucky_colors, lucky_numbers};
use crate::numerology::{derive_all, NumerologyProfile};
use crate::zodiac::{resolve_sun_sign, Element, Modality, Sign};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// SNAPSHOT PARTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstrologySnapshot {
    pub sun_sign: Sign,
    pub element: Element,
    pub modality: Modality,
    pub ruling_planet: String,
}

impl AstrologySnapshot {
    pub fn for_sign(sign: Sign) -> Self {
        AstrologySnapshot {
            sun_sign: sign,
            element: sign.element(),
            modality: sign.modality(),
            ruling_planet: sign.ruling_planet().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyAttributes {
    pub numbers: Vec<u32>,
    pub colors: Vec<String>,
}

impl LuckyAttributes {
    pub fn for_life_path(life_path: u32) -> Self {
        LuckyAttributes {
            numbers: lucky_numbers(life_path),
            colors: lucky_colors(life_path),
        }
    }
}

/// Archival copy of everything derived, plus what it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullData {
    pub astrology: AstrologySnapshot,
    pub numerology: NumerologyProfile,
    pub lucky: LuckyAttributes,
    pub calculated_at: DateTime<Utc>,
    pub birth_date: String,
    #[serde(default)]
    pub birth_time: Option<String>,
}

// ============================================================================
// AGGREGATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstrologyProfile {
    pub id: String,
    pub user_id: String,

    // Astrology
    pub sun_sign: Sign,
    pub element: Element,
    pub modality: Modality,
    pub ruling_planet: String,

    // Numerology
    pub life_path: u32,
    pub birthday: u32,
    pub personal_year: u32,
    pub destiny: Option<u32>,
    pub soul_urge: Option<u32>,
    pub personality: Option<u32>,

    // Lucky attributes
    pub lucky_numbers: Vec<u32>,
    pub lucky_colors: Vec<String>,

    /// SHA-256 of the derived values (timestamps excluded)
    pub fingerprint: String,

    pub full_data: FullData,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AstrologyProfile {
    /// Derive a complete profile for `user_id`.
    ///
    /// `now` stamps the snapshot and its calendar year is the Personal Year's.
    pub fn compute(
        user_id: &str,
        birth: &BirthRecord,
        birth_time: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let as_of_year = now.year().max(1) as u32;
        let sign = resolve_sun_sign(birth.month, birth.day);
        let astrology = AstrologySnapshot::for_sign(sign);
        let numerology = derive_all(birth, as_of_year);
        let lucky = LuckyAttributes::for_life_path(numerology.life_path);
        let fingerprint = compute_fingerprint(&astrology, &numerology, &lucky);

        let full_data = FullData {
            astrology: astrology.clone(),
            numerology: numerology.clone(),
            lucky: lucky.clone(),
            calculated_at: now,
            birth_date: birth.iso_date(),
            birth_time: birth_time.map(str::to_string),
        };

        AstrologyProfile {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            sun_sign: astrology.sun_sign,
            element: astrology.element,
            modality: astrology.modality,
            ruling_planet: astrology.ruling_planet,
            life_path: numerology.life_path,
            birthday: numerology.birthday,
            personal_year: numerology.personal_year,
            destiny: numerology.destiny,
            soul_urge: numerology.soul_urge,
            personality: numerology.personality,
            lucky_numbers: lucky.numbers,
            lucky_colors: lucky.colors,
            fingerprint,
            full_data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Numerology view of the flat fields
    pub fn numerology(&self) -> NumerologyProfile {
        NumerologyProfile {
            life_path: self.life_path,
            birthday: self.birthday,
            personal_year: self.personal_year,
            destiny: self.destiny,
            soul_urge: self.soul_urge,
            personality: self.personality,
        }
    }

    /// Astrology view of the flat fields
    pub fn astrology(&self) -> AstrologySnapshot {
        AstrologySnapshot {
            sun_sign: self.sun_sign,
            element: self.element,
            modality: self.modality,
            ruling_planet: self.ruling_planet.clone(),
        }
    }

    /// Flat fields and snapshot carry the same derived values
    pub fn is_consistent(&self) -> bool {
        self.full_data.astrology == self.astrology()
            && self.full_data.numerology == self.numerology()
            && self.full_data.lucky.numbers == self.lucky_numbers
            && self.full_data.lucky.colors == self.lucky_colors
    }
}

/// Hash over the canonical JSON of the derived sub-objects.
///
/// Same inputs always give the same 64-char hex string; nothing time-based goes in.
pub fn compute_fingerprint(
    astrology: &AstrologySnapshot,
    numerology: &NumerologyProfile,
    lucky: &LuckyAttributes,
) -> String {
    let canonical = serde_json::json!({
        "astrology": astrology,
        "numerology": numerology,
        "lucky": lucky,
    });

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string());
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// READ RESULT
// ============================================================================

/// Answer of the read path: a stored profile, or an explicit "not yet"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "profile", rename_all = "snake_case")]
pub enum ProfileStatus {
    Computed(AstrologyProfile),
    NotComputed,
}

impl ProfileStatus {
    pub fn is_computed(&self) -> bool {
        matches!(self, ProfileStatus::Computed(_))
    }

    pub fn into_profile(self) -> Option<AstrologyProfile> {
        match self {
            ProfileStatus::Computed(profile) => Some(profile),
            ProfileStatus::NotComputed => None,
        }
    }
}

impl From<Option<AstrologyProfile>> for ProfileStatus {
    fn from(profile: Option<AstrologyProfile>) -> Self {
        profile.map_or(ProfileStatus::NotComputed, ProfileStatus::Computed)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_compute_profile() {
        let birth = BirthRecord::new(1990, 7, 16, Some("Anna"));
        let profile = AstrologyProfile::compute("user-1", &birth, Some("14:05"), at(2026));

        assert_eq!(profile.user_id, "user-1");
        assert_eq!(profile.sun_sign, Sign::Cancer);
        assert_eq!(profile.element, Element::Water);
        assert_eq!(profile.modality, Modality::Cardinal);
        assert_eq!(profile.ruling_planet, "Moon");
        assert_eq!(profile.life_path, 6);
        assert_eq!(profile.destiny, Some(3));
        assert_eq!(profile.lucky_numbers, vec![6, 15, 24, 33]);
        assert_eq!(profile.full_data.birth_date, "1990-07-16");
        assert_eq!(profile.full_data.birth_time.as_deref(), Some("14:05"));
        assert_eq!(profile.full_data.calculated_at, at(2026));
        assert_eq!(profile.fingerprint.len(), 64);
        assert!(profile.is_consistent());
    }

    #[test]
    fn test_fingerprint_ignores_time_of_computation() {
        let birth = BirthRecord::new(1990, 7, 16, Some("Anna"));
        let first = AstrologyProfile::compute("u", &birth, None, at(2026));
        let later = AstrologyProfile::compute(
            "u",
            &birth,
            None,
            at(2026) + chrono::Duration::days(30),
        );

        assert_eq!(first.fingerprint, later.fingerprint);
        assert_ne!(first.full_data.calculated_at, later.full_data.calculated_at);
    }

    #[test]
    fn test_fingerprint_tracks_personal_year() {
        let birth = BirthRecord::new(1990, 7, 16, None);
        let this_year = AstrologyProfile::compute("u", &birth, None, at(2026));
        let next_year = AstrologyProfile::compute("u", &birth, None, at(2027));

        assert_ne!(this_year.personal_year, next_year.personal_year);
        assert_ne!(this_year.fingerprint, next_year.fingerprint);
    }

    #[test]
    fn test_personal_year_follows_snapshot_year() {
        let birth = BirthRecord::new(1990, 7, 16, None);
        let new_years_eve = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let profile = AstrologyProfile::compute("u", &birth, None, new_years_eve);

        assert_eq!(profile.full_data.calculated_at.year(), 2026);
        assert_eq!(profile.personal_year, 6);
        assert_eq!(profile.full_data.numerology.personal_year, 6);
    }

    #[test]
    fn test_profile_status_serialization() {
        let json = serde_json::to_value(ProfileStatus::NotComputed).unwrap();
        assert_eq!(json, serde_json::json!({"status": "not_computed"}));

        let birth = BirthRecord::new(1990, 7, 16, None);
        let profile = AstrologyProfile::compute("u", &birth, None, at(2026));
        let json = serde_json::to_value(ProfileStatus::Computed(profile)).unwrap();
        assert_eq!(json["status"], "computed");
        assert_eq!(json["profile"]["sun_sign"], "Cancer");
        assert_eq!(json["profile"]["full_data"]["numerology"]["life_path"], 6);
    }

    #[test]
    fn test_status_from_option() {
        assert_eq!(ProfileStatus::from(None), ProfileStatus::NotComputed);
        assert!(!ProfileStatus::NotComputed.is_computed());
        assert!(ProfileStatus::NotComputed.into_profile().is_none());
    }
}
