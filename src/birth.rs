// 🎂 Birth Records
// What the user-account side stores, and the parsed record the engine derives from
//
// Stored values are strings (ISO-8601 birth date, opaque birth time).
// Parsing here is the only place calendar validity is checked.

use crate::error::ProfileError;
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// STORED USER DETAILS
// ============================================================================

/// Birth details as held by the user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBirthDetails {
    pub user_id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// ISO-8601 date (`1990-07-16`) or RFC 3339 timestamp
    #[serde(default)]
    pub birth_date: Option<String>,

    /// Opaque, carried into the snapshot untouched
    #[serde(default)]
    pub birth_time: Option<String>,
}

impl UserBirthDetails {
    pub fn new(user_id: &str, name: Option<&str>, birth_date: Option<&str>) -> Self {
        UserBirthDetails {
            user_id: user_id.to_string(),
            name: name.map(str::to_string),
            birth_date: birth_date.map(str::to_string),
            birth_time: None,
        }
    }

    pub fn with_birth_time(mut self, birth_time: &str) -> Self {
        self.birth_time = Some(birth_time.to_string());
        self
    }

    /// Birth date with blanks treated as missing
    pub fn birth_date(&self) -> Option<&str> {
        non_blank(self.birth_date.as_deref())
    }

    pub fn birth_time(&self) -> Option<&str> {
        non_blank(self.birth_time.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// BIRTH RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthRecord {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub name: Option<String>,
}

impl BirthRecord {
    /// Build a record without calendar checks
    pub fn new(year: u32, month: u32, day: u32, name: Option<&str>) -> Self {
        BirthRecord {
            year,
            month,
            day,
            name: clean_name(name),
        }
    }

    /// Parse a stored birth date.
    ///
    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its date part is used).
    /// Impossible dates such as Feb 30 are rejected, as are years before 1.
    pub fn from_iso_date(value: &str, name: Option<&str>) -> Result<Self, ProfileError> {
        let trimmed = value.trim();

        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
            .map_err(|e| ProfileError::invalid_birth_date(value, e.to_string()))?;

        if date.year() < 1 {
            return Err(ProfileError::invalid_birth_date(value, "year must be 1 or later"));
        }

        Ok(BirthRecord {
            year: date.year() as u32,
            month: date.month(),
            day: date.day(),
            name: clean_name(name),
        })
    }

    /// `YYYY-MM-DD`
    pub fn iso_date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn clean_name(name: Option<&str>) -> Option<String> {
    non_blank(name).map(str::to_string)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let birth = BirthRecord::from_iso_date("1990-07-16", Some("Anna")).unwrap();
        assert_eq!(birth.year, 1990);
        assert_eq!(birth.month, 7);
        assert_eq!(birth.day, 16);
        assert_eq!(birth.name.as_deref(), Some("Anna"));
        assert_eq!(birth.iso_date(), "1990-07-16");
    }

    #[test]
    fn test_parse_timestamp() {
        let birth = BirthRecord::from_iso_date("1985-12-22T08:30:00Z", None).unwrap();
        assert_eq!((birth.year, birth.month, birth.day), (1985, 12, 22));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        for value in ["1990-02-30", "1990-13-01", "1990-01-32", "yesterday", ""] {
            let err = BirthRecord::from_iso_date(value, None).unwrap_err();
            assert!(
                matches!(err, ProfileError::InvalidBirthDate { .. }),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_leap_day_accepted() {
        assert!(BirthRecord::from_iso_date("2000-02-29", None).is_ok());
        assert!(BirthRecord::from_iso_date("1999-02-29", None).is_err());
    }

    #[test]
    fn test_blank_name_is_none() {
        let birth = BirthRecord::from_iso_date("1990-07-16", Some("   ")).unwrap();
        assert_eq!(birth.name, None);
        let birth = BirthRecord::new(1990, 7, 16, Some("  Anna "));
        assert_eq!(birth.name.as_deref(), Some("Anna"));
    }

    #[test]
    fn test_blank_birth_date_is_missing() {
        let details = UserBirthDetails::new("u1", Some("Anna"), Some("  "));
        assert_eq!(details.birth_date(), None);

        let details =
            UserBirthDetails::new("u1", None, Some("1990-07-16")).with_birth_time("14:05");
        assert_eq!(details.birth_date(), Some("1990-07-16"));
        assert_eq!(details.birth_time(), Some("14:05"));
    }
}
