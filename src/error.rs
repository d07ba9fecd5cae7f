// ⚠️ Profile Errors
// Precondition failures are reported before any derivation runs;
// storage failures are surfaced as-is, never retried here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("Cannot compute profile for user {user_id}: birth date required")]
    BirthDateRequired { user_id: String },

    #[error("Invalid birth date '{value}': {reason}")]
    InvalidBirthDate { value: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ProfileError {
    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        Self::UserNotFound {
            user_id: user_id.into(),
        }
    }

    pub fn birth_date_required(user_id: impl Into<String>) -> Self {
        Self::BirthDateRequired {
            user_id: user_id.into(),
        }
    }

    pub fn invalid_birth_date(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBirthDate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Raised before any computation (nothing was persisted)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. }
                | Self::BirthDateRequired { .. }
                | Self::InvalidBirthDate { .. }
        )
    }

    /// Storage-side failure the caller may report as transient
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
