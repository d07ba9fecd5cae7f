// Mythic Profile - Core Library
// Numerology & astrology derivation plus the one-per-user profile store.
// Used by the CLI, the API server, and the tests.

pub mod reduction;  // Digit reduction (master numbers 11/22/33)
pub mod zodiac;     // Sun sign from month/day
pub mod letters;    // Pythagorean letter tables
pub mod numerology; // Life Path, Birthday, Personal Year, name numbers
pub mod lucky;      // Lucky numbers/colors by Life Path
pub mod birth;      // Stored birth details → BirthRecord
pub mod clock;      // Injected "now" for Personal Year
pub mod profile;    // AstrologyProfile aggregate + full_data snapshot
pub mod store;      // Storage ports + audit events
pub mod db;         // SQLite implementation of the ports
pub mod engine;     // Upsert / read contract
pub mod error;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use reduction::{reduce, reduce_master, is_master, MASTER_NUMBERS};
pub use zodiac::{resolve_sun_sign, Element, Modality, Sign, ALL_SIGNS};
pub use letters::{map_and_sum, LetterTable};
pub use numerology::{derive_all, NumerologyProfile};
pub use lucky::{lucky_colors, lucky_numbers};
pub use birth::{BirthRecord, UserBirthDetails};
pub use clock::{Clock, FixedClock, SystemClock};
pub use profile::{AstrologyProfile, AstrologySnapshot, FullData, LuckyAttributes, ProfileStatus};
pub use store::{Event, ProfileStore, UpsertOutcome, UserDirectory};
pub use db::{
    open_database, setup_database,
    upsert_user, delete_user, count_users, load_users_csv, import_users,
    get_profile, count_profiles, get_events_for_entity,
};
pub use engine::{ProfileEngine, PROFILE_ENTITY};
pub use error::ProfileError;
pub use config::Config;
pub use logging::init_logging;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
