// ♈ Sun Signs
// Tropical zodiac selected from birth month/day only (no time or location)
//
// Boundaries are start dates, inclusive:
//   Jan 20 is the first day of Aquarius, Dec 22 the first day of Capricorn

use serde::{Deserialize, Serialize};

// ============================================================================
// ELEMENT / MODALITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Water => "Water",
        }
    }

    pub fn from_name(name: &str) -> Option<Element> {
        [Element::Fire, Element::Earth, Element::Air, Element::Water]
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Cardinal => "Cardinal",
            Modality::Fixed => "Fixed",
            Modality::Mutable => "Mutable",
        }
    }

    pub fn from_name(name: &str) -> Option<Modality> {
        [Modality::Cardinal, Modality::Fixed, Modality::Mutable]
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

// ============================================================================
// SIGN
// ============================================================================

/// The 12 sun signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All 12 signs in zodiac order (Aries first)
pub const ALL_SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    pub fn name(&self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }

    pub fn element(&self) -> Element {
        match self {
            Sign::Aries | Sign::Leo | Sign::Sagittarius => Element::Fire,
            Sign::Taurus | Sign::Virgo | Sign::Capricorn => Element::Earth,
            Sign::Gemini | Sign::Libra | Sign::Aquarius => Element::Air,
            Sign::Cancer | Sign::Scorpio | Sign::Pisces => Element::Water,
        }
    }

    pub fn modality(&self) -> Modality {
        match self {
            Sign::Aries | Sign::Cancer | Sign::Libra | Sign::Capricorn => Modality::Cardinal,
            Sign::Taurus | Sign::Leo | Sign::Scorpio | Sign::Aquarius => Modality::Fixed,
            Sign::Gemini | Sign::Virgo | Sign::Sagittarius | Sign::Pisces => Modality::Mutable,
        }
    }

    /// Modern rulership (outer planets for Scorpio, Aquarius, Pisces)
    pub fn ruling_planet(&self) -> &'static str {
        match self {
            Sign::Aries => "Mars",
            Sign::Taurus => "Venus",
            Sign::Gemini => "Mercury",
            Sign::Cancer => "Moon",
            Sign::Leo => "Sun",
            Sign::Virgo => "Mercury",
            Sign::Libra => "Venus",
            Sign::Scorpio => "Pluto",
            Sign::Sagittarius => "Jupiter",
            Sign::Capricorn => "Saturn",
            Sign::Aquarius => "Uranus",
            Sign::Pisces => "Neptune",
        }
    }

    /// Parse a sign from its English name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Sign> {
        let lower = name.trim().to_lowercase();
        ALL_SIGNS
            .iter()
            .copied()
            .find(|sign| sign.name().to_lowercase() == lower)
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Start date (month, day) of each sign in calendar order, from Aquarius
const SIGN_STARTS: [(u32, u32, Sign); 12] = [
    (1, 20, Sign::Aquarius),
    (2, 19, Sign::Pisces),
    (3, 21, Sign::Aries),
    (4, 20, Sign::Taurus),
    (5, 21, Sign::Gemini),
    (6, 21, Sign::Cancer),
    (7, 23, Sign::Leo),
    (8, 23, Sign::Virgo),
    (9, 23, Sign::Libra),
    (10, 23, Sign::Scorpio),
    (11, 22, Sign::Sagittarius),
    (12, 22, Sign::Capricorn),
];

/// Resolve the sun sign for a birth month/day.
///
/// No calendar checking happens here: any (month, day) pair gets a sign.
/// Dates before Jan 20 wrap around to Capricorn.
pub fn resolve_sun_sign(month: u32, day: u32) -> Sign {
    SIGN_STARTS
        .iter()
        .rev()
        .find(|(start_month, start_day, _)| (*start_month, *start_day) <= (month, day))
        .map(|(_, _, sign)| *sign)
        .unwrap_or(Sign::Capricorn)
}

// ============================================================================
// TESTS
// ============================================================================
