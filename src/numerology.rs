// 🔮 Numerology Derivation
// Life Path, Birthday, Personal Year from the date; Destiny, Soul Urge and
// Personality from the name.
//
// Date numbers reduce each component first, then the sum (Pythagorean method).
// Reducing the raw sum in one pass can give a different answer.

use crate::birth::BirthRecord;
use crate::letters::{has_mappable_letters, map_and_sum, LetterTable};
use crate::reduction::{reduce, reduce_master};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumerologyProfile {
    pub life_path: u32,
    pub birthday: u32,
    pub personal_year: u32,
    pub destiny: Option<u32>,
    pub soul_urge: Option<u32>,
    pub personality: Option<u32>,
}

/// Name-derived numbers, computed together or not at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameNumbers {
    pub destiny: u32,
    pub soul_urge: u32,
    pub personality: u32,
}

// ============================================================================
// DATE NUMBERS
// ============================================================================

/// reduce(reduce(year) + reduce(month) + reduce(day)), masters kept throughout
pub fn life_path(year: u32, month: u32, day: u32) -> u32 {
    reduce_master(reduce_master(year) + reduce_master(month) + reduce_master(day))
}

/// Day of birth reduced to a single digit, masters NOT kept
pub fn birthday_number(day: u32) -> u32 {
    reduce(day, false)
}

/// Same shape as Life Path with the birth year swapped for `as_of_year`
pub fn personal_year(as_of_year: u32, month: u32, day: u32) -> u32 {
    life_path(as_of_year, month, day)
}

// ============================================================================
// NAME NUMBERS
// ============================================================================

/// None when the name has no letters at all
pub fn name_numbers(name: &str) -> Option<NameNumbers> {
    if !has_mappable_letters(name) {
        return None;
    }

    Some(NameNumbers {
        destiny: map_and_sum(name, LetterTable::Full),
        soul_urge: map_and_sum(name, LetterTable::Vowels),
        personality: map_and_sum(name, LetterTable::Consonants),
    })
}

// ============================================================================
// FULL SET
// ============================================================================

/// Derive every number for `birth`, with Personal Year taken in `as_of_year`
pub fn derive_all(birth: &BirthRecord, as_of_year: u32) -> NumerologyProfile {
    let names = birth.name.as_deref().and_then(name_numbers);

    NumerologyProfile {
        life_path: life_path(birth.year, birth.month, birth.day),
        birthday: birthday_number(birth.day),
        personal_year: personal_year(as_of_year, birth.month, birth.day),
        destiny: names.map(|n| n.destiny),
        soul_urge: names.map(|n| n.soul_urge),
        personality: names.map(|n| n.personality),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction::is_reduced;

    #[test]
    fn test_life_path_1990_07_16() {
        // 1990 → 1, 7 → 7, 16 → 7; 1+7+7 = 15 → 6
        assert_eq!(life_path(1990, 7, 16), 6);
    }

    #[test]
    fn test_life_path_reduces_components_first() {
        // 1990 → 1, 1 → 1, 9 → 9; 1+1+9 = 11 (master, kept)
        assert_eq!(life_path(1990, 1, 9), 11);
        // Raw sum in one pass: 1990+1+9 = 2000 → 2
        assert_eq!(reduce_master(1990 + 1 + 9), 2);

        // 1978 → 7, 11 kept, 29 → 11; 7+11+11 = 29 → 11
        assert_eq!(life_path(1978, 11, 29), 11);
        assert_eq!(life_path(1999, 11, 29), 5);
    }

    #[test]
    fn test_birthday_does_not_keep_master() {
        assert_eq!(birthday_number(29), 2);
        assert_eq!(birthday_number(11), 2);
        assert_eq!(birthday_number(22), 4);
        assert_eq!(birthday_number(7), 7);
    }

    #[test]
    fn test_personal_year_depends_on_year() {
        // 2026 → 10 → 1; 1+7+7 = 15 → 6
        assert_eq!(personal_year(2026, 7, 16), 6);
        // 2027 → 11 (kept); 11+7+7 = 25 → 7
        assert_eq!(personal_year(2027, 7, 16), 7);
    }

    #[test]
    fn test_derive_with_name() {
        let birth = BirthRecord::new(1990, 7, 16, Some("ANNA"));
        let profile = derive_all(&birth, 2026);

        assert_eq!(profile.life_path, 6);
        assert_eq!(profile.birthday, 7);
        assert_eq!(profile.personal_year, 6);
        assert_eq!(profile.destiny, Some(3));
        assert_eq!(profile.soul_urge, Some(2));
        assert_eq!(profile.personality, Some(1));
    }

    #[test]
    fn test_derive_without_name() {
        let birth = BirthRecord::new(1990, 7, 16, None);
        let profile = derive_all(&birth, 2026);
        assert_eq!(profile.destiny, None);
        assert_eq!(profile.soul_urge, None);
        assert_eq!(profile.personality, None);

        // Symbols only: treated the same as no name
        let birth = BirthRecord::new(1990, 7, 16, Some("** !! **"));
        let profile = derive_all(&birth, 2026);
        assert_eq!(profile.destiny, None);
        assert_eq!(profile.soul_urge, None);
        assert_eq!(profile.personality, None);
    }

    #[test]
    fn test_vowelless_name_gives_zero_soul_urge() {
        let birth = BirthRecord::new(1990, 7, 16, Some("Lynn"));
        let profile = derive_all(&birth, 2026);
        assert_eq!(profile.soul_urge, Some(0));
        assert!(profile.destiny.is_some());
        assert_eq!(profile.destiny, profile.personality);
    }

    #[test]
    fn test_date_numbers_always_reduced() {
        for year in [1900, 1955, 1987, 1999, 2004, 2024] {
            for month in 1..=12 {
                for day in 1..=31 {
                    let birth = BirthRecord::new(year, month, day, None);
                    let profile = derive_all(&birth, 2026);
                    assert!(is_reduced(profile.life_path));
                    assert!(is_reduced(profile.personal_year));
                    assert!((1..=9).contains(&profile.birthday));
                }
            }
        }
    }
}
