// 🔤 Name Letter Values
// Pythagorean letter values, applied under three different letter subsets:
//
//   Full       → all 26 letters  (Destiny)
//   Vowels     → a e i o u       (Soul Urge)
//   Consonants → everything else (Personality)

use crate::reduction::reduce;
use serde::{Deserialize, Serialize};

/// Pythagorean values for a..z
///
///   1 2 3 4 5 6 7 8 9
///   a b c d e f g h i
///   j k l m n o p q r
///   s t u v w x y z
const PYTHAGOREAN: [u32; 26] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, // a-i
    1, 2, 3, 4, 5, 6, 7, 8, 9, // j-r
    1, 2, 3, 4, 5, 6, 7, 8, // s-z
];

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

// ============================================================================
// LETTER TABLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterTable {
    Full,
    Vowels,
    Consonants,
}

impl LetterTable {
    /// Value of a (lowercase ASCII) letter in this table, None if the table skips it
    pub fn value(&self, c: char) -> Option<u32> {
        if !c.is_ascii_lowercase() {
            return None;
        }

        let is_vowel = VOWELS.contains(&c);
        let included = match self {
            LetterTable::Full => true,
            LetterTable::Vowels => is_vowel,
            LetterTable::Consonants => !is_vowel,
        };

        if included {
            Some(PYTHAGOREAN[(c as u8 - b'a') as usize])
        } else {
            None
        }
    }
}

// ============================================================================
// MAPPING
// ============================================================================

/// Raw (unreduced) sum of the letters of `name` that `table` includes
pub fn letter_sum(name: &str, table: LetterTable) -> u32 {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| table.value(c))
        .sum()
}

/// Sum the letters of `name` under `table` and reduce, keeping master numbers.
///
/// Characters outside the table (spaces, punctuation, other letters) are
/// dropped. Nothing matching gives 0.
pub fn map_and_sum(name: &str, table: LetterTable) -> u32 {
    reduce(letter_sum(name, table), true)
}

/// True if at least one character of `name` is a letter of the full table
pub fn has_mappable_letters(name: &str) -> bool {
    name.chars()
        .flat_map(char::to_lowercase)
        .any(|c| LetterTable::Full.value(c).is_some())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pythagorean_values() {
        assert_eq!(LetterTable::Full.value('a'), Some(1));
        assert_eq!(LetterTable::Full.value('i'), Some(9));
        assert_eq!(LetterTable::Full.value('j'), Some(1));
        assert_eq!(LetterTable::Full.value('n'), Some(5));
        assert_eq!(LetterTable::Full.value('r'), Some(9));
        assert_eq!(LetterTable::Full.value('s'), Some(1));
        assert_eq!(LetterTable::Full.value('z'), Some(8));
        assert_eq!(LetterTable::Full.value('A'), None);
        assert_eq!(LetterTable::Full.value(' '), None);
    }

    #[test]
    fn test_tables_partition_alphabet() {
        for c in 'a'..='z' {
            let vowel = LetterTable::Vowels.value(c);
            let consonant = LetterTable::Consonants.value(c);
            assert!(vowel.is_some() != consonant.is_some(), "{c} in both or neither");
            assert_eq!(vowel.or(consonant), LetterTable::Full.value(c));
        }
    }

    #[test]
    fn test_destiny_anna() {
        // a=1, n=5, n=5, a=1 → 12 → 3
        assert_eq!(letter_sum("ANNA", LetterTable::Full), 12);
        assert_eq!(map_and_sum("ANNA", LetterTable::Full), 3);
        assert_eq!(map_and_sum("anna", LetterTable::Full), 3);
    }

    #[test]
    fn test_vowel_and_consonant_split() {
        // vowels a+a = 2, consonants n+n = 10 → 1
        assert_eq!(map_and_sum("Anna", LetterTable::Vowels), 2);
        assert_eq!(map_and_sum("Anna", LetterTable::Consonants), 1);
    }

    #[test]
    fn test_non_letters_dropped() {
        assert_eq!(
            map_and_sum("Anna-Marie O'Neil", LetterTable::Full),
            map_and_sum("AnnaMarieONeil", LetterTable::Full)
        );
        assert_eq!(map_and_sum("  anna  ", LetterTable::Full), 3);
    }

    #[test]
    fn test_master_number_kept() {
        // b=2, i=9 → 11
        assert_eq!(map_and_sum("bi", LetterTable::Full), 11);
    }

    #[test]
    fn test_nothing_matching_sums_to_zero() {
        assert_eq!(map_and_sum("", LetterTable::Full), 0);
        assert_eq!(map_and_sum("!?", LetterTable::Full), 0);
        assert_eq!(map_and_sum("Lynn", LetterTable::Vowels), 0);
        assert!(!has_mappable_letters("123 !?"));
        assert!(has_mappable_letters("Lynn"));
    }
}
