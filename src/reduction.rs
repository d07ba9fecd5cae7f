// 🔢 Digit Reduction
// Collapses any number to a single digit, optionally stopping at a master number

// ============================================================================
// MASTER NUMBERS
// ============================================================================

/// The three master numbers that survive reduction when asked to
pub const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

/// Check if a value is one of the master numbers (11, 22, 33)
pub fn is_master(n: u32) -> bool {
    MASTER_NUMBERS.contains(&n)
}

// ============================================================================
// REDUCTION
// ============================================================================

/// Sum of the decimal digits of `n`
pub fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Reduce `n` to 1-9, or to a master number when `keep_master` is set.
///
/// `reduce(0, _)` is 0. With `keep_master = false` even 11, 22 and 33 are
/// reduced down to a single digit.
pub fn reduce(mut n: u32, keep_master: bool) -> u32 {
    while n > 9 {
        if keep_master && is_master(n) {
            return n;
        }
        n = digit_sum(n);
    }
    n
}

/// Shorthand for `reduce(n, true)`
pub fn reduce_master(n: u32) -> u32 {
    reduce(n, true)
}

/// True for every value `reduce` may return with `keep_master = true`
/// (excluding the 0 produced by a 0 input)
pub fn is_reduced(n: u32) -> bool {
    (1..=9).contains(&n) || is_master(n)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_digits_unchanged() {
        for n in 0..=9 {
            assert_eq!(reduce(n, true), n);
            assert_eq!(reduce(n, false), n);
        }
    }

    #[test]
    fn test_year_reduction() {
        // 1+9+9+0 = 19 → 1+9 = 10 → 1
        assert_eq!(reduce(1990, true), 1);
        assert_eq!(digit_sum(1990), 19);
    }

    #[test]
    fn test_master_numbers_kept() {
        assert_eq!(reduce(11, true), 11);
        assert_eq!(reduce(22, true), 22);
        assert_eq!(reduce(33, true), 33);
        // 29 → 11, stops at the master number
        assert_eq!(reduce(29, true), 11);
        // 2+9+9+9 = 29 → 11
        assert_eq!(reduce(2999, true), 11);
    }

    #[test]
    fn test_master_numbers_dropped() {
        assert_eq!(reduce(11, false), 2);
        assert_eq!(reduce(22, false), 4);
        assert_eq!(reduce(33, false), 6);
        assert_eq!(reduce(29, false), 2);
    }

    #[test]
    fn test_output_range() {
        for n in 10..5000 {
            let kept = reduce(n, true);
            assert!(is_reduced(kept), "reduce({n}, true) = {kept}");

            let dropped = reduce(n, false);
            assert!((1..=9).contains(&dropped), "reduce({n}, false) = {dropped}");
        }
    }

    #[test]
    fn test_reduce_is_idempotent() {
        for n in 0..5000 {
            let once = reduce_master(n);
            assert_eq!(reduce_master(once), once, "not idempotent for {n}");
            let once = reduce(n, false);
            assert_eq!(reduce(once, false), once, "not idempotent for {n}");
        }
    }
}
