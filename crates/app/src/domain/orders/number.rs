//! Order numbers
//!
//! `PM-<YYYYMMDDHHMMSSmmm>-<6 base36>`, UTC. Uniqueness is enforced by the
//! database; the random suffix only makes collisions rare.

use jiff::Timestamp;
use rand::Rng;

pub const ORDER_NUMBER_PREFIX: &str = "PM";

const SUFFIX_LEN: usize = 6;
const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate an order number for `now` using the thread-local RNG.
#[must_use]
pub fn generate_order_number(now: Timestamp) -> String {
    order_number_with(now, &mut rand::thread_rng())
}

pub fn order_number_with<R: Rng>(now: Timestamp, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())]))
        .collect();

    format!(
        "{ORDER_NUMBER_PREFIX}-{}{:03}-{suffix}",
        now.strftime("%Y%m%d%H%M%S"),
        now.subsec_millisecond()
    )
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn number_has_timestamp_and_suffix() -> TestResult {
        let now: Timestamp = "2026-03-01T09:05:07.042Z".parse()?;

        let number = order_number_with(now, &mut StdRng::seed_from_u64(7));

        let (stamp, suffix) = number
            .strip_prefix("PM-")
            .and_then(|rest| rest.split_once('-'))
            .ok_or("missing separators")?;

        assert_eq!(stamp, "20260301090507042");
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        );

        Ok(())
    }

    #[test]
    fn numbers_generated_in_the_same_millisecond_differ() -> TestResult {
        let now: Timestamp = "2026-03-01T09:05:07.042Z".parse()?;
        let mut rng = StdRng::seed_from_u64(11);

        let first = order_number_with(now, &mut rng);
        let second = order_number_with(now, &mut rng);

        assert_ne!(first, second);

        Ok(())
    }
}
