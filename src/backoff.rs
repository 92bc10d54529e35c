//! Age-adaptive polling schedule
//!
//! Fresh orders are most likely to change quickly (the user is funding a
//! deposit address), so they are polled aggressively; stale orders are
//! polled sparingly to conserve provider API quota.

use std::time::Duration;

const FIVE_MINUTES: Duration = Duration::from_secs(5 * 60);
const THIRTY_MINUTES: Duration = Duration::from_secs(30 * 60);
const TWO_HOURS: Duration = Duration::from_secs(2 * 60 * 60);

/// Poll interval for an order of the given age.
///
/// Tier bounds are inclusive below, exclusive above. No jitter is applied;
/// the monitor's concurrency cap bounds the outbound request rate.
pub fn poll_interval(age: Duration) -> Duration {
    if age < FIVE_MINUTES {
        Duration::from_secs(15)
    } else if age < THIRTY_MINUTES {
        Duration::from_secs(60)
    } else if age < TWO_HOURS {
        Duration::from_secs(5 * 60)
    } else {
        Duration::from_secs(15 * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_values() {
        assert_eq!(poll_interval(Duration::ZERO), Duration::from_secs(15));
        assert_eq!(
            poll_interval(Duration::from_secs(10 * 60)),
            Duration::from_secs(60)
        );
        assert_eq!(
            poll_interval(Duration::from_secs(60 * 60)),
            Duration::from_secs(5 * 60)
        );
        assert_eq!(
            poll_interval(Duration::from_secs(6 * 60 * 60)),
            Duration::from_secs(15 * 60)
        );
    }

    #[test]
    fn test_tier_boundaries_inclusive_below() {
        // One millisecond under five minutes stays in the fast tier
        assert_eq!(
            poll_interval(Duration::from_millis(5 * 60 * 1000 - 1)),
            Duration::from_secs(15)
        );
        // Exactly five minutes moves to the next tier
        assert_eq!(
            poll_interval(Duration::from_secs(5 * 60)),
            Duration::from_secs(60)
        );
        assert_eq!(
            poll_interval(Duration::from_millis(30 * 60 * 1000 - 1)),
            Duration::from_secs(60)
        );
        assert_eq!(
            poll_interval(Duration::from_secs(30 * 60)),
            Duration::from_secs(5 * 60)
        );
        assert_eq!(
            poll_interval(Duration::from_millis(2 * 60 * 60 * 1000 - 1)),
            Duration::from_secs(5 * 60)
        );
        assert_eq!(
            poll_interval(Duration::from_secs(2 * 60 * 60)),
            Duration::from_secs(15 * 60)
        );
    }
}
