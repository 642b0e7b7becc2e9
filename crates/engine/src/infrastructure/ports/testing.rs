//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`.
    fn gen_range(&self, min: i32, max: i32) -> i32;
}

/// Roll one die with `sides` faces.
pub fn roll_die(random: &dyn RandomPort, sides: u8) -> u8 {
    let sides = sides.max(1);
    let face = random.gen_range(1, i32::from(sides)).clamp(1, i32::from(sides));
    u8::try_from(face).unwrap_or(sides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockall::predicate::eq;

    #[test]
    fn roll_die_asks_for_the_full_face_range() {
        let mut random = MockRandomPort::new();
        random.expect_gen_range().with(eq(1), eq(12)).times(1).return_const(12);
        assert_eq!(roll_die(&random, 12), 12);
    }

    #[test]
    fn zero_sided_die_rolls_one() {
        let mut random = MockRandomPort::new();
        random.expect_gen_range().with(eq(1), eq(1)).return_const(1);
        assert_eq!(roll_die(&random, 0), 1);
    }

    #[test]
    fn clock_mock_returns_the_configured_time() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut clock = MockClockPort::new();
        clock.expect_now().return_const(at);
        assert_eq!(clock.now(), at);
    }
}
