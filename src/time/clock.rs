use chrono::{DateTime, Utc};

/// A port that provides the **current instant** for the application.
///
/// # Purpose
/// Token expiry is computed against this trait so that:
///
/// - Store implementations do **not** read system time directly
/// - Tests can move time forward deterministically to exercise TTL expiry
///
/// # Typical Implementations
/// - `SystemClock`: Uses the OS clock
/// - A manually advanced clock in tests
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Test implementation of `Clock` that always returns a fixed instant.
    struct FixedClock {
        at: DateTime<Utc>,
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn fixed_clock_returns_given_instant() {
        let at = Utc.with_ymd_and_hms(2025, 10, 2, 9, 30, 0).unwrap();
        let clock = FixedClock { at };

        assert_eq!(clock.now(), at);
    }

    #[test]
    fn clock_trait_object_works() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let clock: Box<dyn Clock> = Box::new(FixedClock { at });

        assert_eq!(clock.now(), at);
    }
}
