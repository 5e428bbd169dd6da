use chrono::{DateTime, Utc};

use crate::time::clock::Clock;

/// A [`Clock`] implementation backed by the system clock.
///
/// Selecting the clock is the responsibility of the composition root
/// (e.g. `main.rs`); stores only see `dyn Clock`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
