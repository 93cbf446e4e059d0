//! Bare timing helpers and measurement units

use std::fmt;
use std::time::{Duration, Instant};

/// Unit an elapsed duration is reported in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Precision {
    Millis,
    Nanos,
}

impl Precision {
    /// Whole units in `elapsed`, truncated. Saturates at `u64::MAX`.
    pub fn count(self, elapsed: Duration) -> u64 {
        let units = match self {
            Precision::Millis => elapsed.as_millis(),
            Precision::Nanos => elapsed.as_nanos(),
        };
        u64::try_from(units).unwrap_or(u64::MAX)
    }

    /// `elapsed` truncated to this precision.
    pub fn truncate(self, elapsed: Duration) -> Duration {
        match self {
            Precision::Millis => Duration::from_millis(self.count(elapsed)),
            Precision::Nanos => elapsed,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Precision::Millis => "ms",
            Precision::Nanos => "ns",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Run `work` once and return how long it took, to the millisecond.
pub fn time<F>(work: F) -> Duration
where
    F: FnOnce(),
{
    measure(Precision::Millis, work)
}

/// Run `work` once and return how long it took, to the nanosecond.
pub fn time_nanos<F>(work: F) -> Duration
where
    F: FnOnce(),
{
    measure(Precision::Nanos, work)
}

fn measure<F>(precision: Precision, work: F) -> Duration
where
    F: FnOnce(),
{
    let start = Instant::now();
    work();
    precision.truncate(start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn counts_truncate() {
        let elapsed = Duration::from_micros(12_750);
        assert_eq!(Precision::Millis.count(elapsed), 12);
        assert_eq!(Precision::Nanos.count(elapsed), 12_750_000);
        assert_eq!(Precision::Millis.truncate(elapsed), Duration::from_millis(12));
        assert_eq!(Precision::Nanos.truncate(elapsed), elapsed);
    }

    #[test]
    fn huge_durations_saturate() {
        assert_eq!(Precision::Nanos.count(Duration::MAX), u64::MAX);
    }

    #[test]
    fn time_runs_work_once() {
        let mut calls = 0;
        let elapsed = time(|| {
            calls += 1;
            thread::sleep(Duration::from_millis(5));
        });
        assert_eq!(calls, 1);
        assert!(elapsed >= Duration::from_millis(5));
        assert_eq!(elapsed.subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn time_nanos_keeps_full_resolution() {
        let elapsed = time_nanos(|| thread::sleep(Duration::from_millis(1)));
        assert!(elapsed >= Duration::from_millis(1));
    }

    #[test]
    fn suffixes() {
        assert_eq!(Precision::Millis.to_string(), "ms");
        assert_eq!(Precision::Nanos.to_string(), "ns");
    }
}
