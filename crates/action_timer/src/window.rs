//! Rolling sample windows for per-action averages

use std::collections::VecDeque;
use std::time::Instant;

/// Most recent samples for one action, bounded by a caller-chosen capacity.
///
/// Also counts executions so averages can be reported every `capacity` calls.
#[derive(Debug, Default)]
pub struct SampleWindow {
    samples: VecDeque<u64>,
    executions: u64,
}

impl SampleWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evict the oldest entries until there is room, then append.
    /// A capacity of zero behaves like one.
    pub fn push(&mut self, sample: u64, capacity: usize) {
        let capacity = capacity.max(1);
        while self.samples.len() >= capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Push `sample`, count the execution and return the average when the
    /// execution count lands on a multiple of `capacity`.
    pub fn record(&mut self, sample: u64, capacity: usize) -> Option<f64> {
        let capacity = capacity.max(1);
        self.push(sample, capacity);
        self.executions += 1;
        if self.executions % capacity as u64 == 0 {
            self.average()
        } else {
            None
        }
    }

    pub fn average(&self) -> Option<f64> {
        mean(self.samples.iter())
    }

    pub fn executions(&self) -> u64 {
        self.executions
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().copied()
    }
}

/// Samples collected since the last emission. Cleared every time an average
/// is reported.
#[derive(Debug)]
pub struct TimedWindow {
    samples: Vec<u64>,
    last_emission: Instant,
}

impl TimedWindow {
    pub fn new(now: Instant) -> Self {
        Self {
            samples: Vec::new(),
            last_emission: now,
        }
    }

    /// Append `sample`; once `seconds` have passed since the last emission,
    /// return the average and start a fresh window at `now`.
    pub fn record(&mut self, sample: u64, seconds: f64, now: Instant) -> Option<f64> {
        self.samples.push(sample);
        self.flush_if_due(seconds, now)
    }

    fn flush_if_due(&mut self, seconds: f64, now: Instant) -> Option<f64> {
        let since = now.saturating_duration_since(self.last_emission);
        if since.as_secs_f64() < seconds {
            return None;
        }
        // An empty window keeps its timestamp so the next sample still reports.
        let average = mean(self.samples.iter())?;
        self.samples.clear();
        self.last_emission = now;
        Some(average)
    }

    pub fn last_emission(&self) -> Instant {
        self.last_emission
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn mean<'a>(samples: impl ExactSizeIterator<Item = &'a u64>) -> Option<f64> {
    let len = samples.len();
    if len == 0 {
        return None;
    }
    let sum: u128 = samples.map(|&s| s as u128).sum();
    Some(sum as f64 / len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sample_window() {
        let mut window = SampleWindow::new();

        window.push(10, 3);
        assert_eq!(window.average(), Some(10.0));

        window.push(20, 3);
        assert_eq!(window.average(), Some(15.0));

        window.push(30, 3);
        assert_eq!(window.average(), Some(20.0));

        // Oldest falls out
        window.push(40, 3);
        assert_eq!(window.average(), Some(30.0)); // (20 + 30 + 40) / 3
        assert_eq!(window.samples().collect::<Vec<_>>(), vec![20, 30, 40]);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut window = SampleWindow::new();
        for sample in 0..50 {
            window.record(sample, 4);
            assert!(window.len() <= 4);
        }
        assert_eq!(window.samples().collect::<Vec<_>>(), vec![46, 47, 48, 49]);
    }

    #[test]
    fn shrinking_capacity_trims_on_next_push() {
        let mut window = SampleWindow::new();
        for sample in [1, 2, 3, 4, 5] {
            window.push(sample, 5);
        }
        window.push(6, 2);
        assert_eq!(window.samples().collect::<Vec<_>>(), vec![5, 6]);
    }

    #[test]
    fn reports_every_capacity_calls() {
        let mut window = SampleWindow::new();
        assert_eq!(window.record(10, 2), None);
        assert_eq!(window.record(20, 2), Some(15.0));
        assert_eq!(window.record(30, 2), None);
        assert_eq!(window.samples().collect::<Vec<_>>(), vec![20, 30]);
        assert_eq!(window.executions(), 3);
        assert_eq!(window.record(50, 2), Some(40.0));
    }

    #[test]
    fn capacity_of_one_reports_every_call() {
        let mut window = SampleWindow::new();
        assert_eq!(window.record(7, 1), Some(7.0));
        assert_eq!(window.record(9, 1), Some(9.0));
    }

    #[test]
    fn constant_input_converges() {
        let mut window = SampleWindow::new();
        for sample in [100, 3, 900, 12] {
            window.push(sample, 3);
        }
        for _ in 0..3 {
            window.push(42, 3);
        }
        assert_eq!(window.average(), Some(42.0));
    }

    #[test]
    fn empty_window_has_no_average() {
        assert_eq!(SampleWindow::new().average(), None);
    }

    #[test]
    fn timed_window_waits_for_deadline() {
        let start = Instant::now();
        let mut window = TimedWindow::new(start);

        assert_eq!(window.record(10, 1.0, start), None);
        assert_eq!(window.record(20, 1.0, start + Duration::from_millis(500)), None);
        assert_eq!(window.len(), 2);

        let due = start + Duration::from_secs(1);
        assert_eq!(window.record(30, 1.0, due), Some(20.0));
        assert!(window.is_empty());
        assert_eq!(window.last_emission(), due);

        // Next window starts empty and measures from the new timestamp
        assert_eq!(window.record(5, 1.0, due + Duration::from_millis(999)), None);
        assert_eq!(window.record(15, 1.0, due + Duration::from_secs(1)), Some(10.0));
    }

    #[test]
    fn empty_timed_window_skips_emission() {
        let start = Instant::now();
        let mut window = TimedWindow::new(start);
        let later = start + Duration::from_secs(5);

        assert_eq!(window.flush_if_due(1.0, later), None);
        assert_eq!(window.last_emission(), start);
    }
}
