//! Named action timing with rolling averages

use crate::clock::Precision;
use crate::error::{check_samples, check_window, TimerError};
use crate::gate::{LogGate, TracingGate};
use crate::settings::Settings;
use crate::window::{SampleWindow, TimedWindow};
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::convert::Infallible;
use std::time::Instant;

static GLOBAL: Lazy<ActionTimer> = Lazy::new(ActionTimer::new);

/// Registry of per-action timing state.
///
/// Every entry point checks the gate first. A closed gate runs the work
/// directly, so instrumented hot paths cost nothing while nobody listens.
/// Work that fails (returns `Err` or panics) is never sampled or logged.
///
/// Updates to one action name are serialized; different names only contend
/// when they hash to the same shard. No lock is held while the work runs or
/// while the gate emits, so a gate may query or time through the same timer.
pub struct ActionTimer<G = TracingGate> {
    gate: G,
    counted: DashMap<String, SampleWindow>,
    timed: DashMap<String, TimedWindow>,
}

impl ActionTimer<TracingGate> {
    pub fn new() -> Self {
        Self::with_gate(TracingGate::new())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_gate(TracingGate::from_settings(settings))
    }

    /// Shared instance for call sites that have no timer to hand.
    pub fn global() -> &'static ActionTimer {
        &GLOBAL
    }
}

impl Default for ActionTimer<TracingGate> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: LogGate> ActionTimer<G> {
    pub fn with_gate(gate: G) -> Self {
        Self {
            gate,
            counted: DashMap::new(),
            timed: DashMap::new(),
        }
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    // ------------------------------------------------------------------
    // Single measurements
    // ------------------------------------------------------------------

    /// Time `work` and log `"<action> complete.  Execution time: <N>ms."`.
    pub fn time<R, F>(&self, action: &str, work: F) -> R
    where
        F: FnOnce() -> R,
    {
        infallible(self.try_time(action, Precision::Millis, || Ok(work())))
    }

    pub fn time_nanos<R, F>(&self, action: &str, work: F) -> R
    where
        F: FnOnce() -> R,
    {
        infallible(self.try_time(action, Precision::Nanos, || Ok(work())))
    }

    /// Fallible form of [`time`](Self::time). An `Err` from `work` is returned
    /// as is and nothing is logged.
    pub fn try_time<R, E, F>(&self, action: &str, precision: Precision, work: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
    {
        if !self.gate.is_enabled() {
            return work();
        }
        let (value, elapsed) = measure(precision, work)?;
        self.gate.emit(
            action,
            format_args!("{action} complete.  Execution time: {elapsed}{precision}."),
        );
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Average over the last `samples` executions
    // ------------------------------------------------------------------

    /// Time `work` into a window of the last `samples` executions and log the
    /// average every `samples` calls.
    pub fn average<R, F>(&self, action: &str, samples: usize, work: F) -> Result<R, TimerError>
    where
        F: FnOnce() -> R,
    {
        self.try_average(action, samples, Precision::Millis, || Ok(work()))
    }

    pub fn average_nanos<R, F>(&self, action: &str, samples: usize, work: F) -> Result<R, TimerError>
    where
        F: FnOnce() -> R,
    {
        self.try_average(action, samples, Precision::Nanos, || Ok(work()))
    }

    pub fn try_average<R, E, F>(
        &self,
        action: &str,
        samples: usize,
        precision: Precision,
        work: F,
    ) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<TimerError>,
    {
        let samples = check_samples(samples)?;
        if !self.gate.is_enabled() {
            return work();
        }
        let (value, elapsed) = measure(precision, work)?;

        // The entry guard is a temporary, released before the gate runs.
        let average = self.counted_window(action).record(elapsed, samples);
        if let Some(average) = average {
            self.gate.emit(
                action,
                format_args!("{action} average time: {average:.2}{precision}."),
            );
        }
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Average over a span of wall-clock time
    // ------------------------------------------------------------------

    /// Collect timings of `work` and log their average once every `seconds`.
    /// The window starts over after each report.
    pub fn average_over<R, F>(&self, action: &str, seconds: f64, work: F) -> Result<R, TimerError>
    where
        F: FnOnce() -> R,
    {
        self.try_average_over(action, seconds, Precision::Millis, || Ok(work()))
    }

    pub fn average_over_nanos<R, F>(
        &self,
        action: &str,
        seconds: f64,
        work: F,
    ) -> Result<R, TimerError>
    where
        F: FnOnce() -> R,
    {
        self.try_average_over(action, seconds, Precision::Nanos, || Ok(work()))
    }

    pub fn try_average_over<R, E, F>(
        &self,
        action: &str,
        seconds: f64,
        precision: Precision,
        work: F,
    ) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<TimerError>,
    {
        let seconds = check_window(seconds)?;
        if !self.gate.is_enabled() {
            return work();
        }
        let (value, elapsed) = measure(precision, work)?;

        let now = Instant::now();
        let average = self.timed_window(action, now).record(elapsed, seconds, now);
        if let Some(average) = average {
            self.gate.emit(
                action,
                format_args!("{action} average time: {average:.2}{precision}."),
            );
        }
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Current measurement plus running average, every call
    // ------------------------------------------------------------------

    /// Time `work` and log both this execution and the average of the last
    /// `samples` executions, on every call.
    pub fn time_with_average<R, F>(
        &self,
        action: &str,
        samples: usize,
        work: F,
    ) -> Result<R, TimerError>
    where
        F: FnOnce() -> R,
    {
        self.try_time_with_average(action, samples, Precision::Millis, || Ok(work()))
    }

    pub fn time_with_average_nanos<R, F>(
        &self,
        action: &str,
        samples: usize,
        work: F,
    ) -> Result<R, TimerError>
    where
        F: FnOnce() -> R,
    {
        self.try_time_with_average(action, samples, Precision::Nanos, || Ok(work()))
    }

    pub fn try_time_with_average<R, E, F>(
        &self,
        action: &str,
        samples: usize,
        precision: Precision,
        work: F,
    ) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        E: From<TimerError>,
    {
        let samples = check_samples(samples)?;
        if !self.gate.is_enabled() {
            return work();
        }
        let (value, elapsed) = measure(precision, work)?;

        // Shares the window with `average` but leaves its execution count alone.
        let average = {
            let mut window = self.counted_window(action);
            window.push(elapsed, samples);
            window.average()
        };
        if let Some(average) = average {
            self.gate.emit(
                action,
                format_args!(
                    "{action} complete.  Execution time: {elapsed}{precision}.  \
                     Average time: {average:.2}{precision}."
                ),
            );
        }
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Samples currently held in the count-bounded window for `action`.
    pub fn window_len(&self, action: &str) -> usize {
        self.counted.get(action).map_or(0, |window| window.len())
    }

    /// How many sampled executions `average` has seen for `action`.
    pub fn execution_count(&self, action: &str) -> u64 {
        self.counted.get(action).map_or(0, |window| window.executions())
    }

    pub fn rolling_average(&self, action: &str) -> Option<f64> {
        self.counted.get(action).and_then(|window| window.average())
    }

    /// Samples waiting for the next time-windowed report for `action`.
    pub fn pending_samples(&self, action: &str) -> usize {
        self.timed.get(action).map_or(0, |window| window.len())
    }

    /// When the time-windowed average for `action` was last reported, or
    /// first seen if it has not reported yet.
    pub fn last_emission(&self, action: &str) -> Option<Instant> {
        self.timed.get(action).map(|window| window.last_emission())
    }

    /// Forget every action.
    pub fn reset(&self) {
        self.counted.clear();
        self.timed.clear();
    }

    fn counted_window(&self, action: &str) -> RefMut<'_, String, SampleWindow> {
        match self.counted.get_mut(action) {
            Some(window) => window,
            None => self.counted.entry(action.to_owned()).or_default(),
        }
    }

    fn timed_window(&self, action: &str, now: Instant) -> RefMut<'_, String, TimedWindow> {
        match self.timed.get_mut(action) {
            Some(window) => window,
            None => self
                .timed
                .entry(action.to_owned())
                .or_insert_with(|| TimedWindow::new(now)),
        }
    }
}

fn measure<R, E, F>(precision: Precision, work: F) -> Result<(R, u64), E>
where
    F: FnOnce() -> Result<R, E>,
{
    let start = Instant::now();
    let value = work()?;
    Ok((value, precision.count(start.elapsed())))
}

fn infallible<R>(result: Result<R, Infallible>) -> R {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
