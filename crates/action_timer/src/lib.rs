//! Action Timer - call-site timing with rolling averages
//!
//! Wraps a closure, measures how long it ran and logs the result, optionally
//! together with a rolling average kept per action name. Nothing is measured
//! unless the logging gate is open, so instrumentation can stay in hot paths.
//!
//! # Feature Flags
//!
//! - `profiling` - Measure, sample and log (default: enabled)
//!
//! # Usage
//!
//! ```ignore
//! use action_timer::ActionTimer;
//!
//! let timer = ActionTimer::new();
//! let rows = timer.average("load_rows", 20, || load_rows())?;
//! // every 20th call: "load_rows average time: 3.45ms."
//! ```
//!
//! Without the `profiling` feature `ActionTimer` is a zero-sized stand-in
//! whose entry points only run the work.

mod clock;
#[cfg_attr(not(feature = "profiling"), allow(dead_code))]
mod error;
mod gate;
mod settings;
#[cfg(feature = "profiling")]
mod timer;
#[cfg(feature = "profiling")]
mod window;

pub use clock::{time, time_nanos, Precision};
pub use error::TimerError;
pub use gate::{LogGate, TracingGate, TARGET};
pub use settings::{LogLevel, Settings};
#[cfg(feature = "profiling")]
pub use timer::ActionTimer;
#[cfg(feature = "profiling")]
pub use window::{SampleWindow, TimedWindow};

// ============================================================================
// Macros
// ============================================================================

/// Time a block as a named action.
///
/// ```ignore
/// let mesh = time_action!(timer, "build_mesh", { build_mesh(&chunk) });
/// ```
#[macro_export]
macro_rules! time_action {
    ($timer:expr, $action:expr, $body:block) => {
        $timer.time($action, || $body)
    };
}

// ============================================================================
// No-op stand-in when profiling is compiled out
// ============================================================================

#[cfg(not(feature = "profiling"))]
static GLOBAL: once_cell::sync::Lazy<ActionTimer> = once_cell::sync::Lazy::new(ActionTimer::new);

#[cfg(not(feature = "profiling"))]
pub struct ActionTimer<G = TracingGate> {
    gate: G,
}

#[cfg(not(feature = "profiling"))]
impl ActionTimer<TracingGate> {
    pub fn new() -> Self { Self::with_gate(TracingGate::new()) }
    pub fn from_settings(settings: &Settings) -> Self { Self::with_gate(TracingGate::from_settings(settings)) }
    pub fn global() -> &'static ActionTimer { &GLOBAL }
}

#[cfg(not(feature = "profiling"))]
impl Default for ActionTimer<TracingGate> {
    fn default() -> Self { Self::new() }
}

#[cfg(not(feature = "profiling"))]
impl<G: LogGate> ActionTimer<G> {
    pub fn with_gate(gate: G) -> Self { Self { gate } }
    pub fn gate(&self) -> &G { &self.gate }

    pub fn time<R, F: FnOnce() -> R>(&self, _action: &str, work: F) -> R { work() }
    pub fn time_nanos<R, F: FnOnce() -> R>(&self, _action: &str, work: F) -> R { work() }
    pub fn try_time<R, E, F>(&self, _action: &str, _precision: Precision, work: F) -> Result<R, E>
    where F: FnOnce() -> Result<R, E> { work() }

    pub fn average<R, F: FnOnce() -> R>(&self, _action: &str, _samples: usize, work: F) -> Result<R, TimerError> { Ok(work()) }
    pub fn average_nanos<R, F: FnOnce() -> R>(&self, _action: &str, _samples: usize, work: F) -> Result<R, TimerError> { Ok(work()) }
    pub fn try_average<R, E, F>(&self, _action: &str, _samples: usize, _precision: Precision, work: F) -> Result<R, E>
    where F: FnOnce() -> Result<R, E>, E: From<TimerError> { work() }

    pub fn average_over<R, F: FnOnce() -> R>(&self, _action: &str, _seconds: f64, work: F) -> Result<R, TimerError> { Ok(work()) }
    pub fn average_over_nanos<R, F: FnOnce() -> R>(&self, _action: &str, _seconds: f64, work: F) -> Result<R, TimerError> { Ok(work()) }
    pub fn try_average_over<R, E, F>(&self, _action: &str, _seconds: f64, _precision: Precision, work: F) -> Result<R, E>
    where F: FnOnce() -> Result<R, E>, E: From<TimerError> { work() }

    pub fn time_with_average<R, F: FnOnce() -> R>(&self, _action: &str, _samples: usize, work: F) -> Result<R, TimerError> { Ok(work()) }
    pub fn time_with_average_nanos<R, F: FnOnce() -> R>(&self, _action: &str, _samples: usize, work: F) -> Result<R, TimerError> { Ok(work()) }
    pub fn try_time_with_average<R, E, F>(&self, _action: &str, _samples: usize, _precision: Precision, work: F) -> Result<R, E>
    where F: FnOnce() -> Result<R, E>, E: From<TimerError> { work() }

    pub fn window_len(&self, _action: &str) -> usize { 0 }
    pub fn execution_count(&self, _action: &str) -> u64 { 0 }
    pub fn rolling_average(&self, _action: &str) -> Option<f64> { None }
    pub fn pending_samples(&self, _action: &str) -> usize { 0 }
    pub fn last_emission(&self, _action: &str) -> Option<std::time::Instant> { None }
    pub fn reset(&self) {}
}
