//! Configuration errors for the sampling entry points

use thiserror::Error;

/// Invalid configuration passed to a sampling entry point.
///
/// Returned before the work runs and before any per-action state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimerError {
    #[error("sample window capacity must be positive, got {samples}")]
    InvalidSamples { samples: usize },

    #[error("averaging window must be a positive number of seconds, got {seconds}")]
    InvalidWindow { seconds: f64 },
}

pub(crate) fn check_samples(samples: usize) -> Result<usize, TimerError> {
    if samples == 0 {
        return Err(TimerError::InvalidSamples { samples });
    }
    Ok(samples)
}

pub(crate) fn check_window(seconds: f64) -> Result<f64, TimerError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(TimerError::InvalidWindow { seconds });
    }
    Ok(seconds)
}
