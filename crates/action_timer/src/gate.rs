//! Logging gate: decides whether timing output is observed and writes it

use crate::settings::{LogLevel, Settings};
use std::fmt;
use std::sync::Arc;

/// Tracing target every record from [`TracingGate`] is written under.
pub const TARGET: &str = "action_timer";

/// Where timing records go.
///
/// `is_enabled` is asked before any measurement. When it returns false the
/// work runs without being timed and no per-action state changes.
pub trait LogGate: Send + Sync {
    fn is_enabled(&self) -> bool;

    fn emit(&self, action: &str, message: fmt::Arguments<'_>);
}

impl<G: LogGate + ?Sized> LogGate for &G {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn emit(&self, action: &str, message: fmt::Arguments<'_>) {
        (**self).emit(action, message)
    }
}

impl<G: LogGate + ?Sized> LogGate for Arc<G> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn emit(&self, action: &str, message: fmt::Arguments<'_>) {
        (**self).emit(action, message)
    }
}

impl<G: LogGate + ?Sized> LogGate for Box<G> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn emit(&self, action: &str, message: fmt::Arguments<'_>) {
        (**self).emit(action, message)
    }
}

/// Gate backed by the installed `tracing` subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct TracingGate {
    enabled: bool,
    level: LogLevel,
}

impl TracingGate {
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            enabled: settings.enabled,
            level: settings.level,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }
}

impl Default for TracingGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LogGate for TracingGate {
    fn is_enabled(&self) -> bool {
        if !self.enabled {
            return false;
        }
        // Levels have to be constants for the callsite metadata.
        match self.level {
            LogLevel::Trace => tracing::enabled!(target: TARGET, tracing::Level::TRACE),
            LogLevel::Debug => tracing::enabled!(target: TARGET, tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(target: TARGET, tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(target: TARGET, tracing::Level::WARN),
            LogLevel::Error => tracing::enabled!(target: TARGET, tracing::Level::ERROR),
        }
    }

    fn emit(&self, action: &str, message: fmt::Arguments<'_>) {
        match self.level {
            LogLevel::Trace => tracing::trace!(target: TARGET, action, "{}", message),
            LogLevel::Debug => tracing::debug!(target: TARGET, action, "{}", message),
            LogLevel::Info => tracing::info!(target: TARGET, action, "{}", message),
            LogLevel::Warn => tracing::warn!(target: TARGET, action, "{}", message),
            LogLevel::Error => tracing::error!(target: TARGET, action, "{}", message),
        }
    }
}
