use std::fmt::Debug;

use log::LevelFilter;
use tracing::Level;

use crate::value::{ParameterKind, TypedValue};

#[derive(Clone, Debug)]
#[non_exhaustive]
/// Logging configuration for bind diagnostics.
pub struct LogSettings {
    /// Log level for individual binds.
    pub binds_level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            binds_level: LevelFilter::Debug,
        }
    }
}

impl LogSettings {
    /// Configure bind logging level.
    pub fn log_binds(&mut self, level: LevelFilter) {
        self.binds_level = level;
    }

    /// Returns `true` if any logging level is enabled.
    pub fn is_enabled(&self) -> bool {
        self.binds_level != LevelFilter::Off
    }
}

/// One bind call as seen by a [`BindObserver`].
#[derive(Debug, Clone, Copy)]
pub struct BindEvent<'a> {
    /// Zero-based slot index.
    pub index: usize,
    pub kind: ParameterKind,
    pub is_null: bool,
    /// The payload, absent when a null was bound without one.
    pub value: Option<&'a TypedValue<'a>>,
}

/// Receives diagnostics from statements that have their debug flag set.
pub trait BindObserver: Debug + Send + Sync {
    /// A statement was prepared.
    fn prepared(&self, _sql: &str) {}
    /// A statement was reset and its bindings cleared.
    fn reset(&self, _sql: &str) {}
    /// A value is about to be bound.
    fn bind(&self, event: &BindEvent<'_>);
}

/// An observer that discards everything.
#[derive(Debug, Default)]
pub struct NopObserver;

impl BindObserver for NopObserver {
    fn bind(&self, _event: &BindEvent<'_>) {}
}

/// The default observer: emits `tracing` events on the `bind` target.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    settings: LogSettings,
}

impl TracingObserver {
    pub fn new(settings: LogSettings) -> Self {
        Self { settings }
    }

    fn levels(&self) -> Option<(Level, log::Level)> {
        let filter = self.settings.binds_level;
        let tracing_level = match filter {
            LevelFilter::Error => Some(Level::ERROR),
            LevelFilter::Warn => Some(Level::WARN),
            LevelFilter::Info => Some(Level::INFO),
            LevelFilter::Debug => Some(Level::DEBUG),
            LevelFilter::Trace => Some(Level::TRACE),
            LevelFilter::Off => None,
        };
        tracing_level.zip(filter.to_level())
    }

    /// Check if either the log or tracing subscriber is enabled at the given level.
    fn enabled(tracing_level: Level, log_level: log::Level) -> bool {
        // The enabled level could be set from either tracing world or log world, so check both
        // to see if logging should be enabled for our level.
        log::log_enabled!(target: "bind", log_level) || tracing_enabled_for(tracing_level)
    }
}

/// Check whether tracing is enabled for the bind target at the provided level.
fn tracing_enabled_for(level: Level) -> bool {
    match level {
        Level::ERROR => tracing::enabled!(target: "bind", Level::ERROR),
        Level::WARN => tracing::enabled!(target: "bind", Level::WARN),
        Level::INFO => tracing::enabled!(target: "bind", Level::INFO),
        Level::DEBUG => tracing::enabled!(target: "bind", Level::DEBUG),
        Level::TRACE => tracing::enabled!(target: "bind", Level::TRACE),
    }
}

// `tracing::event!` needs a constant level, so dispatch by hand.
macro_rules! emit {
    ($level:expr, $($fields:tt)+) => {
        match $level {
            Level::ERROR => tracing::event!(target: "bind", Level::ERROR, $($fields)+),
            Level::WARN => tracing::event!(target: "bind", Level::WARN, $($fields)+),
            Level::INFO => tracing::event!(target: "bind", Level::INFO, $($fields)+),
            Level::DEBUG => tracing::event!(target: "bind", Level::DEBUG, $($fields)+),
            Level::TRACE => tracing::event!(target: "bind", Level::TRACE, $($fields)+),
        }
    };
}

impl BindObserver for TracingObserver {
    fn prepared(&self, sql: &str) {
        let Some((tracing_level, log_level)) = self.levels() else {
            return;
        };
        if Self::enabled(tracing_level, log_level) {
            emit!(tracing_level, summary = "prepared statement", db.statement = sql);
        }
    }

    fn reset(&self, sql: &str) {
        let Some((tracing_level, log_level)) = self.levels() else {
            return;
        };
        if Self::enabled(tracing_level, log_level) {
            emit!(tracing_level, summary = "reset statement", db.statement = sql);
        }
    }

    fn bind(&self, event: &BindEvent<'_>) {
        let Some((tracing_level, log_level)) = self.levels() else {
            return;
        };
        if !Self::enabled(tracing_level, log_level) {
            return;
        }

        let value = match event.value {
            Some(value) if !event.is_null => value.to_string(),
            _ => "NULL".to_string(),
        };
        emit!(
            tracing_level,
            summary = "bind parameter",
            index = event.index,
            kind = event.kind.as_str(),
            is_null = event.is_null,
            value = value.as_str(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_mapping() {
        let mut settings = LogSettings::default();
        assert!(settings.is_enabled());
        assert_eq!(
            TracingObserver::new(settings.clone()).levels(),
            Some((Level::DEBUG, log::Level::Debug))
        );

        settings.log_binds(LevelFilter::Off);
        assert!(!settings.is_enabled());
        assert_eq!(TracingObserver::new(settings).levels(), None);
    }
}
