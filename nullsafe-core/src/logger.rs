use crate::diagnostic::{DiagnosticRecord, DiagnosticSink};
use crate::options::NullSafeOptions;

/// The `tracing`/`log` target every bind diagnostic is emitted under.
pub const BIND_TARGET: &str = "nullsafe::bind";

// Yes these look silly. `tracing` doesn't currently support dynamic levels
// https://github.com/tokio-rs/tracing/issues/372
#[doc(hidden)]
#[macro_export]
macro_rules! private_tracing_dynamic_enabled {
    (target: $target:expr, $level:expr) => {{
        use ::tracing::Level;

        match $level {
            Level::ERROR => ::tracing::enabled!(target: $target, Level::ERROR),
            Level::WARN => ::tracing::enabled!(target: $target, Level::WARN),
            Level::INFO => ::tracing::enabled!(target: $target, Level::INFO),
            Level::DEBUG => ::tracing::enabled!(target: $target, Level::DEBUG),
            Level::TRACE => ::tracing::enabled!(target: $target, Level::TRACE),
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! private_tracing_dynamic_event {
    (target: $target:expr, $level:expr, $($args:tt)*) => {{
        use ::tracing::Level;

        match $level {
            Level::ERROR => ::tracing::event!(target: $target, Level::ERROR, $($args)*),
            Level::WARN => ::tracing::event!(target: $target, Level::WARN, $($args)*),
            Level::INFO => ::tracing::event!(target: $target, Level::INFO, $($args)*),
            Level::DEBUG => ::tracing::event!(target: $target, Level::DEBUG, $($args)*),
            Level::TRACE => ::tracing::event!(target: $target, Level::TRACE, $($args)*),
        }
    }};
}

#[doc(hidden)]
pub fn private_level_filter_to_levels(
    filter: log::LevelFilter,
) -> Option<(tracing::Level, log::Level)> {
    let tracing_level = match filter {
        log::LevelFilter::Error => Some(tracing::Level::ERROR),
        log::LevelFilter::Warn => Some(tracing::Level::WARN),
        log::LevelFilter::Info => Some(tracing::Level::INFO),
        log::LevelFilter::Debug => Some(tracing::Level::DEBUG),
        log::LevelFilter::Trace => Some(tracing::Level::TRACE),
        log::LevelFilter::Off => None,
    };

    tracing_level.zip(filter.to_level())
}

/// Logs every [`DiagnosticRecord`] through `tracing` under the `nullsafe::bind` target.
///
/// Nulls are logged at the configured null level and values at the value level. Either may be
/// turned off with [`LevelFilter::Off`](log::LevelFilter::Off).
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    null_level: log::LevelFilter,
    value_level: log::LevelFilter,
}

impl TracingSink {
    pub fn new(null_level: log::LevelFilter, value_level: log::LevelFilter) -> Self {
        Self {
            null_level,
            value_level,
        }
    }

    pub fn from_options(options: &NullSafeOptions) -> Self {
        Self::new(options.null_level, options.value_level)
    }

    fn enabled(level: log::LevelFilter) -> Option<tracing::Level> {
        let (tracing_level, log_level) = private_level_filter_to_levels(level)?;

        // The enabled level could be set from either tracing world or log world, so check both
        // to see if logging should be enabled for our level
        let enabled = log::log_enabled!(target: BIND_TARGET, log_level)
            || private_tracing_dynamic_enabled!(target: BIND_TARGET, tracing_level);

        enabled.then_some(tracing_level)
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::from_options(&NullSafeOptions::default())
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&self, record: &DiagnosticRecord) {
        let level = if record.is_null {
            self.null_level
        } else {
            self.value_level
        };

        let Some(tracing_level) = Self::enabled(level) else {
            return;
        };

        if record.is_null {
            private_tracing_dynamic_event!(
                target: BIND_TARGET,
                tracing_level,
                param = %record.target,
                sql_type = %record.sql_type,
                source = ?record.source,
                "{} is NULL (SQL type resolved to: {})",
                record.target,
                record.sql_type
            );
        } else {
            let preview = record.preview.as_deref().unwrap_or_default();

            private_tracing_dynamic_event!(
                target: BIND_TARGET,
                tracing_level,
                param = %record.target,
                sql_type = %record.sql_type,
                "{} = {} (SQL type: {})",
                record.target,
                preview,
                record.sql_type
            );
        }
    }

    fn wants_values(&self) -> bool {
        Self::enabled(self.value_level).is_some()
    }
}
