use log::LevelFilter;

#[cfg(feature = "toml")]
use crate::error::{Error, Result};

/// Configuration for the interceptor and the safe setter.
///
/// Passed in when a [`NullSafe`](crate::NullSafe) or [`SafeSetter`](crate::SafeSetter) is built.
/// There is no global switch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "toml",
    derive(serde::Deserialize),
    serde(default, rename_all = "kebab-case", deny_unknown_fields)
)]
pub struct NullSafeOptions {
    pub(crate) logging_enabled: bool,
    pub(crate) null_level: LevelFilter,
    pub(crate) value_level: LevelFilter,
    pub(crate) preview_len: usize,
}

impl Default for NullSafeOptions {
    fn default() -> Self {
        Self {
            logging_enabled: true,
            null_level: LevelFilter::Debug,
            value_level: LevelFilter::Trace,
            preview_len: 60,
        }
    }
}

impl NullSafeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`DiagnosticRecord`](crate::DiagnosticRecord)s are emitted at all.
    ///
    /// Turning this off never turns off the rewriting itself.
    pub fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Log level for parameters bound as `NULL`. Defaults to `Debug`.
    pub fn null_level(mut self, level: LevelFilter) -> Self {
        self.null_level = level;
        self
    }

    /// Log level for parameters bound with a value. Defaults to `Trace`.
    pub fn value_level(mut self, level: LevelFilter) -> Self {
        self.value_level = level;
        self
    }

    /// Longest value preview, in characters, put into a log line. Defaults to 60.
    pub fn preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    pub fn get_null_level(&self) -> LevelFilter {
        self.null_level
    }

    pub fn get_value_level(&self) -> LevelFilter {
        self.value_level
    }

    pub fn get_preview_len(&self) -> usize {
        self.preview_len
    }
}

#[cfg(feature = "toml")]
impl NullSafeOptions {
    /// Parses options from a TOML document.
    ///
    /// ```toml
    /// logging-enabled = true
    /// null-level = "debug"
    /// value-level = "off"
    /// preview-len = 80
    /// ```
    ///
    /// Keys that are left out keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(Error::config)
    }

    /// Reads and parses options from a TOML file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::config)?;

        Self::from_toml_str(&contents)
    }
}
