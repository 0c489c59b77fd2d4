//! Configuration for the file logger

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a [`FileLogger`](crate::FileLogger)
///
/// Missing fields take the same defaults as
/// [`FileLogger::new`](crate::FileLogger::new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggerConfig {
    /// Label embedded in every record header
    pub ident: String,
    /// Base path; segments are named `<path_prefix>.<y>-<m>-<d>.<seq>.txt`
    pub path_prefix: PathBuf,
    /// Size threshold in bytes for starting a new segment, `None` for unbounded
    pub max_segment_bytes: Option<u64>,
    /// Echo every record to stderr
    pub console_echo: bool,
    /// Persist records to segment files
    pub file_output: bool,
    /// Queue records until [`FileLogger::flush`](crate::FileLogger::flush)
    pub buffered: bool,
}

impl Default for FileLoggerConfig {
    fn default() -> Self {
        Self {
            ident: String::new(),
            path_prefix: PathBuf::new(),
            max_segment_bytes: None,
            console_echo: false,
            file_output: true,
            buffered: false,
        }
    }
}

impl FileLoggerConfig {
    /// Start building a configuration
    pub fn builder() -> FileLoggerConfigBuilder {
        FileLoggerConfigBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.path_prefix.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "path_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`FileLoggerConfig`]
#[derive(Debug, Default)]
pub struct FileLoggerConfigBuilder {
    config: FileLoggerConfig,
}

impl FileLoggerConfigBuilder {
    /// Set the header label
    pub fn ident(mut self, ident: impl Into<String>) -> Self {
        self.config.ident = ident.into();
        self
    }

    /// Set the base path of segment files
    pub fn path_prefix(mut self, path_prefix: impl Into<PathBuf>) -> Self {
        self.config.path_prefix = path_prefix.into();
        self
    }

    /// Set the segment size threshold
    pub fn max_segment_bytes(mut self, max_segment_bytes: u64) -> Self {
        self.config.max_segment_bytes = Some(max_segment_bytes);
        self
    }

    /// Enable or disable stderr echo
    pub fn console_echo(mut self, enabled: bool) -> Self {
        self.config.console_echo = enabled;
        self
    }

    /// Enable or disable segment files
    pub fn file_output(mut self, enabled: bool) -> Self {
        self.config.file_output = enabled;
        self
    }

    /// Enable or disable buffered mode
    pub fn buffered(mut self, enabled: bool) -> Self {
        self.config.buffered = enabled;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<FileLoggerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
