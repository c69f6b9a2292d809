//! Hosts file location configuration.

use std::path::{Path, PathBuf};

/// Platform default hosts file.
#[cfg(windows)]
pub const DEFAULT_HOSTS_PATH: &str = r"C:\Windows\System32\drivers\etc\hosts";

/// Platform default hosts file.
#[cfg(not(windows))]
pub const DEFAULT_HOSTS_PATH: &str = "/etc/hosts";

/// Where a [`Hosts`](crate::Hosts) table is read from and saved to.
///
/// # Example
///
/// ```
/// use vhosts::HostsConfig;
///
/// let config = HostsConfig::new()
///     .with_read_path("/tmp/hosts.in")
///     .with_write_path("/tmp/hosts.out");
///
/// assert_eq!(config.read_path.to_str(), Some("/tmp/hosts.in"));
/// assert_eq!(config.write_path().to_str(), Some("/tmp/hosts.out"));
/// ```
#[derive(Debug, Clone)]
pub struct HostsConfig {
    /// File parsed by [`Hosts::load`](crate::Hosts::load).
    pub read_path: PathBuf,

    /// File written by [`Hosts::save`](crate::Hosts::save).
    /// `None` means the read path is written back.
    pub write_path: Option<PathBuf>,
}

impl HostsConfig {
    /// Creates a config targeting the platform hosts file for both read and write.
    #[must_use]
    pub fn new() -> Self {
        Self {
            read_path: PathBuf::from(DEFAULT_HOSTS_PATH),
            write_path: None,
        }
    }

    /// Overrides the file to read.
    #[must_use]
    pub fn with_read_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_path = path.into();
        self
    }

    /// Overrides the file to write.
    #[must_use]
    pub fn with_write_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.write_path = Some(path.into());
        self
    }

    /// Returns the effective save destination.
    #[must_use]
    pub fn write_path(&self) -> &Path {
        self.write_path.as_deref().unwrap_or(&self.read_path)
    }
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self::new()
    }
}
