//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for hosts-file operations.
pub type Result<T> = std::result::Result<T, HostsError>;

/// Errors returned by hosts-file and route operations.
///
/// Lines that cannot be classified are never an error; they are kept
/// verbatim as [`LineKind::Unknown`](crate::LineKind::Unknown).
#[derive(Debug, Error)]
pub enum HostsError {
    /// The hosts file could not be opened or read.
    #[error("cannot read hosts file {}: {source}", .path.display())]
    SourceUnreadable {
        /// The file that was being read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendered hosts file could not be written into place.
    #[error("cannot write hosts file {}: {source}", .path.display())]
    DestinationUnwritable {
        /// The destination path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The route file could not be read or created.
    #[error("cannot read route file {}: {source}", .path.display())]
    RoutesUnreadable {
        /// The route file path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The route file is not a valid route map.
    #[error("invalid route file {}: {source}", .path.display())]
    InvalidRoutes {
        /// The route file path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An address or hostname is empty or contains characters that would
    /// corrupt the line it is written to.
    #[error("invalid hosts entry: {0}")]
    InvalidEntry(String),

    /// The home directory could not be determined.
    #[error("home directory not found")]
    NoHomeDir,
}

impl HostsError {
    /// Returns `true` if the underlying I/O error is `PermissionDenied`.
    ///
    /// Writing the system hosts file normally requires root, so this is the
    /// common failure callers want to report specially.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::SourceUnreadable { source, .. }
            | Self::DestinationUnwritable { source, .. }
            | Self::RoutesUnreadable { source, .. } => {
                source.kind() == std::io::ErrorKind::PermissionDenied
            }
            Self::InvalidRoutes { .. } | Self::InvalidEntry(_) | Self::NoHomeDir => false,
        }
    }
}
