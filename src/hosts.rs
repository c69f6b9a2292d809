//! In-memory hosts table with idempotent upsert and removal.
//!
//! A [`Hosts`] is a snapshot of one hosts file. It is mutated in memory and
//! written back with [`Hosts::save`]. Every public method takes the table
//! lock exactly once, so other threads never observe a half-applied change.

use crate::config::HostsConfig;
use crate::error::{HostsError, Result};
use crate::line::{HostLine, parse_lines};
use crate::util::write_atomic;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A parsed hosts file.
///
/// # Invariants
///
/// - Every address line lists at least one hostname. A line emptied by a
///   removal is dropped.
/// - Blank, comment and unknown lines are never reordered or modified.
/// - After [`upsert`](Self::upsert), the hostname is listed under exactly one
///   address.
///
/// # Example
///
/// ```
/// use vhosts::Hosts;
///
/// let hosts = Hosts::from_content("# local\n127.0.0.1 localhost\n");
/// hosts.upsert("127.0.0.1", "app.local")?;
///
/// assert_eq!(hosts.lookup("APP.local"), Some(("127.0.0.1".to_string(), 1)));
/// assert_eq!(hosts.render(), "# local\n127.0.0.1        localhost app.local\n");
/// # Ok::<(), vhosts::HostsError>(())
/// ```
#[derive(Debug)]
pub struct Hosts {
    config: HostsConfig,
    lines: Mutex<Vec<HostLine>>,
}

impl Hosts {
    /// Reads and parses `config.read_path`.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::SourceUnreadable`] if the file cannot be read.
    /// A missing file is not created.
    pub fn load(config: HostsConfig) -> Result<Self> {
        let content = std::fs::read_to_string(&config.read_path).map_err(|source| {
            HostsError::SourceUnreadable {
                path: config.read_path.clone(),
                source,
            }
        })?;
        let lines = parse_lines(&content);

        tracing::info!(
            path = %config.read_path.display(),
            lines = lines.len(),
            "Loaded hosts file"
        );
        Ok(Self {
            config,
            lines: Mutex::new(lines),
        })
    }

    /// Reads the platform hosts file.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_default() -> Result<Self> {
        Self::load(HostsConfig::new())
    }

    /// Parses `content` directly, with the default config as save target.
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        Self::from_content_with(content, HostsConfig::new())
    }

    /// Parses `content` directly, saving to the given config's write path.
    #[must_use]
    pub fn from_content_with(content: &str, config: HostsConfig) -> Self {
        Self {
            config,
            lines: Mutex::new(parse_lines(content)),
        }
    }

    /// Returns the read/write configuration.
    #[must_use]
    pub const fn config(&self) -> &HostsConfig {
        &self.config
    }

    /// Finds the first line listing `hostname` (case-insensitive).
    ///
    /// Returns the line's address and its position in the table.
    #[must_use]
    pub fn lookup(&self, hostname: &str) -> Option<(String, usize)> {
        let lines = self.table();
        find(&lines, &normalize(hostname))
    }

    /// Makes `hostname` resolve to `address`.
    ///
    /// The hostname is removed from every line with a different address
    /// (dropping lines left empty), then appended to the first line already
    /// using `address`, or to a new line at the end of the file. Returns
    /// `false` if the table already mapped `hostname` to `address` alone.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::InvalidEntry`] if either value is empty after
    /// trimming or contains whitespace or `#`.
    pub fn upsert(&self, address: &str, hostname: &str) -> Result<bool> {
        let address = validated(address, "address")?;
        let hostname = validated(hostname, "hostname")?;

        let mut lines = self.table();
        let stripped = strip(&mut lines, &hostname, |line| line.address != address);
        if stripped > 1 {
            tracing::warn!(
                hostname = %hostname,
                lines = stripped,
                "Hostname was listed on several address lines"
            );
        }

        if lines
            .iter()
            .any(|line| line.address == address && line.contains(&hostname))
        {
            if stripped == 0 {
                tracing::debug!(hostname = %hostname, address = %address, "Host already mapped");
            }
            return Ok(stripped > 0);
        }

        match lines
            .iter_mut()
            .find(|line| line.is_address() && line.address == address)
        {
            Some(line) => line.hostnames.push(hostname),
            None => {
                let mut line = HostLine::new_address(address, hostname);
                line.original_index = lines.len();
                lines.push(line);
            }
        }
        Ok(true)
    }

    /// Removes `hostname` from every line that lists it.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_all(&self, hostname: &str) -> bool {
        let hostname = normalize(hostname);
        let mut lines = self.table();
        strip(&mut lines, &hostname, |_| true) > 0
    }

    /// Removes every occurrence of each of `hostnames`.
    ///
    /// Returns how many of the given hostnames were present.
    pub fn remove_many<I, S>(&self, hostnames: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = self.table();
        hostnames
            .into_iter()
            .filter(|hostname| strip(&mut lines, &normalize(hostname.as_ref()), |_| true) > 0)
            .count()
    }

    /// Renders the table as hosts file text, one line per record.
    #[must_use]
    pub fn render(&self) -> String {
        render(&self.table())
    }

    /// Writes the rendered table to the configured write path.
    ///
    /// # Errors
    ///
    /// See [`save_as`](Self::save_as).
    pub fn save(&self) -> Result<()> {
        self.save_as(self.config.write_path())
    }

    /// Writes the rendered table to `path`, replacing it atomically.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::DestinationUnwritable`] if the temporary file
    /// cannot be written or renamed into place (typically `PermissionDenied`
    /// on the system hosts file). The destination is left unchanged.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let lines = self.table();
        let content = render(&lines);

        write_atomic(path, content.as_bytes()).map_err(|source| {
            HostsError::DestinationUnwritable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::info!(path = %path.display(), lines = lines.len(), "Saved hosts file");
        Ok(())
    }

    /// Returns a copy of the current lines.
    #[must_use]
    pub fn lines(&self) -> Vec<HostLine> {
        self.table().clone()
    }

    /// Number of lines in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table().len()
    }

    /// Returns `true` if the table has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    // Mutations do not panic while holding the guard, so a poisoned table is
    // still consistent.
    fn table(&self) -> MutexGuard<'_, Vec<HostLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Lock-free helpers. Callers hold the table lock.
// ---------------------------------------------------------------------------

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn validated(value: &str, what: &str) -> Result<String> {
    let value = normalize(value);
    if value.is_empty() {
        return Err(HostsError::InvalidEntry(format!("empty {what}")));
    }
    if value.contains(|c: char| c.is_whitespace() || c == '#') {
        return Err(HostsError::InvalidEntry(format!("{what} {value:?}")));
    }
    Ok(value)
}

fn find(lines: &[HostLine], hostname: &str) -> Option<(String, usize)> {
    lines
        .iter()
        .position(|line| line.contains(hostname))
        .map(|i| (lines[i].address.clone(), i))
}

/// Removes `hostname` from every address line matching `filter`, then drops
/// the lines that were emptied. Returns the number of lines touched.
fn strip(lines: &mut Vec<HostLine>, hostname: &str, filter: impl Fn(&HostLine) -> bool) -> usize {
    let mut touched = 0;
    for line in lines.iter_mut() {
        if line.contains(hostname) && filter(line) {
            line.hostnames.retain(|h| h != hostname);
            touched += 1;
            tracing::debug!(hostname = %hostname, address = %line.address, "Removed host");
        }
    }
    if touched > 0 {
        lines.retain(|line| !line.is_address() || !line.hostnames.is_empty());
    }
    touched
}

fn render(lines: &[HostLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}
