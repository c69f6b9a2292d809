//! Route table loading and reconciliation into a [`Hosts`] table.
//!
//! A route file maps service names to the vhost they are reached under:
//!
//! ```json
//! {
//!   "api": { "vhost": "api.local", "ip": "127.0.0.1", "port": 8080 },
//!   "web": { "vhost": "web.local", "ip": "127.0.0.2", "port": "3000" }
//! }
//! ```
//!
//! Only `vhost` and `ip` matter to the hosts file. `port` is carried for the
//! proxy that serves the vhost.

use crate::error::{HostsError, Result};
use crate::hosts::Hosts;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Route file location relative to the home directory.
const ROUTES_FILE: &str = ".vhosts/routes.json";

/// Location used by earlier `keshif` releases, still read when present.
const LEGACY_ROUTES_FILE: &str = ".keshif/routes.json";

/// One service route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Hostname the service is reached under.
    pub vhost: String,
    /// Address the vhost resolves to.
    pub ip: String,
    /// Backend port. Accepts a JSON number or a numeric string.
    #[serde(deserialize_with = "port_from_number_or_string")]
    pub port: u16,
}

impl Route {
    /// Creates a route.
    #[must_use]
    pub fn new(vhost: impl Into<String>, ip: impl Into<String>, port: u16) -> Self {
        Self {
            vhost: vhost.into(),
            ip: ip.into(),
            port,
        }
    }
}

/// Routes keyed by service name, iterated in name order.
pub type RouteTable = BTreeMap<String, Route>;

fn port_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Returns `~/.vhosts/routes.json`, or `~/.keshif/routes.json` if only the
/// older file exists.
///
/// # Errors
///
/// Returns [`HostsError::NoHomeDir`] if the home directory is unknown.
pub fn default_routes_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| routes_path_in(&home))
        .ok_or(HostsError::NoHomeDir)
}

fn routes_path_in(home: &Path) -> PathBuf {
    let current = home.join(ROUTES_FILE);
    let legacy = home.join(LEGACY_ROUTES_FILE);
    if !current.exists() && legacy.is_file() {
        tracing::debug!(path = %legacy.display(), "Using legacy route file");
        return legacy;
    }
    current
}

/// Reads and parses a route file.
///
/// # Errors
///
/// Returns [`HostsError::RoutesUnreadable`] if the file cannot be read, or
/// [`HostsError::InvalidRoutes`] if it is not a route map.
pub fn load_routes(path: &Path) -> Result<RouteTable> {
    let content = std::fs::read_to_string(path).map_err(|source| HostsError::RoutesUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| HostsError::InvalidRoutes {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a route file, first creating it as an empty map if it is missing.
///
/// # Errors
///
/// Returns [`HostsError::RoutesUnreadable`] if the file or its directory
/// cannot be created, otherwise as [`load_routes`].
pub fn load_or_init_routes(path: &Path) -> Result<RouteTable> {
    if !path.exists() {
        let unreadable = |source: std::io::Error| HostsError::RoutesUnreadable {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(unreadable)?;
        }
        std::fs::write(path, "{}\n").map_err(unreadable)?;
        tracing::info!(path = %path.display(), "Created empty route file");
    }
    load_routes(path)
}

/// Maps every route's vhost to its ip. Returns how many routes changed the table.
///
/// # Errors
///
/// Returns [`HostsError::InvalidEntry`] on the first route with an unusable
/// vhost or ip. Routes before it stay applied.
pub fn apply_routes(hosts: &Hosts, routes: &RouteTable) -> Result<usize> {
    let mut changed = 0;
    for (name, route) in routes {
        if hosts.upsert(&route.ip, &route.vhost)? {
            changed += 1;
        }
        tracing::info!(
            name = %name,
            vhost = %route.vhost,
            ip = %route.ip,
            port = route.port,
            "Applied route"
        );
    }
    Ok(changed)
}

/// Removes every route's vhost. Returns how many were present.
pub fn clear_routes(hosts: &Hosts, routes: &RouteTable) -> usize {
    let removed = hosts.remove_many(routes.values().map(|route| route.vhost.as_str()));
    tracing::info!(routes = routes.len(), removed, "Cleared vhosts");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "api": { "vhost": "api.local", "ip": "127.0.0.1", "port": 8080 },
        "web": { "vhost": "Web.Local", "ip": "127.0.0.2", "port": "3000" }
    }"#;

    #[test]
    fn parses_numeric_and_string_ports() {
        let routes: RouteTable = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(routes["api"], Route::new("api.local", "127.0.0.1", 8080));
        assert_eq!(routes["web"].port, 3000);
    }

    #[test]
    fn rejects_bad_port() {
        let bad = r#"{ "x": { "vhost": "x.local", "ip": "127.0.0.1", "port": "http" } }"#;
        assert!(serde_json::from_str::<RouteTable>(bad).is_err());
    }

    #[test]
    fn routes_path_prefers_current_location() {
        let home = tempfile::tempdir().unwrap();
        assert_eq!(routes_path_in(home.path()), home.path().join(ROUTES_FILE));

        std::fs::create_dir_all(home.path().join(".keshif")).unwrap();
        std::fs::write(home.path().join(LEGACY_ROUTES_FILE), "{}").unwrap();
        assert_eq!(
            routes_path_in(home.path()),
            home.path().join(LEGACY_ROUTES_FILE)
        );

        std::fs::create_dir_all(home.path().join(".vhosts")).unwrap();
        std::fs::write(home.path().join(ROUTES_FILE), "{}").unwrap();
        assert_eq!(routes_path_in(home.path()), home.path().join(ROUTES_FILE));
    }

    #[test]
    fn load_routes_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            load_routes(&path),
            Err(HostsError::InvalidRoutes { .. })
        ));
    }

    #[test]
    fn load_routes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_routes(&dir.path().join("nope.json")),
            Err(HostsError::RoutesUnreadable { .. })
        ));
    }

    #[test]
    fn load_or_init_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("routes.json");

        assert!(load_or_init_routes(&path).unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn load_or_init_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        std::fs::write(&path, SAMPLE).unwrap();

        assert_eq!(load_or_init_routes(&path).unwrap().len(), 2);
    }

    #[test]
    fn apply_then_clear() {
        let routes: RouteTable = serde_json::from_str(SAMPLE).unwrap();
        let hosts = Hosts::from_content("# system\n127.0.0.1 localhost\n");

        assert_eq!(apply_routes(&hosts, &routes).unwrap(), 2);
        assert_eq!(apply_routes(&hosts, &routes).unwrap(), 0);
        assert_eq!(hosts.lookup("web.local"), Some(("127.0.0.2".to_string(), 2)));
        assert_eq!(
            hosts.render(),
            "# system\n127.0.0.1        localhost api.local\n127.0.0.2        web.local\n"
        );

        assert_eq!(clear_routes(&hosts, &routes), 2);
        assert_eq!(hosts.render(), "# system\n127.0.0.1        localhost\n");
    }

    #[test]
    fn apply_stops_on_invalid_route() {
        let mut routes = RouteTable::new();
        routes.insert("a".into(), Route::new("a.local", "127.0.0.1", 1));
        routes.insert("b".into(), Route::new("", "127.0.0.1", 2));
        let hosts = Hosts::from_content("");

        assert!(matches!(
            apply_routes(&hosts, &routes),
            Err(HostsError::InvalidEntry(_))
        ));
        assert!(hosts.lookup("a.local").is_some());
    }
}
