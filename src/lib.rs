//! # vhosts
//!
//! Keep local vhost names in the system hosts file.
//!
//! The hosts file is parsed into an ordered, line-accurate table. Address
//! lines can be upserted and removed idempotently while comments, blank
//! lines and anything unrecognised are written back exactly as they were.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use vhosts::{Hosts, apply_routes, clear_routes, default_routes_path, load_or_init_routes};
//!
//! let routes = load_or_init_routes(&default_routes_path()?)?;
//!
//! // Map every vhost to its address (requires root for /etc/hosts).
//! let hosts = Hosts::load_default()?;
//! apply_routes(&hosts, &routes)?;
//! hosts.save()?;
//!
//! // Later, drop them again.
//! let hosts = Hosts::load_default()?;
//! clear_routes(&hosts, &routes);
//! hosts.save()?;
//! ```
//!
//! ## Formatting
//!
//! Address lines that are touched or kept are re-rendered as the address
//! padded to 16 columns, a space, then the hostnames separated by single
//! spaces. Irregular spacing in address lines is normalized on save.
//!
//! ## Durability
//!
//! [`Hosts::save`] writes a uniquely named temporary file next to the
//! target, syncs it, renames it over the target and syncs the directory, so
//! a crash leaves either the old or the new file. A symlinked hosts file is
//! updated through the link.
//! Changes made to the file by other programs between load and save are
//! overwritten.
//!
//! ## Permissions
//!
//! Writing the system hosts file requires root (Administrator on Windows).
//! [`HostsError::is_permission_denied`] identifies that failure.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod hosts;
pub mod line;
pub mod routes;
pub mod util;

pub use config::{DEFAULT_HOSTS_PATH, HostsConfig};
pub use error::{HostsError, Result};
pub use hosts::Hosts;
pub use line::{HostLine, LineKind, parse_lines};
pub use routes::{
    Route, RouteTable, apply_routes, clear_routes, default_routes_path, load_or_init_routes,
    load_routes,
};
