//! Shared types and protocol for Casedesk components.
//!
//! Everything that crosses the daemon/client boundary lives here:
//! the case/user/load data model, policy configuration, the error
//! taxonomy, the JSON-RPC protocol, and report types.

pub mod case;
pub mod config;
pub mod error;
pub mod load;
pub mod report;
pub mod rpc;
pub mod user;

pub use error::CasedeskError;

/// Casedesk version, single source of truth for all components.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default daemon socket path. Override with $CASEDESKD_SOCKET.
pub const SOCKET_PATH: &str = "/run/casedesk/casedeskd.sock";

/// Resolve the daemon socket path from the environment or the default.
pub fn socket_path() -> String {
    std::env::var("CASEDESKD_SOCKET").unwrap_or_else(|_| SOCKET_PATH.to_string())
}
