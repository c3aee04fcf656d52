//! Casedesk daemon library.
//!
//! Owns all case-management state in memory and exposes it to clients
//! over a Unix socket. The assignment and SLA policy lives in
//! [`engine`] and [`sla`] as plain synchronous functions; everything
//! else is plumbing around them.

pub mod engine;
pub mod handlers;
pub mod rpc_server;
pub mod scheduler;
pub mod seed;
pub mod sla;
pub mod state;
