//! Casedesk control - CLI client library.
//!
//! Thin wrapper over the daemon's Unix socket RPC. The binary in
//! `main.rs` parses arguments and dispatches to [`commands`].

pub mod cli;
pub mod client;
pub mod commands;
