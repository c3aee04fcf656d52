//! CLI - command-line argument parsing.
//!
//! Keeps argument parsing separate from execution logic. Subcommands
//! mirror the origin dashboard pages: loads, cases, users, config,
//! reports.

use clap::{Parser, Subcommand};

/// Casedesk CLI
#[derive(Parser)]
#[command(name = "casedeskctl")]
#[command(about = "Casedesk - case assignment and SLA management", long_about = None)]
#[command(version = casedesk_shared::VERSION)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path to daemon socket (overrides $CASEDESKD_SOCKET and defaults)
    #[arg(long, global = true)]
    pub socket: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show daemon status and headline counts
    Status,

    /// Daily load operations
    Loads {
        #[command(subcommand)]
        action: LoadCommands,
    },

    /// Case operations
    Cases {
        #[command(subcommand)]
        action: CaseCommands,
    },

    /// Roster operations
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Show or change policy configuration
    Config {
        /// Set configuration values (key=value, repeatable)
        #[arg(long)]
        set: Vec<String>,
    },

    /// Generate a live report
    Report,
}

#[derive(Subcommand)]
pub enum LoadCommands {
    /// List all daily loads
    List,

    /// Process one load into cases
    Process {
        load_id: String,

        /// Record indices flagged priority (repeatable)
        #[arg(long)]
        priority: Vec<usize>,
    },

    /// Process every unprocessed load
    ProcessAll,
}

#[derive(Subcommand)]
pub enum CaseCommands {
    /// List cases, optionally filtered
    List {
        /// Filter by status ("Open", "In Progress", "On Hold", "Resolved")
        #[arg(long)]
        status: Option<String>,

        /// Filter by assignee PSID
        #[arg(long)]
        assignee: Option<String>,
    },

    /// List cases past their SLA deadline
    Breached,

    /// Move a case to a new status
    SetStatus { case_id: String, status: String },

    /// Reassign a case to another user
    Reassign { case_id: String, psid: String },

    /// Append a note to a case
    Note { case_id: String, text: String },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List the roster
    List,

    /// Reactivate a user
    Activate { psid: String },

    /// Deactivate a user (stops new assignments)
    Deactivate { psid: String },
}
