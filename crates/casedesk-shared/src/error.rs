//! Error types for Casedesk.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CasedeskError {
    #[error("Daemon not running. Start casedeskd first.")]
    DaemonNotRunning,

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Load {0} has already been processed")]
    AlreadyProcessed(String),

    #[error("Unknown load: {0}")]
    UnknownLoad(String),

    #[error("Unknown case: {0}")]
    UnknownCase(String),

    #[error("Invalid assignee: {0}")]
    InvalidUser(String),

    #[error("Invalid case status: {0}")]
    InvalidTransition(String),

    #[error("Daily cap violated for {0}")]
    CapacityExceeded(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CasedeskError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            CasedeskError::DaemonNotRunning => -32000,
            CasedeskError::Socket(_) => -32001,
            CasedeskError::AlreadyProcessed(_) => -32010,
            CasedeskError::UnknownLoad(_) => -32011,
            CasedeskError::UnknownCase(_) => -32012,
            CasedeskError::InvalidUser(_) => -32013,
            CasedeskError::InvalidTransition(_) => -32014,
            CasedeskError::CapacityExceeded(_) => -32015,
            CasedeskError::InvalidConfig(_) => -32016,
            CasedeskError::Io(_) => -32006,
            CasedeskError::Json(_) => -32700,
            CasedeskError::Internal(_) => -32603,
        }
    }
}
