//! JSON-RPC 2.0 types for casedeskd communication.
//!
//! One JSON object per line over the Unix socket, request then
//! response. Method parameters and results are plain serde structs so
//! both sides stay in lockstep.

use crate::config::ConfigPatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RPC methods supported by casedeskd
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RpcMethod {
    Status,
    ListLoads,
    ProcessLoad,
    ProcessAll,
    ListCases,
    ListBreached,
    UpdateStatus,
    Reassign,
    AddNote,
    ListUsers,
    SetUserActive,
    GetConfig,
    SetConfig,
    Report,
    ResetCounters,
}

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: RpcMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    pub id: String,
}

impl RpcRequest {
    pub fn new(method: RpcMethod, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method,
            params,
            id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: String,
}

impl RpcResponse {
    pub fn success(id: String, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: String, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Parameters for process_load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessLoadParams {
    pub load_id: String,
    /// Record indices flagged priority by the upstream feed
    #[serde(default)]
    pub priority_records: Vec<usize>,
}

/// Result of processing one load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessLoadResult {
    pub load_id: String,
    pub run_id: String,
    pub created_case_ids: Vec<String>,
    /// Record indices no eligible assignee could be found for
    pub unassigned_records: Vec<usize>,
}

/// Parameters for list_cases
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCasesParams {
    /// Filter by status, origin display string ("In Progress" etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Filter by assignee PSID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

/// Parameters for list_breached
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListBreachedParams {
    /// Evaluate breach as of this instant; daemon clock when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<DateTime<Utc>>,
}

/// Parameters for update_status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusParams {
    pub case_id: String,
    /// Carried as a string so unknown values are rejected server-side
    pub status: String,
}

/// Parameters for reassign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignParams {
    pub case_id: String,
    pub psid: String,
}

/// Parameters for add_note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddNoteParams {
    pub case_id: String,
    pub text: String,
}

/// Parameters for set_user_active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetUserActiveParams {
    pub psid: String,
    pub active: bool,
}

/// Parameters for set_config
pub type SetConfigParams = ConfigPatch;

/// Daemon status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonStatus {
    pub version: String,
    pub pid: u32,
    pub uptime_seconds: u64,
    pub total_users: usize,
    pub active_users: usize,
    pub total_cases: usize,
    pub open_cases: usize,
    pub breached_cases: usize,
    pub total_loads: usize,
    pub unprocessed_loads: usize,
}
