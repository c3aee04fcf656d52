//! RPC handlers mapping methods onto engine calls.
//!
//! Each handler takes the state lock for the duration of one
//! operation, snapshots what it needs, and serializes the result.
//! Structural errors become JSON-RPC error objects with the shared
//! error codes; per-record soft failures ride back inside results.

use casedesk_shared::case::CaseStatus;
use casedesk_shared::rpc::{
    AddNoteParams, ListBreachedParams, ListCasesParams, ProcessLoadParams, ReassignParams,
    RpcResponse, SetConfigParams, SetUserActiveParams, UpdateStatusParams,
};
use casedesk_shared::CasedeskError;
use chrono::Utc;
use tracing::{error, info};

use crate::engine;
use crate::state::SharedState;

fn ok(id: String, value: impl serde::Serialize) -> RpcResponse {
    match serde_json::to_value(value) {
        Ok(v) => RpcResponse::success(id, v),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            let err = CasedeskError::Json(e);
            RpcResponse::error(id, err.code(), err.to_string())
        }
    }
}

fn fail(id: String, err: CasedeskError) -> RpcResponse {
    RpcResponse::error(id, err.code(), err.to_string())
}

fn parse_params<T: serde::de::DeserializeOwned>(
    params: Option<serde_json::Value>,
) -> Result<T, CasedeskError> {
    // Absent params deserialize like an empty object so option-only
    // param structs work without a payload.
    let value = params.unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    serde_json::from_value(value)
        .map_err(|e| CasedeskError::Internal(format!("invalid params: {e}")))
}

pub async fn handle_status(state: SharedState, id: String) -> RpcResponse {
    let state = state.read().await;
    ok(id, state.to_status(Utc::now()))
}

pub async fn handle_list_loads(state: SharedState, id: String) -> RpcResponse {
    let state = state.read().await;
    ok(id, &state.loads)
}

pub async fn handle_process_load(
    state: SharedState,
    id: String,
    params: Option<serde_json::Value>,
) -> RpcResponse {
    let params: ProcessLoadParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return fail(id, e),
    };

    let mut state = state.write().await;
    match state.process_load(&params.load_id, &params.priority_records, Utc::now()) {
        Ok(result) => ok(id, result),
        Err(e) => {
            info!(load_id = %params.load_id, "process_load rejected: {}", e);
            fail(id, e)
        }
    }
}

pub async fn handle_process_all(state: SharedState, id: String) -> RpcResponse {
    let mut state = state.write().await;
    match state.process_all(Utc::now()) {
        Ok(results) => ok(id, results),
        Err(e) => fail(id, e),
    }
}

pub async fn handle_list_cases(
    state: SharedState,
    id: String,
    params: Option<serde_json::Value>,
) -> RpcResponse {
    let params: ListCasesParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return fail(id, e),
    };

    let status = match params.status.as_deref() {
        Some(raw) => match raw.parse::<CaseStatus>() {
            Ok(s) => Some(s),
            Err(e) => return fail(id, e),
        },
        None => None,
    };

    let state = state.read().await;
    ok(id, state.filtered_cases(status, params.assignee.as_deref()))
}

pub async fn handle_list_breached(
    state: SharedState,
    id: String,
    params: Option<serde_json::Value>,
) -> RpcResponse {
    let params: ListBreachedParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return fail(id, e),
    };

    let as_of = params.as_of.unwrap_or_else(Utc::now);
    let state = state.read().await;
    ok(id, state.breached_cases(as_of))
}

pub async fn handle_update_status(
    state: SharedState,
    id: String,
    params: Option<serde_json::Value>,
) -> RpcResponse {
    let params: UpdateStatusParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return fail(id, e),
    };

    // Closed enumeration: reject unknown strings before touching state.
    let new_status = match params.status.parse::<CaseStatus>() {
        Ok(s) => s,
        Err(e) => return fail(id, e),
    };

    let mut state = state.write().await;
    match state.case_mut(&params.case_id) {
        Ok(case) => {
            engine::update_status(case, new_status, Utc::now());
            ok(id, &*case)
        }
        Err(e) => fail(id, e),
    }
}

pub async fn handle_reassign(
    state: SharedState,
    id: String,
    params: Option<serde_json::Value>,
) -> RpcResponse {
    let params: ReassignParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return fail(id, e),
    };

    let mut state = state.write().await;
    let state = &mut *state;
    let case = match state
        .cases
        .iter_mut()
        .find(|c| c.case_id == params.case_id)
    {
        Some(c) => c,
        None => return fail(id, CasedeskError::UnknownCase(params.case_id)),
    };

    match engine::reassign(case, &mut state.users, &params.psid, Utc::now()) {
        Ok(()) => ok(id, &*case),
        Err(e) => fail(id, e),
    }
}

pub async fn handle_add_note(
    state: SharedState,
    id: String,
    params: Option<serde_json::Value>,
) -> RpcResponse {
    let params: AddNoteParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return fail(id, e),
    };

    let mut state = state.write().await;
    match state.case_mut(&params.case_id) {
        Ok(case) => {
            case.push_note(Utc::now(), params.text);
            ok(id, &*case)
        }
        Err(e) => fail(id, e),
    }
}

pub async fn handle_list_users(state: SharedState, id: String) -> RpcResponse {
    let state = state.read().await;
    ok(id, &state.users)
}

pub async fn handle_set_user_active(
    state: SharedState,
    id: String,
    params: Option<serde_json::Value>,
) -> RpcResponse {
    let params: SetUserActiveParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return fail(id, e),
    };

    let mut state = state.write().await;
    match engine::set_user_active(&mut state.users, &params.psid, params.active) {
        Ok(()) => {
            let user = state.users.iter().find(|u| u.psid == params.psid);
            ok(id, user)
        }
        Err(e) => fail(id, e),
    }
}

pub async fn handle_get_config(state: SharedState, id: String) -> RpcResponse {
    let state = state.read().await;
    ok(id, &state.config)
}

pub async fn handle_set_config(
    state: SharedState,
    id: String,
    params: Option<serde_json::Value>,
) -> RpcResponse {
    let patch: SetConfigParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return fail(id, e),
    };

    let mut state = state.write().await;
    match state.apply_config(&patch) {
        Ok(()) => {
            info!("Configuration updated");
            ok(id, &state.config)
        }
        Err(e) => fail(id, e),
    }
}

pub async fn handle_report(state: SharedState, id: String) -> RpcResponse {
    let state = state.read().await;
    ok(id, state.report(Utc::now()))
}

/// Maintenance operation, normally driven by the scheduler.
pub async fn handle_reset_counters(state: SharedState, id: String) -> RpcResponse {
    let mut state = state.write().await;
    let today = match state.config.timezone() {
        Ok(tz) => Utc::now().with_timezone(&tz).date_naive(),
        Err(e) => return fail(id, e),
    };
    engine::reset_daily_counters(&mut state.users, today);
    ok(id, &state.users)
}
