//! RPC server - Unix socket server for daemon-client communication.
//!
//! Newline-delimited JSON-RPC 2.0: one request object per line, one
//! response object per line, one tokio task per connection.

use anyhow::{Context, Result};
use casedesk_shared::rpc::{RpcMethod, RpcRequest, RpcResponse};
use casedesk_shared::socket_path;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{error, info, warn};

use crate::handlers;
use crate::state::SharedState;

/// Start the RPC server and serve forever.
pub async fn start_server(state: SharedState) -> Result<()> {
    let socket = socket_path();
    let socket = Path::new(&socket);

    if let Some(socket_dir) = socket.parent() {
        tokio::fs::create_dir_all(socket_dir)
            .await
            .context("Failed to create socket directory")?;
    }

    // Remove a stale socket from a previous run
    let _ = tokio::fs::remove_file(socket).await;

    let listener = UnixListener::bind(socket).context("Failed to bind Unix socket")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(socket, std::fs::Permissions::from_mode(0o666))?;
    }

    info!("RPC server listening on {}", socket.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, state).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection(stream: UnixStream, state: SharedState) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .context("Failed to read from socket")?;

        if bytes_read == 0 {
            break;
        }

        let request: RpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Invalid request JSON: {}", e);
                continue;
            }
        };

        let response = dispatch(request, state.clone()).await;

        let response_json = serde_json::to_string(&response)? + "\n";
        writer
            .write_all(response_json.as_bytes())
            .await
            .context("Failed to write response")?;
    }

    Ok(())
}

/// Route one request to its handler.
async fn dispatch(request: RpcRequest, state: SharedState) -> RpcResponse {
    let RpcRequest {
        method, params, id, ..
    } = request;

    match method {
        RpcMethod::Status => handlers::handle_status(state, id).await,
        RpcMethod::ListLoads => handlers::handle_list_loads(state, id).await,
        RpcMethod::ProcessLoad => handlers::handle_process_load(state, id, params).await,
        RpcMethod::ProcessAll => handlers::handle_process_all(state, id).await,
        RpcMethod::ListCases => handlers::handle_list_cases(state, id, params).await,
        RpcMethod::ListBreached => handlers::handle_list_breached(state, id, params).await,
        RpcMethod::UpdateStatus => handlers::handle_update_status(state, id, params).await,
        RpcMethod::Reassign => handlers::handle_reassign(state, id, params).await,
        RpcMethod::AddNote => handlers::handle_add_note(state, id, params).await,
        RpcMethod::ListUsers => handlers::handle_list_users(state, id).await,
        RpcMethod::SetUserActive => handlers::handle_set_user_active(state, id, params).await,
        RpcMethod::GetConfig => handlers::handle_get_config(state, id).await,
        RpcMethod::SetConfig => handlers::handle_set_config(state, id, params).await,
        RpcMethod::Report => handlers::handle_report(state, id).await,
        RpcMethod::ResetCounters => handlers::handle_reset_counters(state, id).await,
    }
}
