//! Unix socket client for communicating with casedeskd.

use anyhow::{anyhow, Result};
use casedesk_shared::rpc::{RpcMethod, RpcRequest, RpcResponse};
use casedesk_shared::socket_path;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

/// Client for communicating with casedeskd
pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    /// Connect to the daemon socket.
    pub async fn connect(socket_override: Option<&str>) -> Result<Self> {
        let path = socket_override
            .map(str::to_string)
            .unwrap_or_else(socket_path);
        let path = Path::new(&path);

        if !path.exists() {
            return Err(anyhow!(
                "Casedesk daemon not running.\n\
                 The socket at {} does not exist.\n\
                 Start it with: casedeskd (add --seed for demo data)",
                path.display()
            ));
        }

        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| anyhow!("Cannot connect to casedeskd: {}", e))?;

        Ok(Self { stream })
    }

    /// Send an RPC request and return the raw response.
    pub async fn call(
        &mut self,
        method: RpcMethod,
        params: Option<serde_json::Value>,
    ) -> Result<RpcResponse> {
        let request = RpcRequest::new(method, params);
        let request_json = serde_json::to_string(&request)?;

        self.stream
            .write_all(format!("{}\n", request_json).as_bytes())
            .await?;

        let (reader, _) = self.stream.split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        reader.read_line(&mut line).await?;

        let response: RpcResponse = serde_json::from_str(&line)?;
        Ok(response)
    }

    /// Call and deserialize the result, surfacing daemon errors.
    pub async fn call_as<T: serde::de::DeserializeOwned>(
        &mut self,
        method: RpcMethod,
        params: Option<serde_json::Value>,
    ) -> Result<T> {
        let response = self.call(method, params).await?;

        if let Some(error) = response.error {
            return Err(anyhow!("{}", error.message));
        }

        let result = response
            .result
            .ok_or_else(|| anyhow!("No result in response"))?;
        Ok(serde_json::from_value(result)?)
    }
}
