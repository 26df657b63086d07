//! Load an OpenRPC document from a JSON/YAML file or a live server.

use crate::error::ToolError;
use openrpc_types::{OpenRpc, Validate};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// `--input` values starting with these are fetched with `rpc.discover`
pub fn is_remote(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load and validate a document from a path or URL
pub async fn load_document(input: &str) -> Result<OpenRpc, ToolError> {
    let document = if is_remote(input) {
        discover(input).await?
    } else {
        load_file(Path::new(input)).await?
    };

    document.validate()?;
    info!(
        title = %document.info.title,
        version = %document.info.version,
        methods = document.methods.len(),
        "Loaded OpenRPC document"
    );
    Ok(document)
}

/// Parse a JSON or YAML file, chosen by extension
pub async fn load_file(path: &Path) -> Result<OpenRpc, ToolError> {
    debug!("Reading {}", path.display());
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ToolError::InputFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let input = path.display().to_string();
    let value: Value = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| ToolError::parse(&input, e))?
        }
        _ => serde_json::from_str(&content).map_err(|e| ToolError::parse(&input, e))?,
    };

    OpenRpc::from_value(value).map_err(|e| ToolError::parse(input, e))
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    result: Option<Value>,
    error: Option<DiscoverError>,
}

#[derive(Debug, Deserialize)]
struct DiscoverError {
    code: i64,
    message: String,
}

/// Call `rpc.discover` on a JSON-RPC 2.0 endpoint
pub async fn discover(url: &str) -> Result<OpenRpc, ToolError> {
    info!("Calling rpc.discover on {}", url);
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "rpc.discover",
    });

    let response = reqwest::Client::new()
        .post(url)
        .json(&request)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| ToolError::discovery(url, e.to_string()))?;

    let body: DiscoverResponse = response
        .json()
        .await
        .map_err(|e| ToolError::discovery(url, format!("invalid JSON-RPC response: {e}")))?;

    if let Some(error) = body.error {
        return Err(ToolError::discovery(
            url,
            format!("server returned error {}: {}", error.code, error.message),
        ));
    }

    let result = body
        .result
        .ok_or_else(|| ToolError::discovery(url, "response has neither result nor error"))?;
    OpenRpc::from_value(result).map_err(|e| ToolError::parse(url, e))
}
