//! Per-run generation state passed explicitly to every emitter.

use crate::error::CodegenResult;
use crate::grouping::{MethodGroup, group_methods};
use crate::ir::ApiDescription;
use crate::naming::{pascal_case, snake_case};
use openrpc_types::OpenRpc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transports a client class can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Http,
    #[serde(alias = "websocket")]
    Ws,
}

impl Transport {
    /// Suffix used in client class names, e.g. `RPCHTTPClient`
    pub fn class_suffix(&self) -> &'static str {
        match self {
            Transport::Http => "HTTP",
            Transport::Ws => "WS",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Http => "http",
            Transport::Ws => "ws",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Transport::Http),
            "ws" | "websocket" => Ok(Transport::Ws),
            other => Err(format!("unsupported transport '{other}'")),
        }
    }
}

/// Everything one generation run renders from.
///
/// Built once per invocation; emitters only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorContext {
    pub api: ApiDescription,
    pub groups: MethodGroup,
    pub transports: Vec<Transport>,
    /// Default endpoint for generated clients, overriding the first server
    pub client_url: Option<String>,
}

impl GeneratorContext {
    pub fn new(api: ApiDescription) -> CodegenResult<Self> {
        let groups = group_methods(&pascal_case(&api.info.title), &api.methods)?;
        Ok(Self {
            api,
            groups,
            transports: vec![Transport::Http],
            client_url: None,
        })
    }

    pub fn from_document(document: &OpenRpc) -> CodegenResult<Self> {
        Self::new(ApiDescription::from_document(document)?)
    }

    pub fn with_transports(mut self, transports: Vec<Transport>) -> Self {
        if !transports.is_empty() {
            self.transports = transports;
        }
        self
    }

    pub fn with_client_url(mut self, url: impl Into<String>) -> Self {
        self.client_url = Some(url.into());
        self
    }

    /// PascalCase client name, e.g. `MathApi`
    pub fn client_name(&self) -> String {
        pascal_case(&self.api.info.title)
    }

    /// Package / directory name, e.g. `math_api_client`
    pub fn package_name(&self) -> String {
        format!("{}_client", snake_case(&self.api.info.title))
    }

    /// Distribution name used by package managers, e.g. `math-api-client`
    pub fn distribution_name(&self) -> String {
        self.package_name().replace('_', "-")
    }

    pub fn has_models(&self) -> bool {
        !self.api.registry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> GeneratorContext {
        let document = OpenRpc::from_value(json!({
            "openrpc": "1.2.6",
            "info": { "title": "Math API", "version": "1.0.0" },
            "methods": [
                { "name": "math.add", "params": [], "result": { "name": "sum", "schema": { "type": "integer" } } }
            ]
        }))
        .unwrap();
        GeneratorContext::from_document(&document).unwrap()
    }

    #[test]
    fn test_names() {
        let ctx = context();
        assert_eq!(ctx.client_name(), "MathApi");
        assert_eq!(ctx.package_name(), "math_api_client");
        assert_eq!(ctx.distribution_name(), "math-api-client");
        assert_eq!(ctx.groups.name, "MathApi");
        assert!(!ctx.has_models());
    }

    #[test]
    fn test_transports() {
        let ctx = context();
        assert_eq!(ctx.transports, vec![Transport::Http]);

        let ctx = ctx.with_transports(vec![Transport::Http, Transport::Ws]);
        assert_eq!(ctx.transports.len(), 2);

        let ctx = ctx.with_transports(vec![]);
        assert_eq!(ctx.transports.len(), 2);

        assert_eq!("WebSocket".parse::<Transport>(), Ok(Transport::Ws));
        assert!("grpc".parse::<Transport>().is_err());
        assert_eq!(Transport::Ws.class_suffix(), "WS");
    }
}
