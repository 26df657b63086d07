use openrpc_codegen::CodegenError;
use openrpc_types::error::OpenRpcError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating clients
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Failed to read OpenRPC file at {path}: {source}")]
    InputFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse OpenRPC document {input}: {message}")]
    OpenRpcParse { input: String, message: String },

    #[error("Invalid OpenRPC document: {0}")]
    OpenRpcValidation(#[from] OpenRpcError),

    #[error("rpc.discover against {url} failed: {message}")]
    Discovery { url: String, message: String },

    #[error("Configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Failed to remove previous output {path}: {source}")]
    OutputDirRemove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDirCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write generated file {path}: {source}")]
    GeneratedFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to start `{command}`: {source}")]
    ToolSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Generation failed for: {}", languages.join(", "))]
    LanguagesFailed { languages: Vec<String> },
}

impl ToolError {
    pub fn parse(input: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::OpenRpcParse {
            input: input.into(),
            message: error.to_string(),
        }
    }

    pub fn discovery(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Discovery {
            url: url.into(),
            message: message.into(),
        }
    }
}
