//! Error types for building the generator IR and rendering client code.

use openrpc_types::error::OpenRpcError;
use std::fmt;
use thiserror::Error;

/// Errors raised while turning a document into generated sources.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The input document failed validation
    #[error("Invalid OpenRPC document: {0}")]
    Document(#[from] OpenRpcError),

    /// Two entries in the method tree sanitize to the same identifier
    #[error("Name collision in group '{group}' for '{name}': {message}")]
    NameCollision {
        /// Dotted path of the group where the collision happened
        group: String,
        /// The sanitized identifier both entries map to
        name: String,
        message: String,
    },

    #[error("Unresolved reference '{reference}': {message}")]
    UnresolvedReference { reference: String, message: String },

    #[error("Unsupported OpenRPC feature: {0}")]
    Unsupported(String),

    #[error("Failed to render generated source: {0}")]
    Render(#[from] fmt::Error),

    /// A project manifest could not be serialized
    #[error("Failed to serialize {file}: {message}")]
    Manifest { file: String, message: String },
}

impl CodegenError {
    pub fn name_collision(
        group: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::NameCollision {
            group: group.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn unresolved(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            reference: reference.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn manifest(file: impl Into<String>, error: impl fmt::Display) -> Self {
        Self::Manifest {
            file: file.into(),
            message: error.to_string(),
        }
    }
}

/// Result type for code generation
pub type CodegenResult<T> = Result<T, CodegenError>;
