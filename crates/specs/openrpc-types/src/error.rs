//! Error types for loading and validating OpenRPC documents.

use thiserror::Error;

/// Errors that can occur when working with OpenRPC documents.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpenRpcError {
    /// A document constraint was violated
    #[error("Validation error: {message}")]
    ValidationError {
        /// Human-readable error message
        message: String,
        /// Optional field path where the error occurred
        field_path: Option<String>,
    },

    /// The document is not well-formed JSON, or does not match the document shape
    #[error("JSON error: {message}")]
    JsonError {
        /// JSON parsing/serialization error message
        message: String,
    },

    /// A `$ref` could not be resolved
    #[error("Reference resolution error: {message}")]
    ReferenceError {
        /// Reference resolution error message
        message: String,
        /// The reference string that failed to resolve
        reference: String,
    },

    #[error("Missing required field: {field_name}")]
    MissingField { field_name: String },

    #[error("Invalid field value for '{field_name}': {message}")]
    InvalidField { field_name: String, message: String },

    /// An object has duplicate keys that should be unique
    #[error("Duplicate key '{key}' found in {context}")]
    DuplicateKey {
        /// The duplicate key name
        key: String,
        /// Context where the duplicate was found
        context: String,
    },

    #[error("Invalid URL format: {url}")]
    InvalidUrl { url: String },

    #[error("Invalid email format: {email}")]
    InvalidEmail { email: String },

    #[error("Unsupported OpenRPC version: {version}")]
    UnsupportedVersion { version: String },

    /// A schema uses keywords in a way the generator cannot represent
    #[error("JSON Schema error: {message}")]
    SchemaError {
        /// Schema error message
        message: String,
        /// Optional schema path where the error occurred
        schema_path: Option<String>,
    },
}

impl OpenRpcError {
    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field_path: None,
        }
    }

    /// Create a new validation error with field path
    pub fn validation_with_path(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field_path: Some(field_path.into()),
        }
    }

    pub fn json(message: impl Into<String>) -> Self {
        Self::JsonError {
            message: message.into(),
        }
    }

    pub fn reference(message: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::ReferenceError {
            message: message.into(),
            reference: reference.into(),
        }
    }

    pub fn missing_field(field_name: impl Into<String>) -> Self {
        Self::MissingField {
            field_name: field_name.into(),
        }
    }

    pub fn invalid_field(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field_name: field_name.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_key(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DuplicateKey {
            key: key.into(),
            context: context.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            version: version.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaError {
            message: message.into(),
            schema_path: None,
        }
    }

    pub fn schema_with_path(message: impl Into<String>, schema_path: impl Into<String>) -> Self {
        Self::SchemaError {
            message: message.into(),
            schema_path: Some(schema_path.into()),
        }
    }

    /// Prefix the field path of a validation error with `parent`.
    ///
    /// Other error kinds are wrapped into a validation error at `parent`.
    pub fn at(self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        match self {
            Self::ValidationError {
                message,
                field_path: Some(path),
            } => Self::validation_with_path(message, format!("{parent}.{path}")),
            Self::ValidationError {
                message,
                field_path: None,
            } => Self::validation_with_path(message, parent),
            other => Self::validation_with_path(other.to_string(), parent),
        }
    }
}

impl From<serde_json::Error> for OpenRpcError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

/// Result type for OpenRPC operations
pub type OpenRpcResult<T> = Result<T, OpenRpcError>;
