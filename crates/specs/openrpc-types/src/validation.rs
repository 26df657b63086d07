//! Validation traits and utilities for OpenRPC documents.

use crate::error::{OpenRpcError, OpenRpcResult};
use std::collections::HashSet;

/// Trait for validating OpenRPC document objects.
pub trait Validate {
    /// Validate this object against OpenRPC document constraints.
    ///
    /// Returns `Ok(())` if valid, or an `OpenRpcError` describing the validation failure.
    fn validate(&self) -> OpenRpcResult<()>;
}

/// Trait for validating collections with uniqueness constraints.
pub trait ValidateUnique<T> {
    /// Validate that all items have unique keys according to `key_fn`.
    fn validate_unique<K, F>(&self, key_fn: F, context: &str) -> OpenRpcResult<()>
    where
        K: std::hash::Hash + Eq + Clone + std::fmt::Display,
        F: Fn(&T) -> K;
}

impl<T> ValidateUnique<T> for [T] {
    fn validate_unique<K, F>(&self, key_fn: F, context: &str) -> OpenRpcResult<()>
    where
        K: std::hash::Hash + Eq + Clone + std::fmt::Display,
        F: Fn(&T) -> K,
    {
        let mut seen = HashSet::new();
        for item in self {
            let key = key_fn(item);
            if !seen.insert(key.clone()) {
                return Err(OpenRpcError::duplicate_key(key.to_string(), context));
            }
        }
        Ok(())
    }
}

/// Validate URL format
pub fn validate_url(url: &str) -> OpenRpcResult<()> {
    if url.is_empty() {
        return Err(OpenRpcError::invalid_url("URL cannot be empty"));
    }

    // Scheme, absolute path, or a bare localhost
    if !url.contains("://") && !url.starts_with('/') && !url.starts_with("localhost") {
        return Err(OpenRpcError::invalid_url(url));
    }

    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> OpenRpcResult<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(OpenRpcError::invalid_email(email));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(OpenRpcError::invalid_email(email));
    }

    Ok(())
}

/// Validate a `major.minor[.patch...]` version string
pub fn validate_semver(version: &str) -> OpenRpcResult<()> {
    if version.is_empty() {
        return Err(OpenRpcError::validation("Version cannot be empty"));
    }

    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() < 2 {
        return Err(OpenRpcError::validation(format!(
            "Invalid version format: {version}"
        )));
    }

    for (i, part) in parts.iter().take(2).enumerate() {
        if part.parse::<u32>().is_err() {
            let component = if i == 0 { "major" } else { "minor" };
            return Err(OpenRpcError::validation(format!(
                "Invalid {component} version component: {part}"
            )));
        }
    }

    Ok(())
}

/// Validate the `openrpc` field of a document
pub fn validate_openrpc_version(version: &str) -> OpenRpcResult<()> {
    validate_semver(version)?;

    if !crate::version::is_supported(version) {
        return Err(OpenRpcError::unsupported_version(version));
    }

    Ok(())
}

/// Validate a key under `components` (`^[a-zA-Z0-9\.\-_]+$`)
pub fn validate_component_key(key: &str) -> OpenRpcResult<()> {
    if key.is_empty() {
        return Err(OpenRpcError::validation("Component key cannot be empty"));
    }

    if let Some(ch) = key
        .chars()
        .find(|ch| !ch.is_ascii_alphanumeric() && !matches!(ch, '.' | '-' | '_'))
    {
        return Err(OpenRpcError::validation(format!(
            "Invalid component key character '{ch}' in key '{key}'"
        )));
    }

    Ok(())
}

/// Validate a method name.
///
/// Names are sent verbatim as the JSON-RPC `method` member. The `rpc.` prefix
/// is reserved, `rpc.discover` being the only allowed use.
pub fn validate_method_name(name: &str) -> OpenRpcResult<()> {
    if name.is_empty() {
        return Err(OpenRpcError::validation("Method name cannot be empty"));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(OpenRpcError::validation(format!(
            "Method name '{name}' cannot contain whitespace"
        )));
    }

    if name.starts_with("rpc.") && name != "rpc.discover" {
        return Err(OpenRpcError::validation(format!(
            "Method name '{name}' uses reserved 'rpc.' prefix"
        )));
    }

    Ok(())
}

/// Validate a content descriptor name
pub fn validate_content_descriptor_name(name: &str) -> OpenRpcResult<()> {
    if name.is_empty() {
        return Err(OpenRpcError::validation(
            "Content descriptor name cannot be empty",
        ));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(OpenRpcError::validation(format!(
            "Content descriptor name '{name}' cannot contain whitespace"
        )));
    }

    Ok(())
}
