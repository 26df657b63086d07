//! OpenRPC Types
//!
//! Serde types for OpenRPC 1.x documents, trimmed to what a client generator
//! reads, with bon builders and document validation.
//!
//! This crate provides:
//! - The OpenRPC document tree (info, servers, methods, components)
//! - The JSON Schema keywords needed to derive client types, including
//!   `const`, `prefixItems`, `$defs` and boolean schemas
//! - Order-preserving maps so generated output is stable across runs
//! - Reference lookup for `#/components/...` pointers
//!
//! # Example
//!
//! ```rust
//! use openrpc_types::{ContentDescriptor, Info, Method, OpenRpc, Schema, Validate};
//!
//! let doc = OpenRpc::v1_3_2(
//!     Info::new("Math API", "1.0.0"),
//!     vec![
//!         Method::new("math.add", vec![
//!             ContentDescriptor::new("a", Schema::integer()).required().into(),
//!             ContentDescriptor::new("b", Schema::integer()).required().into(),
//!         ])
//!         .with_result(ContentDescriptor::new("sum", Schema::integer()).into())
//!         .into(),
//!     ],
//! );
//!
//! assert!(doc.validate().is_ok());
//! ```

pub mod error;
pub mod validation;

mod components;
mod content_descriptor;
mod extensions;
mod info;
mod method;
mod openrpc;
mod reference;
mod schema;
mod server;

pub use components::*;
pub use content_descriptor::*;
pub use extensions::*;
pub use info::*;
pub use method::*;
pub use openrpc::*;
pub use reference::*;
pub use schema::*;
pub use server::*;

pub use error::*;
pub use validation::*;

/// OpenRPC specification version constants
pub mod version {
    /// Newest OpenRPC version this crate knows about
    pub const CURRENT: &str = "1.3.2";

    /// Document versions accepted by [`crate::validation::validate_openrpc_version`]
    pub const SUPPORTED: &[&str] = &[
        "1.0.0", "1.0.0-rc1", "1.1.0", "1.2.0", "1.2.1", "1.2.2", "1.2.3", "1.2.4", "1.2.5",
        "1.2.6", "1.3.0", "1.3.1", "1.3.2",
    ];

    /// Check if a version string is supported
    pub fn is_supported(version: &str) -> bool {
        SUPPORTED.contains(&version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(version::is_supported("1.3.2"));
        assert!(version::is_supported("1.2.6"));
        assert!(version::is_supported("1.0.0"));
        assert!(!version::is_supported("2.0.0"));
        assert!(!version::is_supported("0.9.0"));
    }
}
