//! OpenRPC Codegen
//!
//! Turns an OpenRPC document into Python and TypeScript client packages.
//!
//! This crate provides:
//! - [`SchemaNode`], a normalized view of the JSON Schema subset clients use
//! - [`map_type`], mapping a schema to a Python or TypeScript type expression
//! - [`group_methods`], nesting dotted method names into [`MethodGroup`]s
//! - [`PythonEmitter`] and [`TypeScriptEmitter`], rendering client, model and
//!   project files from a [`GeneratorContext`]
//!
//! Emitters return [`GeneratedFile`]s and [`ToolInvocation`]s; writing files
//! and running formatters or package builds is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use openrpc_codegen::{Emitter, GeneratorContext, PythonEmitter};
//! use openrpc_types::{ContentDescriptor, Info, Method, OpenRpc, Schema};
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
//! let ctx = GeneratorContext::from_document(&doc).unwrap();
//! let files = PythonEmitter.emit_client(&ctx).unwrap();
//! assert!(files[0].contents.contains("def add(self, a: int, b: int) -> int:"));
//! ```

pub mod code_writer;
pub mod context;
pub mod emitter;
pub mod error;
pub mod grouping;
pub mod ir;
pub mod naming;
pub mod registry;
pub mod schema_node;
pub mod type_mapper;

pub use context::{GeneratorContext, Transport};
pub use emitter::{
    Emitter, GeneratedFile, PythonEmitter, ToolInvocation, ToolStage, TypeScriptEmitter,
    emitter_for,
};
pub use error::{CodegenError, CodegenResult};
pub use grouping::{MethodGroup, group_methods};
pub use ir::{ApiDescription, ApiInfo, Param, ParamStructure, RpcMethod, ServerInfo};
pub use registry::{ModelKind, SchemaEntry, SchemaRegistry};
pub use schema_node::{Combinator, PrimitiveKind, SchemaNode, StringFormat};
pub use type_mapper::{TargetLanguage, TypeSyntax, map_type, map_type_with};
