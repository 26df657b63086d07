//! Command line front end for `openrpc-codegen`.
//!
//! Loads an OpenRPC document from a file or a live `rpc.discover` endpoint,
//! writes one client package per language and runs the formatters and
//! builds the emitters ask for through an [`runner::ExternalToolRunner`].

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod runner;

pub use error::ToolError;
