//! # Application Module
//!
//! ## Submodules
//!
//! - [`credentials`] - access-token acquisition for the gateway
//! - [`tooling`] - MCP gateway sessions and tool discovery
//! - [`agent`] - streaming tool-use agent runtime
//! - [`handler`] - the invocation entrypoint tying the pieces together

pub mod agent;
pub mod credentials;
pub mod handler;
pub mod tooling;
