//! # Agent Module
//!
//! Streaming tool-use agent handed to the request handler through the
//! [`RuntimeFactory`] seam.
//!
//! ## Agent Loop
//!
//! 1. Stream a model turn, relaying text and tool-call deltas
//! 2. If the turn requested tools, call them through the gateway session
//! 3. Feed the results back and start the next turn
//! 4. A turn without tool calls emits the final message

mod aggregator;
mod errors;
mod runner;
mod runtime;


pub use errors::RuntimeError;
pub use runner::{StreamingAgent, StreamingAgentFactory};
pub use runtime::{AgentRuntime, AgentSpec, EventStream, MODEL_ID, RuntimeFactory, SYSTEM_PROMPT};
