//! MCP gateway for the Trello API.
//!
//! Speaks JSON-RPC 2.0 over stdio (one message per line) and translates
//! each `tools/call` invocation into one or more authenticated calls
//! against the Trello REST API. Faults never escape the dispatcher: every
//! invocation produces exactly one result, marked `isError` when an
//! orchestrator or the dispatcher raised a fault.

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod jsonrpc;
pub mod protocol;
pub mod server;

pub use config::{ConfigError, GatewayConfig};
pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use server::{serve_stdio, McpServer};
