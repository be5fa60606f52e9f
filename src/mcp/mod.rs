//! Model Context Protocol server exposing the generator as tools
//!
//! Messages are JSON-RPC 2.0 objects, one per line, on stdin/stdout. Logs go
//! to stderr so they never interleave with responses.

pub mod protocol;
mod server;
pub mod tools;

pub use server::{serve, McpServer, SERVER_NAME};
pub use tools::{tool_definitions, ToolContext, ToolError};
