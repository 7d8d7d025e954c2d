//! MCP (Model Context Protocol) server for Vakt.
//!
//! Exposes channel monitoring, transcript fetching, and summarization as
//! tools for AI assistants. Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
