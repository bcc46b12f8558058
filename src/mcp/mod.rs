//! MCP server for the journal retrieval engine
//!
//! Lets an assistant ask questions about the journal and trigger rebuilds.

mod server;

pub use server::run_mcp_server;
