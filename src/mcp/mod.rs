//! MCP stdio surface over the answer service.
pub mod server;
pub mod tools;
