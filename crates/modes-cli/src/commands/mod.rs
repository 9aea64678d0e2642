//! CLI command handlers
//!
//! `modes` runs a single operation and prints its text result; `serve`
//! exposes the same operations as MCP tools on stdio.

pub mod modes;
pub mod serve;
