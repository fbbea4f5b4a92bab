//! vnc-mcp: an MCP server that drives a remote desktop over VNC.
//!
//! Protocol handling lives in the `vnc` crate; this crate maps tool calls to
//! coordinate-remapped, paced input-event sequences and framebuffer
//! transcoding.

pub mod config;
pub mod control;
pub mod keymap;
pub mod mcp;
pub mod vnc;
