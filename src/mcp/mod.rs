//! MCP protocol layer: exposes the remote-control facade as tools over a
//! stdio transport, plus the static keymap resource.

mod server;

pub use server::VncControlServer;
