//! Unity MCP Client
//!
//! A blocking client for the HTTP command server that runs inside the Unity Editor.
//! Each call sends one JSON command (create GameObjects, add components, instantiate
//! prefabs, create scripts, ...) and returns the server's JSON reply unchanged.

pub mod logging;
pub mod unity_mcp_client;
pub mod unity_mcp_config;
pub mod unity_mcp_messages;

#[cfg(test)]
mod test_utils;

pub use unity_mcp_client::UnityMcpClient;
pub use unity_mcp_config::{ClientConfig, ServerAddress};
pub use unity_mcp_messages::{
    Command, CommandRequest, CommandResponse, CommunicationError, MeshPrimitive, UnityMcpError,
    Vector3, response_succeeded,
};
