//! Unity MCP Client Demo
//!
//! This example demonstrates how to use the Unity MCP client to:
//! - List scenes and GameObjects
//! - Create a GameObject with a physics body and a built-in mesh
//! - Move it and clean it up again
//!
//! Run with the Unity Editor open and the MCP server package listening, optionally
//! passing the server address: `cargo run --example client_demo -- http://127.0.0.1:8080`

use unity_mcp_client::logging::init_logging;
use unity_mcp_client::{MeshPrimitive, UnityMcpClient, response_succeeded};

fn main() -> anyhow::Result<()> {
    init_logging();

    println!("Unity MCP Client Demo");
    println!("=====================\n");

    let client = match std::env::args().nth(1) {
        Some(base_url) => UnityMcpClient::with_base_url(&base_url)?,
        None => UnityMcpClient::new()?,
    };
    println!("Using Unity MCP server at {}", client.server_address());

    println!("\n1. Listing scenes...");
    let scenes = client.get_all_scenes()?;
    println!("   {}", serde_json::to_string_pretty(&scenes)?);

    println!("\n2. Creating 'DemoCube'...");
    let created = client.create_gameobject("DemoCube", None)?;
    if !response_succeeded(&created) {
        println!("   ✗ Server refused: {}", serde_json::to_string(&created)?);
        return Ok(());
    }
    println!("   ✓ Created");

    println!("\n3. Adding a Rigidbody and a cube mesh...");
    client.add_component("DemoCube", "Rigidbody")?;
    client.set_component_property("DemoCube", "Rigidbody", "mass", 2.5)?;
    let mesh = client.add_primitive_mesh("DemoCube", MeshPrimitive::Cube)?;
    println!("   Mesh result: {}", serde_json::to_string(&mesh)?);

    println!("\n4. Moving it...");
    client.set_transform_vector("DemoCube", "position", [0.0_f64, 3.0, 0.0])?;

    println!("\n5. Components on 'DemoCube':");
    let components = client.get_all_components("DemoCube")?;
    println!("   {}", serde_json::to_string_pretty(&components)?);

    println!("\n6. Deleting 'DemoCube'...");
    client.delete_gameobject("DemoCube")?;
    println!("   ✓ Done");

    Ok(())
}
