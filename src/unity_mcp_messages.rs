use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;

/// Parsed JSON object returned by the Unity MCP server, passed through unchanged
pub type CommandResponse = Map<String, Value>;

/// Commands understood by the Unity-side MCP server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    GetAllScenes,
    GetAllGameObjectsInScene,
    CreateGameObject,
    DeleteGameObject,
    FindGameObjectsByTag,
    AddComponent,
    GetAllComponents,
    RemoveComponent,
    SetComponentProperty,
    GetAllPrefabs,
    InstantiatePrefab,
    CreateScriptAsset,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::GetAllScenes,
        Command::GetAllGameObjectsInScene,
        Command::CreateGameObject,
        Command::DeleteGameObject,
        Command::FindGameObjectsByTag,
        Command::AddComponent,
        Command::GetAllComponents,
        Command::RemoveComponent,
        Command::SetComponentProperty,
        Command::GetAllPrefabs,
        Command::InstantiatePrefab,
        Command::CreateScriptAsset,
    ];

    /// Name of the command as it appears in the `command` field of the request body
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::GetAllScenes => "get_all_scenes",
            Command::GetAllGameObjectsInScene => "get_all_gameobjects_in_scene",
            Command::CreateGameObject => "create_gameobject",
            Command::DeleteGameObject => "delete_gameobject",
            Command::FindGameObjectsByTag => "find_gameobjects_by_tag",
            Command::AddComponent => "add_component",
            Command::GetAllComponents => "get_all_components",
            Command::RemoveComponent => "remove_component",
            Command::SetComponentProperty => "set_component_property",
            Command::GetAllPrefabs => "get_all_prefabs",
            Command::InstantiatePrefab => "instantiate_prefab",
            Command::CreateScriptAsset => "create_script_asset",
        }
    }

    /// Path of the endpoint relative to the server base address
    ///
    /// The server dispatches every command from a single JSON POST endpoint.
    pub fn path(&self) -> &'static str {
        "/"
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body sent to the Unity MCP server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRequest {
    pub command: String,
    pub parameters: Map<String, Value>,
}

impl CommandRequest {
    /// Creates a request with no parameters
    pub fn new(command: Command) -> Self {
        Self {
            command: command.as_str().to_string(),
            parameters: Map::new(),
        }
    }

    /// Adds a parameter to the request
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    /// Adds a parameter only when a non-empty value is given
    pub fn with_optional(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.with(key, value),
            _ => self,
        }
    }
}

/// Returns whether the server reported `"success": true` in its response
pub fn response_succeeded(response: &CommandResponse) -> bool {
    response
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

static VECTOR3_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d*\.?\d*,-?\d*\.?\d*,-?\d*\.?\d*$").expect("valid vector regex")
});

static VECTOR3_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").expect("valid number regex"));

/// A Unity Vector3, sent to the server as `"x,y,z"`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Parses vectors written as `1,2,3`, `(1, 2, 3)` or `Vector3(1,2,3)`
    ///
    /// The first three numbers found in the text are used.
    pub fn parse(text: &str) -> Result<Self, UnityMcpError> {
        let text = text.trim();
        let numbers: Vec<&str> = if VECTOR3_EXACT.is_match(text) {
            text.split(',').collect()
        } else {
            // The digit in the type name is not a component
            VECTOR3_NUMBER
                .find_iter(text.trim_start_matches("Vector3"))
                .map(|m| m.as_str())
                .take(3)
                .collect()
        };

        if numbers.len() < 3 {
            return Err(UnityMcpError::InvalidArgument(format!(
                "Cannot read a Vector3 from '{}'",
                text
            )));
        }

        let component = |s: &str| {
            s.parse::<f64>().map_err(|e| {
                UnityMcpError::InvalidArgument(format!(
                    "Invalid Vector3 component '{}' in '{}': {}",
                    s, text, e
                ))
            })
        };

        Ok(Self {
            x: component(numbers[0])?,
            y: component(numbers[1])?,
            z: component(numbers[2])?,
        })
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Vector3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3> for Value {
    fn from(vector: Vector3) -> Self {
        Value::String(vector.to_string())
    }
}

/// Built-in Unity meshes that can be assigned to a MeshFilter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshPrimitive {
    Cube,
    Sphere,
    Cylinder,
    Capsule,
    Plane,
    Quad,
}

impl MeshPrimitive {
    /// Name of the primitive as used in the Unity built-in mesh reference
    pub fn as_str(&self) -> &'static str {
        match self {
            MeshPrimitive::Cube => "cube",
            MeshPrimitive::Sphere => "sphere",
            MeshPrimitive::Cylinder => "cylinder",
            MeshPrimitive::Capsule => "capsule",
            MeshPrimitive::Plane => "plane",
            MeshPrimitive::Quad => "quad",
        }
    }

    /// Parses pseudo component names such as `CubeMesh` or `SphereMesh`
    pub fn from_component_name(name: &str) -> Option<Self> {
        let primitive = name.strip_suffix("Mesh")?;
        match primitive.to_lowercase().as_str() {
            "cube" => Some(MeshPrimitive::Cube),
            "sphere" => Some(MeshPrimitive::Sphere),
            "cylinder" => Some(MeshPrimitive::Cylinder),
            "capsule" => Some(MeshPrimitive::Capsule),
            "plane" => Some(MeshPrimitive::Plane),
            "quad" => Some(MeshPrimitive::Quad),
            _ => None,
        }
    }

    /// Value for `MeshFilter.mesh` that makes the server load this built-in mesh
    pub fn mesh_reference(&self) -> String {
        format!(
            "UnityEngine.Mesh, UnityEngine.CoreModule:UnityEngine.{}",
            self.as_str()
        )
    }
}

/// Failures talking to the Unity MCP server
#[derive(Debug, thiserror::Error)]
pub enum CommunicationError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Invalid JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Errors returned by the Unity MCP client
#[derive(Debug, thiserror::Error)]
pub enum UnityMcpError {
    #[error("Request to MCP server failed: {0}")]
    Communication(#[from] CommunicationError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),
    #[error("Invalid client config: {0}")]
    InvalidConfig(String),
}

impl UnityMcpError {
    pub fn is_communication_error(&self) -> bool {
        matches!(self, UnityMcpError::Communication(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_command_names_are_unique() {
        let names: HashSet<&str> = Command::ALL.iter().map(Command::as_str).collect();
        assert_eq!(names.len(), Command::ALL.len());
        assert_eq!(Command::CreateGameObject.to_string(), "create_gameobject");
    }

    #[test]
    fn test_all_commands_use_root_endpoint() {
        for command in Command::ALL {
            assert_eq!(command.path(), "/");
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = CommandRequest::new(Command::CreateGameObject)
            .with("objectName", "Cube")
            .with_optional("parentName", None);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"command": "create_gameobject", "parameters": {"objectName": "Cube"}})
        );
    }

    #[test]
    fn test_optional_parameter_skipped_when_empty() {
        let request = CommandRequest::new(Command::CreateScriptAsset).with_optional("folderPath", Some(""));
        assert!(request.parameters.is_empty());

        let request = CommandRequest::new(Command::CreateScriptAsset)
            .with_optional("folderPath", Some("Assets/Scripts"));
        assert_eq!(request.parameters["folderPath"], json!("Assets/Scripts"));
    }

    #[test]
    fn test_response_succeeded() {
        let ok: CommandResponse = serde_json::from_value(json!({"success": true})).unwrap();
        let failed: CommandResponse = serde_json::from_value(json!({"success": false, "error": "nope"})).unwrap();
        let unrelated: CommandResponse = serde_json::from_value(json!({"status": "ok"})).unwrap();

        assert!(response_succeeded(&ok));
        assert!(!response_succeeded(&failed));
        assert!(!response_succeeded(&unrelated));
    }

    #[test]
    fn test_vector3_parse_formats() {
        assert_eq!(Vector3::parse("1,2,3").unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Vector3::parse("(10, 1, 10)").unwrap(), Vector3::new(10.0, 1.0, 10.0));
        assert_eq!(Vector3::parse("Vector3(-1.5,0,2.25)").unwrap(), Vector3::new(-1.5, 0.0, 2.25));
        assert!(Vector3::parse("1,2").is_err());
        assert!(Vector3::parse("up").is_err());
    }

    #[test]
    fn test_vector3_keeps_large_integers() {
        let vector = Vector3::parse("16777217,0,0").unwrap();
        assert_eq!(vector.to_string(), "16777217,0,0");
    }

    #[test]
    fn test_vector3_display() {
        assert_eq!(Vector3::new(1.0, 2.5, -3.0).to_string(), "1,2.5,-3");
        assert_eq!(Value::from(Vector3::from([0.0, 1.0, 0.0])), json!("0,1,0"));
    }

    #[test]
    fn test_mesh_primitive_from_component_name() {
        assert_eq!(MeshPrimitive::from_component_name("CubeMesh"), Some(MeshPrimitive::Cube));
        assert_eq!(MeshPrimitive::from_component_name("CapsuleMesh"), Some(MeshPrimitive::Capsule));
        assert_eq!(MeshPrimitive::from_component_name("Rigidbody"), None);
        assert_eq!(MeshPrimitive::from_component_name("TorusMesh"), None);
        assert_eq!(
            MeshPrimitive::Sphere.mesh_reference(),
            "UnityEngine.Mesh, UnityEngine.CoreModule:UnityEngine.sphere"
        );
    }

    #[test]
    fn test_communication_error_classification() {
        let error: UnityMcpError = CommunicationError::HttpStatus {
            status: 500,
            body: String::new(),
        }
        .into();
        assert!(error.is_communication_error());
        assert!(!UnityMcpError::InvalidArgument("x".to_string()).is_communication_error());
    }
}
