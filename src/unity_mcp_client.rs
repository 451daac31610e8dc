use crate::unity_mcp_config::{ClientConfig, ServerAddress};
use crate::unity_mcp_messages::{
    Command, CommandRequest, CommandResponse, CommunicationError, MeshPrimitive, UnityMcpError,
    Vector3, response_succeeded,
};
use crate::{debug_log, error_log, warn_log};
use serde_json::{Map, Value};

/// Client for the HTTP command server running inside the Unity Editor
///
/// Every method issues a single blocking request and returns the server's JSON object
/// unchanged. Domain failures reported by the server (e.g. `"success": false`) are
/// part of the returned response, not errors.
pub struct UnityMcpClient {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl UnityMcpClient {
    /// Creates a client for the default server address `http://127.0.0.1:8080`
    pub fn new() -> Result<Self, UnityMcpError> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client for the given base URL
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the MCP server, e.g. `http://127.0.0.1:8080`
    pub fn with_base_url(base_url: &str) -> Result<Self, UnityMcpError> {
        Self::with_config(ClientConfig::with_base_url(base_url)?)
    }

    /// Creates a client from a full configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, UnityMcpError> {
        config.validate()?;

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(CommunicationError::from)?;

        debug_log!(
            "Created Unity MCP client for {} (timeout {:?})",
            config.address,
            config.timeout()
        );

        Ok(Self { config, http })
    }

    /// Gets the server address this client talks to
    pub fn server_address(&self) -> &ServerAddress {
        &self.config.address
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a command with the given parameters and returns the server's JSON object
    ///
    /// # Arguments
    ///
    /// * `command` - The command to execute
    /// * `parameters` - Named arguments, serialized as the `parameters` object of the request
    ///
    /// # Returns
    ///
    /// The parsed response body, or `UnityMcpError::Communication` if the server could not
    /// be reached, answered with a non-success status, or did not return a JSON object
    pub fn send(
        &self,
        command: Command,
        parameters: Map<String, Value>,
    ) -> Result<CommandResponse, UnityMcpError> {
        self.send_request(
            command,
            &CommandRequest {
                command: command.as_str().to_string(),
                parameters,
            },
        )
    }

    fn send_request(
        &self,
        command: Command,
        request: &CommandRequest,
    ) -> Result<CommandResponse, UnityMcpError> {
        if log::log_enabled!(log::Level::Debug) {
            debug_log!(
                "Sending Unity MCP command: {} with parameters: {}",
                command,
                parameters_for_log(&request.parameters)
            );
        }

        match self.exchange(command, request) {
            Ok(response) => Ok(response),
            Err(e) => {
                error_log!("Unity MCP command {} failed: {}", command, e);
                Err(e.into())
            }
        }
    }

    /// Performs the HTTP round trip for a single request
    fn exchange(
        &self,
        command: Command,
        request: &CommandRequest,
    ) -> Result<CommandResponse, CommunicationError> {
        let url = self.config.address.endpoint(command.path());
        let response = self.http.post(&url).json(request).send()?;
        let status = response.status();
        let body = response.text()?;

        debug_log!("Unity MCP server answered {} with HTTP {}", command, status);

        if !status.is_success() {
            return Err(CommunicationError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        // Some commands answer with an empty body
        if body.trim().is_empty() {
            return Ok(CommandResponse::new());
        }

        match serde_json::from_str::<Value>(&body)? {
            Value::Object(map) => Ok(map),
            other => Err(CommunicationError::UnexpectedResponse(format!(
                "expected a JSON object, got: {}",
                other
            ))),
        }
    }

    /// Lists the paths of all scenes in the project
    pub fn get_all_scenes(&self) -> Result<CommandResponse, UnityMcpError> {
        self.send_request(Command::GetAllScenes, &CommandRequest::new(Command::GetAllScenes))
    }

    /// Lists all GameObjects in the active scene
    pub fn get_all_gameobjects_in_scene(&self) -> Result<CommandResponse, UnityMcpError> {
        self.send_request(
            Command::GetAllGameObjectsInScene,
            &CommandRequest::new(Command::GetAllGameObjectsInScene),
        )
    }

    /// Creates a GameObject in the active scene
    ///
    /// # Arguments
    ///
    /// * `object_name` - Name of the new GameObject
    /// * `parent_name` - Optional name of an existing GameObject to parent it under
    pub fn create_gameobject(
        &self,
        object_name: &str,
        parent_name: Option<&str>,
    ) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("object_name", object_name)?;

        let request = CommandRequest::new(Command::CreateGameObject)
            .with("objectName", object_name)
            .with_optional("parentName", parent_name);
        self.send_request(Command::CreateGameObject, &request)
    }

    /// Deletes a GameObject from the active scene
    pub fn delete_gameobject(&self, gameobject_name: &str) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("gameobject_name", gameobject_name)?;

        let request = CommandRequest::new(Command::DeleteGameObject).with("name", gameobject_name);
        self.send_request(Command::DeleteGameObject, &request)
    }

    /// Finds all GameObjects with the given tag
    pub fn find_gameobjects_by_tag(&self, tag: &str) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("tag", tag)?;

        let request = CommandRequest::new(Command::FindGameObjectsByTag).with("tag", tag);
        self.send_request(Command::FindGameObjectsByTag, &request)
    }

    /// Adds a component (e.g. `Rigidbody`) to a GameObject
    ///
    /// The type name is sent as given; use [`UnityMcpClient::add_primitive_mesh`] for
    /// built-in meshes.
    pub fn add_component(
        &self,
        gameobject_name: &str,
        component_type_name: &str,
    ) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("gameobject_name", gameobject_name)?;
        require_non_empty("component_type_name", component_type_name)?;

        let request = CommandRequest::new(Command::AddComponent)
            .with("gameObjectName", gameobject_name)
            .with("componentTypeName", component_type_name);
        self.send_request(Command::AddComponent, &request)
    }

    /// Lists the components attached to a GameObject
    pub fn get_all_components(&self, gameobject_name: &str) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("gameobject_name", gameobject_name)?;

        let request =
            CommandRequest::new(Command::GetAllComponents).with("gameObjectName", gameobject_name);
        self.send_request(Command::GetAllComponents, &request)
    }

    /// Removes a component from a GameObject
    pub fn remove_component(
        &self,
        gameobject_name: &str,
        component_name: &str,
    ) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("gameobject_name", gameobject_name)?;
        require_non_empty("component_name", component_name)?;

        let request = CommandRequest::new(Command::RemoveComponent)
            .with("gameObjectName", gameobject_name)
            .with("componentName", component_name);
        self.send_request(Command::RemoveComponent, &request)
    }

    /// Sets a property on a component attached to a GameObject
    ///
    /// # Arguments
    ///
    /// * `gameobject_name` - Name of the GameObject
    /// * `component_type` - Component type name, e.g. `Rigidbody`
    /// * `property_name` - Property to set, e.g. `mass`
    /// * `value` - New value, sent without conversion
    pub fn set_component_property(
        &self,
        gameobject_name: &str,
        component_type: &str,
        property_name: &str,
        value: impl Into<Value>,
    ) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("gameobject_name", gameobject_name)?;
        require_non_empty("component_type", component_type)?;
        require_non_empty("property_name", property_name)?;

        let request = CommandRequest::new(Command::SetComponentProperty)
            .with("gameObjectName", gameobject_name)
            .with("componentType", component_type)
            .with("propertyName", property_name)
            .with("value", value);
        self.send_request(Command::SetComponentProperty, &request)
    }

    /// Sets a vector property of a GameObject's Transform, e.g. `position` or `scale`
    ///
    /// `scale` is an alias for `localScale`. The vector is sent as `"x,y,z"`.
    pub fn set_transform_vector(
        &self,
        gameobject_name: &str,
        property_name: &str,
        vector: impl Into<Vector3>,
    ) -> Result<CommandResponse, UnityMcpError> {
        let property_name = if property_name.eq_ignore_ascii_case("scale") {
            "localScale"
        } else {
            property_name
        };

        let vector: Vector3 = vector.into();
        self.set_component_property(gameobject_name, "Transform", property_name, Value::from(vector))
    }

    /// Gives a GameObject a built-in mesh
    ///
    /// Adds a MeshFilter and a MeshRenderer, then assigns the mesh. Stops at the first step
    /// the server does not report as successful and returns that step's response.
    pub fn add_primitive_mesh(
        &self,
        gameobject_name: &str,
        primitive: MeshPrimitive,
    ) -> Result<CommandResponse, UnityMcpError> {
        for component in ["MeshFilter", "MeshRenderer"] {
            let response = self.add_component(gameobject_name, component)?;
            if !response_succeeded(&response) {
                warn_log!(
                    "Adding {} to '{}' was not successful, not assigning {:?} mesh",
                    component,
                    gameobject_name,
                    primitive
                );
                return Ok(response);
            }
        }

        self.set_component_property(gameobject_name, "MeshFilter", "mesh", primitive.mesh_reference())
    }

    /// Lists all prefabs in the project
    pub fn get_all_prefabs(&self) -> Result<CommandResponse, UnityMcpError> {
        self.send_request(Command::GetAllPrefabs, &CommandRequest::new(Command::GetAllPrefabs))
    }

    /// Instantiates a prefab into the active scene
    ///
    /// # Arguments
    ///
    /// * `prefab_path` - Asset path of the prefab, e.g. `Assets/Prefabs/Enemy.prefab`
    pub fn instantiate_prefab(&self, prefab_path: &str) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("prefab_path", prefab_path)?;

        let request = CommandRequest::new(Command::InstantiatePrefab).with("prefabPath", prefab_path);
        self.send_request(Command::InstantiatePrefab, &request)
    }

    /// Creates a C# script asset
    ///
    /// # Arguments
    ///
    /// * `script_name` - File name of the script without the `.cs` extension
    /// * `script_content` - Full source text of the script
    /// * `folder_path` - Optional target folder; the server defaults to `Assets/MCP/Scripts`
    pub fn create_script_asset(
        &self,
        script_name: &str,
        script_content: &str,
        folder_path: Option<&str>,
    ) -> Result<CommandResponse, UnityMcpError> {
        require_non_empty("script_name", script_name)?;

        let request = CommandRequest::new(Command::CreateScriptAsset)
            .with("scriptName", script_name)
            .with("scriptContent", script_content)
            .with_optional("folderPath", folder_path);
        self.send_request(Command::CreateScriptAsset, &request)
    }
}

/// Longest serialized argument value written to the debug log as is
const MAX_LOGGED_VALUE_LEN: usize = 100;

/// Renders request parameters for logging, eliding long argument values such as script content
fn parameters_for_log(parameters: &Map<String, Value>) -> String {
    let entries: Vec<String> = parameters
        .iter()
        .map(|(key, value)| {
            let rendered = value.to_string();
            if rendered.len() < MAX_LOGGED_VALUE_LEN {
                format!("{}={}", key, rendered)
            } else {
                format!("{}=<{} chars omitted>", key, rendered.len())
            }
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn require_non_empty(name: &str, value: &str) -> Result<(), UnityMcpError> {
    if value.trim().is_empty() {
        return Err(UnityMcpError::InvalidArgument(format!("{} must not be empty", name)));
    }
    Ok(())
}

#[cfg(test)]
#[path = "unity_mcp_client_tests.rs"]
mod unity_mcp_client_tests;
