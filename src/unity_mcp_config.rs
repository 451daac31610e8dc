use crate::unity_mcp_messages::UnityMcpError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default address of the Unity MCP server
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Default per-request transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Base address of the Unity MCP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    scheme: String,
    host: String,
    port: u16,
}

impl ServerAddress {
    /// Creates an address from its parts
    ///
    /// # Arguments
    ///
    /// * `scheme` - Either `http` or `https`
    /// * `host` - Host name or IP address of the machine running Unity
    /// * `port` - Port the MCP server listens on
    pub fn new(scheme: &str, host: &str, port: u16) -> Result<Self, UnityMcpError> {
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(UnityMcpError::InvalidAddress(format!(
                "Unsupported scheme '{}', expected http or https",
                scheme
            )));
        }
        let host = host.trim();
        if host.is_empty() {
            return Err(UnityMcpError::InvalidAddress("Host is empty".to_string()));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(UnityMcpError::InvalidAddress(format!(
                "Host '{}' contains whitespace",
                host
            )));
        }

        // IPv6 literals need brackets to be usable in a URL
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]", host)
        } else {
            host.to_string()
        };

        Ok(Self { scheme, host, port })
    }

    /// Parses a base URL such as `http://127.0.0.1:8080/`
    ///
    /// Trailing slashes are ignored and a missing port falls back to the scheme default.
    pub fn parse(base_url: &str) -> Result<Self, UnityMcpError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| UnityMcpError::InvalidAddress(format!("'{}': {}", base_url, e)))?;

        if url.path() != "/" && !url.path().is_empty() {
            return Err(UnityMcpError::InvalidAddress(format!(
                "'{}' must not contain a path",
                base_url
            )));
        }

        let host = url
            .host_str()
            .ok_or_else(|| UnityMcpError::InvalidAddress(format!("'{}' has no host", base_url)))?;
        let port = url.port_or_known_default().ok_or_else(|| {
            UnityMcpError::InvalidAddress(format!("'{}' has no port", base_url))
        })?;

        Self::new(url.scheme(), host, port)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Full URL of an endpoint on the server
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self, path.trim_start_matches('/'))
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl Serialize for ServerAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ServerAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        ServerAddress::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Settings fixed for the lifetime of a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address of the Unity MCP server
    pub address: ServerAddress,
    /// Transport timeout applied to each request
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: ServerAddress::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with the default timeout
    pub fn with_base_url(base_url: &str) -> Result<Self, UnityMcpError> {
        Ok(Self {
            address: ServerAddress::parse(base_url)?,
            ..Self::default()
        })
    }

    /// Checks that a client built from this configuration can send requests
    pub fn validate(&self) -> Result<(), UnityMcpError> {
        if self.timeout_secs == 0 {
            return Err(UnityMcpError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reads a configuration from YAML text
    ///
    /// ```yaml
    /// address: "http://127.0.0.1:8080"
    /// timeout_secs: 5
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, UnityMcpError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| UnityMcpError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, UnityMcpError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            UnityMcpError::InvalidConfig(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address() {
        let address = ServerAddress::default();
        assert_eq!(address.to_string(), DEFAULT_BASE_URL);
        assert_eq!(ServerAddress::parse(DEFAULT_BASE_URL).unwrap(), address);
    }

    #[test]
    fn test_parse_strips_trailing_slash() {
        let address = ServerAddress::parse("http://localhost:9000///").unwrap();
        assert_eq!(address.host(), "localhost");
        assert_eq!(address.port(), 9000);
        assert_eq!(address.endpoint("/"), "http://localhost:9000/");
    }

    #[test]
    fn test_parse_uses_scheme_default_port() {
        let address = ServerAddress::parse("https://unity.example.com").unwrap();
        assert_eq!(address.scheme(), "https");
        assert_eq!(address.port(), 443);
    }

    #[test]
    fn test_parse_rejects_bad_addresses() {
        assert!(ServerAddress::parse("not a url").is_err());
        assert!(ServerAddress::parse("ftp://127.0.0.1:21").is_err());
        assert!(ServerAddress::parse("http://127.0.0.1:8080/api").is_err());
        assert!(ServerAddress::new("http", "  ", 8080).is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let config = ClientConfig::from_yaml_str("address: \"http://10.0.0.5:8181\"\ntimeout_secs: 12\n").unwrap();
        assert_eq!(config.address.host(), "10.0.0.5");
        assert_eq!(config.address.port(), 8181);
        assert_eq!(config.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_config_from_yaml_uses_defaults_for_missing_fields() {
        let config = ClientConfig::from_yaml_str("timeout_secs: 2\n").unwrap();
        assert_eq!(config.address, ServerAddress::default());
        assert_eq!(config.timeout_secs, 2);

        assert!(ClientConfig::from_yaml_str("address: \"gopher://x\"\n").is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = ClientConfig::from_yaml_str("address: \"http://127.0.0.1:8080\"\ntimeout_secs: 0\n");
        assert!(matches!(result, Err(UnityMcpError::InvalidConfig(_))));

        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(UnityMcpError::InvalidConfig(_))));
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let address = ServerAddress::new("http", "::1", 8080).unwrap();
        assert_eq!(address.host(), "[::1]");
        assert_eq!(address.endpoint("/"), "http://[::1]:8080/");

        let parsed = ServerAddress::parse("http://[::1]:8080").unwrap();
        assert_eq!(parsed, address);
        assert!(Url::parse(&address.endpoint("/")).is_ok());
    }

    #[test]
    fn test_host_with_inner_whitespace_is_rejected() {
        assert!(matches!(
            ServerAddress::new("http", "unity host", 8080),
            Err(UnityMcpError::InvalidAddress(_))
        ));
        assert_eq!(ServerAddress::new("http", " localhost ", 80).unwrap().host(), "localhost");
    }

    #[test]
    fn test_config_from_yaml_file() {
        let path = std::env::temp_dir().join(format!("unity_mcp_client_config_{}.yaml", std::process::id()));
        std::fs::write(&path, "address: \"http://10.1.2.3:7000\"\ntimeout_secs: 9\n").expect("Failed to write config file");

        let result = ClientConfig::from_yaml_file(&path);
        std::fs::remove_file(&path).expect("Failed to delete config file");

        let config = result.unwrap();
        assert_eq!(config.address.to_string(), "http://10.1.2.3:7000");
        assert_eq!(config.timeout_secs, 9);
    }

    #[test]
    fn test_config_from_missing_file() {
        let path = std::env::temp_dir().join("unity_mcp_client_missing").join("config.yaml");
        assert!(matches!(
            ClientConfig::from_yaml_file(&path),
            Err(UnityMcpError::InvalidConfig(_))
        ));
    }
}
