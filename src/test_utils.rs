use crate::unity_mcp_client::UnityMcpClient;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::Value;

/// Starts a mock Unity MCP server and a client pointed at it
pub fn mock_unity_server() -> (ServerGuard, UnityMcpClient) {
    crate::logging::init_logging();

    let server = Server::new();
    let client = UnityMcpClient::with_base_url(&server.url()).expect("Failed to create client for mock server");
    (server, client)
}

/// Registers a mock that expects exactly one request with the given body and answers with JSON
pub fn expect_command(server: &mut ServerGuard, request_body: Value, response_body: Value) -> Mock {
    server
        .mock("POST", "/")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(request_body))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response_body.to_string())
        .expect(1)
        .create()
}

/// Registers a mock that fails the test if any request reaches the server
pub fn expect_no_requests(server: &mut ServerGuard) -> Mock {
    server.mock("POST", Matcher::Any).expect(0).create()
}

/// Returns a base URL on which nothing is listening
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind a free port");
    let port = listener.local_addr().expect("Failed to read local address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
