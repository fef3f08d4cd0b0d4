// crates.io
use httpmock::prelude::*;
// self
use auth0_relay::{Auth0Client, Client, config::EndpointConfig};

#[allow(dead_code)]
pub const CLIENT_ID: &str = "relay-client";
#[allow(dead_code)]
pub const CLIENT_SECRET: &str = "relay-secret";
#[allow(dead_code)]
pub const GRANT_BODY: &str =
	"{\"access_token\":\"abc123\",\"token_type\":\"Bearer\",\"expires_in\":3600,\"scope\":\"read:users\"}";

/// Management API config whose token and resource endpoints live on `server`.
#[allow(dead_code)]
pub fn management_config(server: &MockServer) -> EndpointConfig {
	EndpointConfig::new(
		server.base_url(),
		CLIENT_ID,
		CLIENT_SECRET,
		"https://tenant.auth0.com/api/v2/",
		server.url("/api/v2"),
	)
}

/// Authorization Extension config whose token and resource endpoints live on `server`.
#[allow(dead_code)]
pub fn extension_config(server: &MockServer) -> EndpointConfig {
	EndpointConfig::new(
		server.base_url(),
		CLIENT_ID,
		CLIENT_SECRET,
		"urn:auth0-authz-api",
		server.url("/ext"),
	)
}

/// Builds a reqwest-backed client with both endpoints pointed at `server`.
#[allow(dead_code)]
pub fn build_client(server: &MockServer) -> Auth0Client {
	Client::builder()
		.management_config(management_config(server))
		.authorization_extension_config(extension_config(server))
		.build()
		.expect("Client should build against the mock server.")
}
