//! Endpoint configuration consumed by the client builder.
//!
//! Each remote API (management, authorization extension) is described by one immutable
//! [`EndpointConfig`]. Values are usually deserialized by the host application's configuration
//! loader; validation happens when the client is built so a half-configured client never exists.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError, token::TokenSecret};

/// Remote APIs the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiKind {
	/// Auth0 Management API (users).
	Management,
	/// Auth0 Authorization Extension API (groups, memberships).
	AuthorizationExtension,
}
impl ApiKind {
	/// Returns a stable label suitable for span fields, metrics, and errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiKind::Management => "management",
			ApiKind::AuthorizationExtension => "authorization_extension",
		}
	}
}
impl Display for ApiKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable description of one remote API and the credentials used to reach it.
#[derive(Clone, Deserialize)]
pub struct EndpointConfig {
	/// Tenant domain hosting the `/oauth/token` endpoint (e.g. `https://tenant.auth0.com/`).
	pub domain: String,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Audience requested in the client-credentials grant.
	pub audience: String,
	/// Base URL every resource path is appended to.
	pub base_url: String,
	/// Optional TCP connect timeout.
	#[serde(default, rename = "connect_timeout_ms", with = "millis")]
	pub connect_timeout: Option<StdDuration>,
	/// Optional read timeout.
	#[serde(default, rename = "read_timeout_ms", with = "millis")]
	pub read_timeout: Option<StdDuration>,
}
impl EndpointConfig {
	/// Creates a configuration without timeouts.
	pub fn new(
		domain: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		audience: impl Into<String>,
		base_url: impl Into<String>,
	) -> Self {
		Self {
			domain: domain.into(),
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			audience: audience.into(),
			base_url: base_url.into(),
			connect_timeout: None,
			read_timeout: None,
		}
	}

	/// Sets the connect timeout.
	pub fn with_connect_timeout(mut self, timeout: StdDuration) -> Self {
		self.connect_timeout = Some(timeout);

		self
	}

	/// Sets the read timeout.
	pub fn with_read_timeout(mut self, timeout: StdDuration) -> Self {
		self.read_timeout = Some(timeout);

		self
	}

	/// Returns the client-credentials token endpoint, `{domain}/oauth/token`.
	pub fn token_url(&self) -> String {
		join_url(&self.domain, "oauth/token")
	}

	/// Returns the absolute URL for a resource path.
	pub fn resource_url(&self, path: &str) -> String {
		join_url(&self.base_url, path)
	}

	/// Checks that every required field is present and well-formed.
	pub fn validate(&self, api: ApiKind) -> Result<(), ConfigError> {
		let endpoint = api.as_str();

		for (field, value) in [
			("domain", self.domain.as_str()),
			("client_id", self.client_id.as_str()),
			("client_secret", self.client_secret.expose()),
			("audience", self.audience.as_str()),
			("base_url", self.base_url.as_str()),
		] {
			if value.trim().is_empty() {
				return Err(ConfigError::MissingField { endpoint, field });
			}
		}

		validate_url(endpoint, "domain", &self.domain)?;
		validate_url(endpoint, "base_url", &self.base_url)?;

		if self.connect_timeout.is_some_and(|t| t.is_zero()) {
			return Err(ConfigError::ZeroTimeout { endpoint, field: "connect_timeout" });
		}
		if self.read_timeout.is_some_and(|t| t.is_zero()) {
			return Err(ConfigError::ZeroTimeout { endpoint, field: "read_timeout" });
		}

		Ok(())
	}
}
impl Debug for EndpointConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EndpointConfig")
			.field("domain", &self.domain)
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("audience", &self.audience)
			.field("base_url", &self.base_url)
			.field("connect_timeout", &self.connect_timeout)
			.field("read_timeout", &self.read_timeout)
			.finish()
	}
}

/// Joins a base URL and a path with exactly one `/` between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
	let base = base.trim_end_matches('/');
	let path = path.trim_start_matches('/');

	if path.is_empty() { base.to_owned() } else { format!("{base}/{path}") }
}

fn validate_url(endpoint: &'static str, field: &'static str, raw: &str) -> Result<(), ConfigError> {
	let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { endpoint, field, source })?;

	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { endpoint, field, url: raw.to_owned() }),
	}
}

mod millis {
	// std
	use std::time::Duration;
	// crates.io
	use serde::{Deserialize, Deserializer};

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
	}
}
