//! Client facade and builder.
//!
//! [`ClientBuilder`] collects the configuration of both Auth0 APIs, validates it, and assembles a
//! [`Client`] whose endpoints share one [`RequestGate`] (or one gate each, see [`GateScope`]).
//! The client is cheap to clone; clones share token caches and gates.

// self
use crate::{
	_prelude::*,
	config::{ApiKind, EndpointConfig},
	endpoint::Endpoint,
	error::ConfigError,
	gate::{GateScope, RequestGate},
	http::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type Auth0Client = Client<ReqwestTransport>;

/// Facade over the management and authorization-extension APIs.
pub struct Client<C>
where
	C: ?Sized + HttpTransport,
{
	inner: Arc<ClientInner<C>>,
}
struct ClientInner<C>
where
	C: ?Sized + HttpTransport,
{
	management: Endpoint<C>,
	authorization_extension: Endpoint<C>,
}
impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Management API endpoint (users).
	pub fn management(&self) -> &Endpoint<C> {
		&self.inner.management
	}

	/// Authorization Extension API endpoint (groups).
	pub fn authorization_extension(&self) -> &Endpoint<C> {
		&self.inner.authorization_extension
	}

	/// Looks up an endpoint by kind.
	pub fn endpoint(&self, api: ApiKind) -> &Endpoint<C> {
		match api {
			ApiKind::Management => self.management(),
			ApiKind::AuthorizationExtension => self.authorization_extension(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Starts a builder that provisions one reqwest client per endpoint.
	pub fn builder() -> ClientBuilder<ReqwestTransport> {
		ClientBuilder::new()
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone() }
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("management", &self.inner.management)
			.field("authorization_extension", &self.inner.authorization_extension)
			.finish()
	}
}

/// Builder enforcing that both endpoints are fully configured before a [`Client`] exists.
pub struct ClientBuilder<C>
where
	C: HttpTransport,
{
	management: Option<EndpointConfig>,
	authorization_extension: Option<EndpointConfig>,
	transport: Option<Arc<C>>,
	gate_scope: GateScope,
}
#[cfg(feature = "reqwest")]
impl ClientBuilder<ReqwestTransport> {
	/// Creates a builder that builds a dedicated reqwest client per endpoint, honoring each
	/// endpoint's timeouts.
	pub fn new() -> Self {
		Self::default()
	}
}
impl<C> ClientBuilder<C>
where
	C: HttpTransport,
{
	/// Creates a builder whose endpoints share the provided transport.
	///
	/// Endpoint timeouts are the transport's responsibility in this mode.
	pub fn with_transport(transport: impl Into<Arc<C>>) -> Self {
		Self { transport: Some(transport.into()), ..Self::default() }
	}

	/// Configures the Management API.
	pub fn management_api(
		self,
		domain: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		audience: impl Into<String>,
		base_url: impl Into<String>,
	) -> Self {
		self.management_config(EndpointConfig::new(
			domain,
			client_id,
			client_secret,
			audience,
			base_url,
		))
	}

	/// Configures the Management API from a prepared [`EndpointConfig`].
	pub fn management_config(mut self, config: EndpointConfig) -> Self {
		self.management = Some(config);

		self
	}

	/// Configures the Authorization Extension API.
	pub fn authorization_extension_api(
		self,
		domain: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		audience: impl Into<String>,
		base_url: impl Into<String>,
	) -> Self {
		self.authorization_extension_config(EndpointConfig::new(
			domain,
			client_id,
			client_secret,
			audience,
			base_url,
		))
	}

	/// Configures the Authorization Extension API from a prepared [`EndpointConfig`].
	pub fn authorization_extension_config(mut self, config: EndpointConfig) -> Self {
		self.authorization_extension = Some(config);

		self
	}

	/// Overrides how request gates are shared (defaults to [`GateScope::Shared`]).
	pub fn gate_scope(mut self, scope: GateScope) -> Self {
		self.gate_scope = scope;

		self
	}

	/// Validates the configuration and assembles the client.
	pub fn build(self) -> Result<Client<C>> {
		let management = take_config(self.management, ApiKind::Management)?;
		let authorization_extension =
			take_config(self.authorization_extension, ApiKind::AuthorizationExtension)?;
		let shared_gate = Arc::new(RequestGate::new());
		let gate_for = || match self.gate_scope {
			GateScope::Shared => shared_gate.clone(),
			GateScope::PerEndpoint => Arc::new(RequestGate::new()),
		};
		let transport_for = |config: &EndpointConfig| -> Result<Arc<C>, ConfigError> {
			match &self.transport {
				Some(transport) => Ok(transport.clone()),
				None => C::for_endpoint(config).map(Arc::new),
			}
		};
		let management_transport = transport_for(&management)?;
		let management = Endpoint::new(
			ApiKind::Management,
			management,
			management_transport,
			gate_for(),
		);
		let extension_transport = transport_for(&authorization_extension)?;
		let authorization_extension = Endpoint::new(
			ApiKind::AuthorizationExtension,
			authorization_extension,
			extension_transport,
			gate_for(),
		);

		#[cfg(feature = "tracing")]
		tracing::debug!(gate_scope = ?self.gate_scope, "built auth0 client");

		Ok(Client { inner: Arc::new(ClientInner { management, authorization_extension }) })
	}
}
impl<C> Default for ClientBuilder<C>
where
	C: HttpTransport,
{
	fn default() -> Self {
		Self {
			management: None,
			authorization_extension: None,
			transport: None,
			gate_scope: GateScope::default(),
		}
	}
}
impl<C> Debug for ClientBuilder<C>
where
	C: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientBuilder")
			.field("management", &self.management)
			.field("authorization_extension", &self.authorization_extension)
			.field("shared_transport", &self.transport.is_some())
			.field("gate_scope", &self.gate_scope)
			.finish()
	}
}

fn take_config(config: Option<EndpointConfig>, api: ApiKind) -> Result<EndpointConfig, ConfigError> {
	let config = config.ok_or(ConfigError::MissingEndpoint { endpoint: api.as_str() })?;

	config.validate(api)?;

	Ok(config)
}
