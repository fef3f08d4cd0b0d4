//! Authenticated JSON calls against one remote API.
//!
//! An [`Endpoint`] joins the resource path onto its base URL, serializes the body, asks its
//! [`TokenManager`] for a non-stale token, and sends through the [`RequestGate`]. Responses are
//! decoded into the type chosen by the caller; non-2xx statuses become [`ApiError`]s.

// crates.io
use ::http::{HeaderMap, Method, StatusCode};
// self
use crate::{
	_prelude::*,
	config::{ApiKind, EndpointConfig},
	error::{ApiError, TransportError},
	gate::RequestGate,
	http::{self, HttpResponse, HttpTransport},
	obs::{self, CallKind},
	token::TokenManager,
};

/// Error body returned by the management and authorization-extension APIs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
	message: String,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_code: Option<String>,
}

/// One configured remote API: its configuration, token manager, transport, and gate.
pub struct Endpoint<C>
where
	C: ?Sized + HttpTransport,
{
	api: ApiKind,
	config: Arc<EndpointConfig>,
	tokens: TokenManager<C>,
	transport: Arc<C>,
	gate: Arc<RequestGate>,
}
impl<C> Endpoint<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an endpoint with a fresh (unset) token manager.
	pub fn new(
		api: ApiKind,
		config: EndpointConfig,
		transport: Arc<C>,
		gate: Arc<RequestGate>,
	) -> Self {
		let config = Arc::new(config);
		let tokens = TokenManager::new(api, config.clone(), transport.clone(), gate.clone());

		Self { api, config, tokens, transport, gate }
	}

	/// Which remote API this endpoint talks to.
	pub fn api(&self) -> ApiKind {
		self.api
	}

	/// Immutable endpoint configuration.
	pub fn config(&self) -> &EndpointConfig {
		&self.config
	}

	/// Token manager owning this endpoint's cached token.
	pub fn tokens(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Gate this endpoint sends through.
	pub fn gate(&self) -> &Arc<RequestGate> {
		&self.gate
	}

	/// Performs one authenticated exchange.
	///
	/// Returns `Ok(None)` for `204 No Content` and `Ok(Some(_))` for any other 2xx response.
	/// Use [`serde::de::IgnoredAny`] as `T` when the response body is irrelevant.
	pub async fn send<B, T>(
		&self,
		method: Method,
		path: &str,
		extra_headers: HeaderMap,
		body: Option<&B>,
	) -> Result<Option<T>>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		obs::observe(CallKind::Resource, self.api, self.send_inner(method, path, extra_headers, body))
			.await
	}

	/// `GET {path}`.
	pub async fn get<T>(&self, path: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		self.send::<(), T>(Method::GET, path, HeaderMap::new(), None).await
	}

	/// `POST {path}` with a JSON body.
	pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		self.send(Method::POST, path, HeaderMap::new(), Some(body)).await
	}

	/// `PATCH {path}` with a JSON body.
	pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		self.send(Method::PATCH, path, HeaderMap::new(), Some(body)).await
	}

	/// `DELETE {path}` with an optional JSON body.
	pub async fn delete<B, T>(&self, path: &str, body: Option<&B>) -> Result<Option<T>>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		self.send(Method::DELETE, path, HeaderMap::new(), body).await
	}

	async fn send_inner<B, T>(
		&self,
		method: Method,
		path: &str,
		extra_headers: HeaderMap,
		body: Option<&B>,
	) -> Result<Option<T>>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		let url = http::parse_url(&self.config.resource_url(path))?;
		let payload = body.map(serde_json::to_vec).transpose().map_err(TransportError::Serialize)?;
		let token = self.tokens.ensure_valid().await?;
		let request = http::build_request(method, &url, extra_headers, Some(&token), payload)?;
		let response = self.gate.run(self.transport.execute(request)).await?;

		decode_response(response)
	}
}
impl<C> Debug for Endpoint<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Endpoint")
			.field("api", &self.api)
			.field("config", &self.config)
			.field("tokens", &self.tokens)
			.finish()
	}
}

fn decode_response<T>(response: HttpResponse) -> Result<Option<T>>
where
	T: DeserializeOwned,
{
	let status = response.status();

	if status.is_success() {
		if status == StatusCode::NO_CONTENT {
			return Ok(None);
		}

		return http::decode_json(response.body())
			.map(Some)
			.map_err(|source| TransportError::Decode { status: status.as_u16(), source }.into());
	}

	let body: ApiErrorBody = http::decode_json(response.body())
		.map_err(|source| TransportError::Decode { status: status.as_u16(), source })?;

	Err(ApiError {
		status: status.as_u16(),
		message: body.message,
		error: body.error,
		error_code: body.error_code,
	}
	.into())
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use serde::de::IgnoredAny;
	// self
	use super::*;
	use crate::{
		error::{ConfigError, Error},
		http::{HttpFuture, HttpRequest},
	};

	#[derive(Default)]
	struct CountingTransport {
		calls: AtomicUsize,
	}
	impl HttpTransport for CountingTransport {
		fn execute(&self, _request: HttpRequest) -> HttpFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Box::pin(async { Ok(response(204, "")) })
		}

		fn for_endpoint(_config: &EndpointConfig) -> Result<Self, ConfigError> {
			Ok(Self::default())
		}
	}

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = StatusCode::from_u16(status).expect("Status should be valid.");

		response
	}

	#[tokio::test]
	async fn bad_url_fails_before_any_grant_exchange() {
		let transport = Arc::new(CountingTransport::default());
		let config = EndpointConfig::new("https://tenant.auth0.com", "cid", "secret", "aud", "not a url");
		let endpoint = Endpoint::new(
			ApiKind::Management,
			config,
			transport.clone(),
			Arc::new(RequestGate::new()),
		);
		let err = endpoint.get::<IgnoredAny>("users/u1").await.expect_err("URL should not parse.");

		assert!(matches!(err, Error::Transport(TransportError::InvalidUrl { .. })));
		assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
		assert!(endpoint.tokens().cached().is_none());
	}

	#[test]
	fn no_content_skips_decoding() {
		let decoded: Option<IgnoredAny> =
			decode_response(response(204, "")).expect("204 should succeed.");

		assert!(decoded.is_none());
	}

	#[test]
	fn success_body_decodes_into_target() {
		#[derive(Debug, Deserialize, PartialEq)]
		struct Group {
			name: String,
		}

		let decoded: Option<Group> = decode_response(response(201, r#"{"name":"admins"}"#))
			.expect("201 should decode.");

		assert_eq!(decoded, Some(Group { name: "admins".into() }));
	}

	#[test]
	fn success_with_undecodable_body_is_a_transport_error() {
		let err = decode_response::<Vec<String>>(response(200, "<html>"))
			.expect_err("Invalid JSON should fail.");

		assert!(matches!(err, Error::Transport(TransportError::Decode { status: 200, .. })));
	}

	#[test]
	fn error_body_maps_to_api_error() {
		let err = decode_response::<IgnoredAny>(response(
			404,
			r#"{"statusCode":404,"error":"Not Found","message":"user u1 not found"}"#,
		))
		.expect_err("404 should fail.");

		match err {
			Error::Api(api) => {
				assert_eq!(api.status, 404);
				assert_eq!(api.message, "user u1 not found");
				assert_eq!(api.error.as_deref(), Some("Not Found"));
				assert_eq!(api.error_code, None);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn error_code_is_preserved() {
		let err = decode_response::<IgnoredAny>(response(
			429,
			r#"{"statusCode":429,"error":"Too Many Requests","message":"Global limit has been reached","errorCode":"too_many_requests"}"#,
		))
		.expect_err("429 should fail.");

		assert!(matches!(
			err,
			Error::Api(ApiError { status: 429, ref error_code, .. })
				if error_code.as_deref() == Some("too_many_requests")
		));
	}

	#[test]
	fn undecodable_error_body_is_a_transport_error() {
		let err = decode_response::<IgnoredAny>(response(502, "Bad Gateway"))
			.expect_err("502 should fail.");

		assert!(matches!(err, Error::Transport(TransportError::Decode { status: 502, .. })));
	}
}
