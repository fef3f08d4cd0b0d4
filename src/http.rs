//! HTTP transport seam shared by grant exchanges and resource calls.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. Requests and responses are
//! plain [`::http`] values with buffered bodies so custom transports (and test doubles) never
//! need to know about reqwest. Implementations report connection-level failures as
//! [`TransportError`]; status codes are interpreted by the caller.

// crates.io
use ::http::{
	HeaderMap, HeaderValue, Method,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	config::EndpointConfig,
	error::{ConfigError, TransportError},
	token::TokenSecret,
};

/// Request handed to an [`HttpTransport`].
pub type HttpRequest = ::http::Request<Vec<u8>>;
/// Fully buffered response returned by an [`HttpTransport`].
pub type HttpResponse = ::http::Response<Vec<u8>>;
/// Boxed future returned by [`HttpTransport::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP clients able to execute one buffered exchange.
///
/// Implementations must be `Send + Sync + 'static` so a single instance can be shared by both
/// endpoints of a client and by concurrent callers.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the response body.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;

	/// Builds a transport dedicated to one endpoint, honoring its connect/read timeouts.
	///
	/// Used by the client builder when no shared transport was supplied.
	fn for_endpoint(config: &EndpointConfig) -> Result<Self, ConfigError>
	where
		Self: Sized;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Clients built by [`ReqwestTransport::for_endpoint`] do not follow redirects; neither the token
/// endpoint nor the Auth0 APIs delegate responses to another URI.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let url = request.uri().to_string();
			let request = reqwest::Request::try_from(request)
				.map_err(|e| TransportError::network(url.as_str(), e))?;
			let response =
				client.execute(request).await.map_err(|e| TransportError::network(url.as_str(), e))?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(|e| TransportError::network(url.as_str(), e))?;
			let mut buffered = HttpResponse::new(body.to_vec());

			*buffered.status_mut() = status;
			*buffered.headers_mut() = headers;

			Ok(buffered)
		})
	}

	fn for_endpoint(config: &EndpointConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none());

		if let Some(timeout) = config.connect_timeout {
			builder = builder.connect_timeout(timeout);
		}
		if let Some(timeout) = config.read_timeout {
			builder = builder.read_timeout(timeout);
		}

		Ok(Self(builder.build()?))
	}
}

/// Parses a joined request URL.
pub(crate) fn parse_url(url: &str) -> Result<Url, TransportError> {
	Url::parse(url).map_err(|source| TransportError::InvalidUrl { url: url.to_owned(), source })
}

/// Assembles a request with optional bearer token and JSON body.
pub(crate) fn build_request(
	method: Method,
	url: &Url,
	mut headers: HeaderMap,
	bearer: Option<&TokenSecret>,
	body: Option<Vec<u8>>,
) -> Result<HttpRequest, TransportError> {
	if body.is_some() {
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
	}
	if let Some(token) = bearer {
		let mut value = HeaderValue::try_from(token.bearer()).map_err(::http::Error::from)?;

		value.set_sensitive(true);
		headers.insert(AUTHORIZATION, value);
	}

	let mut request =
		::http::Request::builder().method(method).uri(url.as_str()).body(body.unwrap_or_default())?;

	*request.headers_mut() = headers;

	Ok(request)
}

/// Decodes a JSON body, recording the path of the first mismatch.
pub(crate) fn decode_json<T>(body: &[u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}
