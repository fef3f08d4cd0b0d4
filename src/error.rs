//! Client-level error types shared across the token manager, the request gate, and endpoints.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected while building the client.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Client-credentials grant failed; no resource call was attempted.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Connection or (de)serialization failure around a resource call.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Remote API answered with a non-2xx status.
	#[error(transparent)]
	Api(#[from] ApiError),
}
impl Error {
	/// Returns the HTTP status reported by the remote API, if the failure carries one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api(err) => Some(err.status),
			Self::Auth(AuthError::Rejected { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while assembling a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// An endpoint was never configured on the builder.
	#[error("The {endpoint} endpoint is not configured.")]
	MissingEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
	},
	/// A required endpoint field is empty.
	#[error("The {endpoint} endpoint is missing `{field}`.")]
	MissingField {
		/// Endpoint label.
		endpoint: &'static str,
		/// Field name.
		field: &'static str,
	},
	/// An endpoint URL field cannot be parsed.
	#[error("The {endpoint} endpoint has an invalid `{field}` URL.")]
	InvalidUrl {
		/// Endpoint label.
		endpoint: &'static str,
		/// Field name.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// An endpoint URL uses a scheme other than HTTP(S).
	#[error("The {endpoint} endpoint `{field}` must use http or https: {url}.")]
	UnsupportedScheme {
		/// Endpoint label.
		endpoint: &'static str,
		/// Field name.
		field: &'static str,
		/// Offending URL.
		url: String,
	},
	/// A timeout was configured as zero.
	#[error("The {endpoint} endpoint `{field}` must be greater than zero.")]
	ZeroTimeout {
		/// Endpoint label.
		endpoint: &'static str,
		/// Field name.
		field: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures of the OAuth client-credentials grant exchange.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint could not be reached or the request could not be built.
	#[error("Token endpoint could not be reached.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Token endpoint rejected the grant.
	#[error("Token endpoint rejected the grant with status {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Provider-supplied description, or a preview of the body.
		message: String,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned a malformed response.")]
	MalformedResponse {
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// Token endpoint response carried an empty `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Token endpoint response carried a zero or negative `expires_in`.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl From<TransportError> for AuthError {
	fn from(source: TransportError) -> Self {
		Self::Transport { source }
	}
}

/// Transport-level failures (network, URLs, JSON encoding/decoding).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure (connect, TLS, timeout).
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Target URL.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request URL could not be assembled.
	#[error("Request URL `{url}` is invalid.")]
	InvalidUrl {
		/// Joined URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	Request(#[from] ::http::Error),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Serialize(#[source] serde_json::Error),
	/// Response body could not be decoded.
	#[error("Response body with status {status} could not be decoded.")]
	Decode {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// Response carried no content where a body was required.
	#[error("Response to `{path}` had no content.")]
	EmptyBody {
		/// Resource path that was called.
		path: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { url: url.into(), source: Box::new(src) }
	}
}

/// Non-2xx response from the management or authorization-extension API.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Remote API responded with status {status}: {message}.")]
pub struct ApiError {
	/// HTTP status code of the response.
	pub status: u16,
	/// Human-readable message from the error body.
	pub message: String,
	/// Short error label (e.g. `Not Found`).
	pub error: Option<String>,
	/// Provider-specific error code, when present.
	pub error_code: Option<String>,
}
