//! OAuth 2.0 client-credentials grant exchange against `{domain}/oauth/token`.

// crates.io
use ::http::Method;
// self
use crate::{
	_prelude::*,
	config::EndpointConfig,
	error::{AuthError, TransportError},
	gate::RequestGate,
	http::{self, HttpTransport},
};

const GRANT_TYPE: &str = "client_credentials";
const PREVIEW_LIMIT: usize = 256;

#[derive(Serialize)]
struct GrantRequest<'a> {
	grant_type: &'static str,
	client_id: &'a str,
	client_secret: &'a str,
	audience: &'a str,
}

/// Successful token endpoint response.
#[derive(Clone, Deserialize)]
pub struct GrantResponse {
	/// Issued bearer token.
	pub access_token: String,
	/// Token type reported by the provider (normally `Bearer`).
	#[serde(default)]
	pub token_type: Option<String>,
	/// Lifetime of the token in seconds.
	pub expires_in: i64,
	/// Space-delimited scopes granted to the token.
	#[serde(default)]
	pub scope: Option<String>,
}
impl Debug for GrantResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GrantResponse")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.field("scope", &self.scope)
			.finish()
	}
}

#[derive(Deserialize)]
struct GrantErrorBody {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_description: Option<String>,
	#[serde(default)]
	message: Option<String>,
}

/// Performs one grant exchange. The request passes through `gate` like every other send.
pub(crate) async fn exchange<C>(
	config: &EndpointConfig,
	transport: &C,
	gate: &RequestGate,
) -> Result<GrantResponse, AuthError>
where
	C: ?Sized + HttpTransport,
{
	let url = http::parse_url(&config.token_url())?;
	let body = serde_json::to_vec(&GrantRequest {
		grant_type: GRANT_TYPE,
		client_id: &config.client_id,
		client_secret: config.client_secret.expose(),
		audience: &config.audience,
	})
	.map_err(TransportError::Serialize)?;
	let request = http::build_request(Method::POST, &url, Default::default(), None, Some(body))?;
	let response = gate.run(transport.execute(request)).await?;
	let status = response.status();

	if !status.is_success() {
		return Err(AuthError::Rejected {
			status: status.as_u16(),
			message: rejection_message(response.body()),
		});
	}

	let grant: GrantResponse = http::decode_json(response.body())
		.map_err(|source| AuthError::MalformedResponse { status: status.as_u16(), source })?;

	if grant.access_token.is_empty() {
		return Err(AuthError::MissingAccessToken);
	}
	if grant.expires_in <= 0 {
		return Err(AuthError::NonPositiveExpiresIn);
	}

	Ok(grant)
}

fn rejection_message(body: &[u8]) -> String {
	let parsed = serde_json::from_slice::<GrantErrorBody>(body)
		.ok()
		.and_then(|parsed| parsed.error_description.or(parsed.message).or(parsed.error));

	if let Some(message) = parsed {
		return message;
	}

	let text = String::from_utf8_lossy(body);
	let trimmed = text.trim();

	if trimmed.is_empty() {
		return "empty response body".into();
	}

	trimmed.chars().take(PREVIEW_LIMIT).collect()
}
