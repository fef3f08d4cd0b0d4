//! Shared, redacting holder for access tokens, client secrets, and passwords.

// self
use crate::_prelude::*;

/// Secret string that never shows up in `Debug` or `Display` output.
///
/// Clones share one allocation, so handing the cached access token to every concurrent caller
/// does not copy it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TokenSecret(Arc<str>);
impl TokenSecret {
	/// Wraps a new secret.
	pub fn new(value: impl Into<String>) -> Self {
		Self(Arc::from(value.into()))
	}

	/// Returns the raw secret. Never log the result.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `true` when no secret material is held.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// `Authorization` header value for this token.
	pub(crate) fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(Arc::from(value))
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self(Arc::from(value))
	}
}
impl From<TokenSecret> for String {
	fn from(secret: TokenSecret) -> Self {
		secret.0.as_ref().to_owned()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(if self.is_empty() { "TokenSecret(<empty>)" } else { "TokenSecret(<redacted>)" })
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
