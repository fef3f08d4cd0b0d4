//! Per-endpoint bearer token cache with single-flight client-credentials refreshes.
//!
//! [`TokenManager::ensure_valid`] reads the cached token under a short synchronous read lock,
//! never held across an `.await` and never the refresh lock, and returns it when it is not stale. Stale callers queue on the endpoint's async refresh lock and
//! re-check once they own it, so callers that piled up behind an in-flight refresh reuse its
//! result instead of issuing their own grant exchange. A failed exchange leaves the previous
//! cache entry in place.

mod grant;
mod secret;

pub use self::{grant::GrantResponse, secret::TokenSecret};

// self
use crate::{
	_prelude::*,
	config::{ApiKind, EndpointConfig},
	error::AuthError,
	gate::RequestGate,
	http::HttpTransport,
	obs::{self, CallKind},
};

/// Observable lifecycle state of a cached token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
	/// No token has been obtained yet.
	Unset,
	/// Token can be attached to requests.
	Valid,
	/// Token reached its expiry and must be refreshed before use.
	Stale,
}

/// Bearer token plus the bookkeeping needed to decide staleness.
#[derive(Clone, Debug)]
pub struct CachedToken {
	/// Access token value.
	pub value: TokenSecret,
	/// Instant the token was obtained.
	pub obtained_at: OffsetDateTime,
	/// Lifetime reported by the token endpoint.
	pub ttl: Duration,
}
impl CachedToken {
	/// Returns the expiry instant, or `None` when it falls outside the representable range.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.obtained_at.checked_add(self.ttl)
	}

	/// Stale when the value is empty or `instant >= obtained_at + ttl`.
	pub fn is_stale_at(&self, instant: OffsetDateTime) -> bool {
		if self.value.is_empty() {
			return true;
		}

		match self.expires_at() {
			Some(expires_at) => instant >= expires_at,
			None => false,
		}
	}
}

/// Owns the cached token of one endpoint and the single-flight refresh around it.
pub struct TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	api: ApiKind,
	config: Arc<EndpointConfig>,
	transport: Arc<C>,
	gate: Arc<RequestGate>,
	cache: RwLock<Option<CachedToken>>,
	refresh_guard: AsyncMutex<()>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a manager with an unset token.
	pub fn new(
		api: ApiKind,
		config: Arc<EndpointConfig>,
		transport: Arc<C>,
		gate: Arc<RequestGate>,
	) -> Self {
		Self {
			api,
			config,
			transport,
			gate,
			cache: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Returns a copy of the cached token, if one was ever obtained.
	pub fn cached(&self) -> Option<CachedToken> {
		self.cache.read().clone()
	}

	/// Classifies the cached token at `instant`.
	pub fn state_at(&self, instant: OffsetDateTime) -> TokenState {
		match self.cache.read().as_ref() {
			None => TokenState::Unset,
			Some(token) if token.is_stale_at(instant) => TokenState::Stale,
			Some(_) => TokenState::Valid,
		}
	}

	/// Returns a non-stale token, refreshing it first when needed.
	pub async fn ensure_valid(&self) -> Result<TokenSecret, AuthError> {
		self.ensure_valid_at(OffsetDateTime::now_utc()).await
	}

	/// Same as [`ensure_valid`](Self::ensure_valid) with staleness evaluated at `instant`.
	///
	/// A refreshed token records `instant` as its `obtained_at`.
	pub async fn ensure_valid_at(&self, instant: OffsetDateTime) -> Result<TokenSecret, AuthError> {
		if let Some(value) = self.fresh_at(instant) {
			return Ok(value);
		}

		let _singleflight = self.refresh_guard.lock().await;

		if let Some(value) = self.fresh_at(instant) {
			return Ok(value);
		}

		self.refresh(instant).await
	}

	fn fresh_at(&self, instant: OffsetDateTime) -> Option<TokenSecret> {
		self.cache
			.read()
			.as_ref()
			.filter(|token| !token.is_stale_at(instant))
			.map(|token| token.value.clone())
	}

	// Caller must hold `refresh_guard`.
	async fn refresh(&self, instant: OffsetDateTime) -> Result<TokenSecret, AuthError> {
		let exchange = grant::exchange(&self.config, self.transport.as_ref(), &self.gate);

		match obs::observe(CallKind::TokenGrant, self.api, exchange).await {
			Ok(grant) => {
				let token = CachedToken {
					value: TokenSecret::from(grant.access_token),
					obtained_at: instant,
					ttl: Duration::seconds(grant.expires_in),
				};
				let value = token.value.clone();

				*self.cache.write() = Some(token);

				#[cfg(feature = "tracing")]
				tracing::debug!(
					endpoint = self.api.as_str(),
					expires_in = grant.expires_in,
					"refreshed access token"
				);

				Ok(value)
			},
			Err(err) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(endpoint = self.api.as_str(), error = %err, "token refresh failed");

				Err(err)
			},
		}
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("api", &self.api)
			.field("state", &self.state_at(OffsetDateTime::now_utc()))
			.finish()
	}
}
