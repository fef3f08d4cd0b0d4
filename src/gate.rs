//! Request gate that serializes outbound sends.
//!
//! Auth0 applies one rate limit to every API of a tenant, so by default the client funnels the
//! grant exchanges and resource calls of both endpoints through a single [`RequestGate`]. The gate
//! is released when the wrapped future completes, fails, panics, or is dropped. Waiters get no
//! fairness guarantee beyond what [`async_lock::Mutex`] provides and never time out.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// How gates are shared between the endpoints of one client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateScope {
	#[default]
	/// One gate for every endpoint.
	Shared,
	/// Independent gate per endpoint, for tenants whose APIs are rate-limited separately.
	PerEndpoint,
}

/// Admits one in-flight send at a time.
#[derive(Debug, Default)]
pub struct RequestGate {
	lock: AsyncMutex<()>,
	admitted: AtomicU64,
}
impl RequestGate {
	/// Creates an idle gate.
	pub fn new() -> Self {
		Self::default()
	}

	/// Runs `send` while holding the gate.
	pub async fn run<F>(&self, send: F) -> F::Output
	where
		F: Future,
	{
		let _permit = self.lock.lock().await;

		self.admitted.fetch_add(1, Ordering::Relaxed);

		#[cfg(feature = "tracing")]
		tracing::trace!(admitted = self.admitted(), "request gate admitted a send");

		send.await
	}

	/// Number of sends admitted so far.
	pub fn admitted(&self) -> u64 {
		self.admitted.load(Ordering::Relaxed)
	}

	/// Returns `true` while a send holds the gate.
	pub fn is_busy(&self) -> bool {
		self.lock.try_lock().is_none()
	}
}
