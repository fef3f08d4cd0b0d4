//! Spans and counters around outbound calls.
//!
//! Every grant exchange and resource call runs through [`observe`]. With the `tracing` feature
//! (default) the call is wrapped in an `auth0_relay.call` span carrying `kind` and `endpoint`.
//! With `metrics` each attempt and its result bump `auth0_relay_call_total`, labeled by `kind`,
//! `endpoint`, and `outcome`.

// self
use crate::{_prelude::*, config::ApiKind};

/// Outbound call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Client-credentials grant exchange against the token endpoint.
	TokenGrant,
	/// Authenticated call against a resource API.
	Resource,
}
impl CallKind {
	/// Label used in span fields and metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::TokenGrant => "token_grant",
			CallKind::Resource => "resource",
		}
	}
}

#[derive(Clone, Copy)]
enum Outcome {
	Attempt,
	Success,
	Failure,
}
impl Outcome {
	const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}

/// Runs `call` inside the call span and records its attempt and outcome.
pub(crate) async fn observe<F, T, E>(kind: CallKind, endpoint: ApiKind, call: F) -> Result<T, E>
where
	F: Future<Output = Result<T, E>>,
{
	count(kind, endpoint, Outcome::Attempt);

	#[cfg(feature = "tracing")]
	let result = {
		use tracing::Instrument;

		call.instrument(tracing::info_span!(
			"auth0_relay.call",
			kind = kind.as_str(),
			endpoint = endpoint.as_str()
		))
		.await
	};
	#[cfg(not(feature = "tracing"))]
	let result = call.await;

	count(kind, endpoint, if result.is_ok() { Outcome::Success } else { Outcome::Failure });

	result
}

fn count(kind: CallKind, endpoint: ApiKind, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"auth0_relay_call_total",
		"kind" => kind.as_str(),
		"endpoint" => endpoint.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, endpoint, outcome.as_str());
}
