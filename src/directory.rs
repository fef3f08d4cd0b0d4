//! Directory operations layered on the client facade.
//!
//! Users live in the Management API; groups, nested groups, and memberships live in the
//! Authorization Extension API. Every operation is a single [`Endpoint`](crate::endpoint::Endpoint)
//! call that only chooses the verb, path, and body.

pub mod groups;
pub mod users;

pub use self::{groups::*, users::*};

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::TransportError};

/// Percent-encodes an identifier for use as a single path segment.
pub(crate) fn segment(id: &str) -> String {
	form_urlencoded::byte_serialize(id.as_bytes()).collect::<String>().replace('+', "%20")
}

/// Turns a `204 No Content` into an error for calls that must return a body.
pub(crate) fn required<T>(value: Option<T>, path: &str) -> Result<T> {
	value.ok_or_else(|| TransportError::EmptyBody { path: path.to_owned() }.into())
}
