//! Management API user operations.

// crates.io
use serde::de::IgnoredAny;
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	client::Client,
	directory::{required, segment},
	http::HttpTransport,
	token::TokenSecret,
};

/// Default Auth0 database connection.
pub const USERNAME_PASSWORD_AUTHENTICATION: &str = "Username-Password-Authentication";

/// Auth0 user as sent to and returned by the Management API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Provider-qualified identifier (e.g. `auth0|5abe...`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Connection the user belongs to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub connection: Option<String>,
	/// Email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Username, for connections that require one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Initial password; never returned by the API.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<TokenSecret>,
	/// Phone number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<String>,
	/// Avatar URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub picture: Option<String>,
	/// User-editable metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_metadata: Option<Map<String, Value>>,
	/// Application metadata.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub app_metadata: Option<Map<String, Value>>,
	/// Whether the email address is verified.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email_verified: Option<bool>,
	/// Whether Auth0 should send a verification email on creation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verify_email: Option<bool>,
	/// Whether the phone number is verified.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone_verified: Option<bool>,
	/// Linked identities.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub identities: Vec<Identity>,
	/// Last update timestamp as reported by Auth0.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
	/// Creation timestamp as reported by Auth0.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
}
impl User {
	/// Starts a user for a database connection with email/password credentials.
	pub fn with_password(
		connection: impl Into<String>,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			connection: Some(connection.into()),
			email: Some(email.into()),
			password: Some(TokenSecret::new(password)),
			..Default::default()
		}
	}
}

/// Identity linked to a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Connection name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub connection: Option<String>,
	/// Identifier within the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Identity provider (e.g. `auth0`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub provider: Option<String>,
	/// Whether the provider is a social connection.
	#[serde(default, rename = "isSocial", skip_serializing_if = "Option::is_none")]
	pub is_social: Option<bool>,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a user (`POST users`).
	pub async fn create_user(&self, user: &User) -> Result<User> {
		const PATH: &str = "users";

		required(self.management().post(PATH, user).await?, PATH)
	}

	/// Fetches a user by identifier (`GET users/{id}`).
	pub async fn get_user(&self, user_id: &str) -> Result<User> {
		let path = format!("users/{}", segment(user_id));

		required(self.management().get(&path).await?, &path)
	}

	/// Deletes a user (`DELETE users/{id}`).
	pub async fn delete_user(&self, user_id: &str) -> Result<()> {
		let path = format!("users/{}", segment(user_id));

		self.management().delete::<(), IgnoredAny>(&path, None).await?;

		Ok(())
	}
}
