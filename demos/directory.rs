//! Provisions a user and places them in an Authorization Extension group against mock Auth0 APIs,
//! showing that both APIs reuse cached tokens and funnel through the shared request gate.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use auth0_relay::{
	Client,
	directory::{USERNAME_PASSWORD_AUTHENTICATION, User},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v2/users");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"user_id\":\"auth0-demo\",\"email\":\"ada@example.com\"}");
		})
		.await;
	let group_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/authz/groups");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"_id\":\"grp-ops\",\"name\":\"ops\",\"description\":\"Operators\"}");
		})
		.await;
	let members_mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/authz/groups/grp-ops/members");
			then.status(204);
		})
		.await;
	let client = Client::builder()
		.management_api(
			server.base_url(),
			"demo-client",
			"super-secret",
			"https://demo.auth0.com/api/v2/",
			server.url("/api/v2"),
		)
		.authorization_extension_api(
			server.base_url(),
			"demo-client",
			"super-secret",
			"urn:auth0-authz-api",
			server.url("/authz"),
		)
		.build()?;
	let user = client
		.create_user(&User::with_password(
			USERNAME_PASSWORD_AUTHENTICATION,
			"ada@example.com",
			"correct horse battery staple",
		))
		.await?;
	let user_id = user.user_id.unwrap_or_default();
	let group = client.create_group("ops", "Operators").await?;
	let group_id = group.id.unwrap_or_default();

	client.add_group_members(&group_id, [user_id.as_str()]).await?;

	println!(
		"Added {user_id} to {group_id}; the shared gate admitted {} sends.",
		client.management().gate().admitted()
	);

	token_mock.assert_calls_async(2).await;
	user_mock.assert_async().await;
	group_mock.assert_async().await;
	members_mock.assert_async().await;

	Ok(())
}
