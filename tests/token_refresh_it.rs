mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime, macros::datetime};
// self
use auth0_relay::{AuthError, Error, token::TokenState};
use common::*;

#[tokio::test]
async fn grant_is_sent_as_json_client_credentials() {
	let server = MockServer::start_async().await;
	let grant = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("content-type", "application/json")
				.json_body(json!({
					"grant_type": "client_credentials",
					"client_id": CLIENT_ID,
					"client_secret": CLIENT_SECRET,
					"audience": "https://tenant.auth0.com/api/v2/",
				}));
			then.status(200).header("content-type", "application/json").body(GRANT_BODY);
		})
		.await;
	let client = build_client(&server);
	let token = client
		.management()
		.tokens()
		.ensure_valid()
		.await
		.expect("Grant exchange should succeed.");

	assert_eq!(token.expose(), "abc123");

	grant.assert_async().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_grant_exchange() {
	const CALLERS: usize = 8;

	let server = MockServer::start_async().await;
	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(GRANT_BODY)
				.delay(std::time::Duration::from_millis(50));
		})
		.await;
	let resource = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/users/u1").header("authorization", "Bearer abc123");
			then.status(200).header("content-type", "application/json").body("{\"user_id\":\"u1\"}");
		})
		.await;
	let client = build_client(&server);

	assert_eq!(client.management().tokens().state_at(OffsetDateTime::now_utc()), TokenState::Unset);

	let mut handles = Vec::new();

	for _ in 0..CALLERS {
		let client = client.clone();

		handles.push(tokio::spawn(async move {
			client.management().get::<Value>("users/u1").await
		}));
	}
	for handle in handles {
		let body = handle
			.await
			.expect("Caller task should not panic.")
			.expect("Every caller should succeed.")
			.expect("Resource call should return a body.");

		assert_eq!(body["user_id"], "u1");
	}

	grant.assert_calls_async(1).await;
	resource.assert_calls_async(CALLERS).await;
	assert_eq!(client.management().gate().admitted(), (CALLERS + 1) as u64);
}

#[tokio::test]
async fn valid_token_is_reused_until_expiry() {
	let server = MockServer::start_async().await;
	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(GRANT_BODY);
		})
		.await;
	let client = build_client(&server);
	let tokens = client.management().tokens();
	let t = datetime!(2024-05-01 12:00 UTC);

	tokens.ensure_valid_at(t).await.expect("Initial grant should succeed.");

	for offset in [1, 60, 1800, 3599] {
		tokens
			.ensure_valid_at(t + Duration::seconds(offset))
			.await
			.expect("Cached token should be returned.");
	}

	grant.assert_calls_async(1).await;
	assert_eq!(tokens.state_at(t + Duration::seconds(3599)), TokenState::Valid);
	assert_eq!(tokens.state_at(t + Duration::seconds(3601)), TokenState::Stale);

	tokens
		.ensure_valid_at(t + Duration::seconds(3601))
		.await
		.expect("Stale token should be refreshed.");

	grant.assert_calls_async(2).await;

	let cached = tokens.cached().expect("Token should be cached.");

	assert_eq!(cached.obtained_at, t + Duration::seconds(3601));
	assert_eq!(cached.ttl, Duration::seconds(3600));
}

#[tokio::test]
async fn endpoints_keep_independent_tokens() {
	let server = MockServer::start_async().await;
	let management_grant = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.json_body_includes("{\"audience\":\"https://tenant.auth0.com/api/v2/\"}");
			then.status(200).header("content-type", "application/json").body(GRANT_BODY);
		})
		.await;
	let extension_grant = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.json_body_includes("{\"audience\":\"urn:auth0-authz-api\"}");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"ext456\",\"token_type\":\"Bearer\",\"expires_in\":600}");
		})
		.await;
	let client = build_client(&server);
	let management = client.management().tokens().ensure_valid().await.expect("Management grant.");
	let extension =
		client.authorization_extension().tokens().ensure_valid().await.expect("Extension grant.");

	assert_eq!(management.expose(), "abc123");
	assert_eq!(extension.expose(), "ext456");

	management_grant.assert_calls_async(1).await;
	extension_grant.assert_calls_async(1).await;
}

#[tokio::test]
async fn failed_grant_aborts_the_resource_call() {
	let server = MockServer::start_async().await;
	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(500)
				.header("content-type", "application/json")
				.body("{\"error\":\"server_error\",\"error_description\":\"token service down\"}");
		})
		.await;
	let resource = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/users/u1");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.management()
		.get::<Value>("users/u1")
		.await
		.expect_err("Grant failure should surface.");

	match err {
		Error::Auth(AuthError::Rejected { status, message }) => {
			assert_eq!(status, 500);
			assert_eq!(message, "token service down");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	grant.assert_calls_async(1).await;
	resource.assert_calls_async(0).await;
	assert_eq!(client.management().tokens().state_at(OffsetDateTime::now_utc()), TokenState::Unset);
}

#[tokio::test]
async fn failed_refresh_keeps_the_stale_token() {
	let server = MockServer::start_async().await;
	let mut grant = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(GRANT_BODY);
		})
		.await;
	let client = build_client(&server);
	let tokens = client.management().tokens();
	let t = datetime!(2024-05-01 12:00 UTC);

	tokens.ensure_valid_at(t).await.expect("Initial grant should succeed.");
	grant.delete_async().await;

	let failing = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"access_denied\",\"error_description\":\"Unauthorized\"}");
		})
		.await;
	let err = tokens
		.ensure_valid_at(t + Duration::seconds(7200))
		.await
		.expect_err("Refresh should fail.");

	assert!(matches!(err, AuthError::Rejected { status: 401, .. }));

	failing.assert_async().await;

	let cached = tokens.cached().expect("Stale token should remain cached.");

	assert_eq!(cached.value.expose(), "abc123");
	assert_eq!(cached.obtained_at, t);
}

#[tokio::test]
async fn malformed_grant_responses_are_auth_errors() {
	let server = MockServer::start_async().await;
	let _grant = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body("{\"token_type\":\"Bearer\"}");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.authorization_extension()
		.tokens()
		.ensure_valid()
		.await
		.expect_err("Missing access_token should fail.");

	assert!(matches!(err, AuthError::MalformedResponse { status: 200, .. }));
}

#[tokio::test]
async fn non_positive_lifetimes_are_rejected() {
	let server = MockServer::start_async().await;
	let _grant = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc123\",\"expires_in\":0}");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.management()
		.tokens()
		.ensure_valid()
		.await
		.expect_err("Zero lifetime should fail.");

	assert!(matches!(err, AuthError::NonPositiveExpiresIn));
}
