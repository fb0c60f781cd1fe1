pub use serde_json::{json, Value};

pub use crate::Database;

use argon2::Argon2;
use axum_test::{TestServer, TestServerConfig};

use crate::{notify::Notifier, State};

/// Builds a test server around the full router.
///
/// Cookies persist between requests, so registering or logging in
/// authenticates the rest of the test; a later register or login switches
/// the active session.
pub fn app(pool: Database) -> TestServer {
	let state = State {
		database: pool,
		hasher: Argon2::default(),
		notifier: Notifier::spawn(),
	};

	TestServer::new_with_config(
		crate::router(state),
		TestServerConfig {
			save_cookies: true,
			..TestServerConfig::default()
		},
	)
	.unwrap()
}

/// Registers a user and returns their serialized form, leaving their
/// session active on the server.
pub async fn register(app: &TestServer, email: &str, full_name: &str) -> Value {
	let response = app
		.post("/users")
		.json(&json!({
			"email": email,
			"password": "hunter2hunter",
			"full_name": full_name,
		}))
		.await;

	assert_eq!(response.status_code(), 201);

	response.json()
}

/// Logs a previously registered user back in, switching the active session.
pub async fn login(app: &TestServer, email: &str) {
	let response = app
		.post("/users/login")
		.json(&json!({
			"email": email,
			"password": "hunter2hunter",
		}))
		.await;

	assert_eq!(response.status_code(), 200);
}

/// Creates a blog owned by the active session user and returns it.
pub async fn create_blog(app: &TestServer, title: &str, hashtags: &[&str]) -> Value {
	let response = app
		.post("/blogs")
		.json(&json!({
			"title": title,
			"content": format!("Content of {title}"),
			"category": "general",
			"hashtags": hashtags,
		}))
		.await;

	assert_eq!(response.status_code(), 201);

	response.json()
}
