use aide::axum::{
	routing::{delete_with, get_with, patch_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur around accounts and sessions.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information; bad email and bad password collapse into
/// one message on purpose.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid email or password")]
	InvalidEmailOrPassword,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("Email already taken")]
	EmailTaken,
	#[error("User not found")]
	UnknownUser,
	#[error("You can only delete your own account")]
	NotAccountOwner,
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	let credentials = ApiRouter::new()
		.api_route("/login", post_with(login, login_docs))
		.api_route(
			"/reset-password",
			patch_with(reset_password, reset_password_docs),
		);

	// Credential endpoints get the stricter limiter. Tests drive the router
	// without a client address, so the layer only exists outside of them.
	#[cfg(not(test))]
	let credentials = credentials.layer(tower_governor::GovernorLayer {
		config: crate::ratelimit::secure(),
	});

	ApiRouter::new()
		.api_route(
			"/",
			post_with(register, register_docs)
				.get_with(get_users, get_users_docs)
				.patch_with(update_me, update_me_docs),
		)
		.api_route("/logout", post_with(logout, logout_docs))
		.api_route("/me", get_with(get_me, get_me_docs))
		.api_route(
			"/change-password",
			patch_with(change_password, change_password_docs),
		)
		.api_route("/:id", delete_with(delete_user, delete_user_docs))
		.merge(credentials)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidEmailOrPassword | Self::NoSessionCookie | Self::InvalidSessionCookie => {
				StatusCode::UNAUTHORIZED
			}
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::EmailTaken => StatusCode::CONFLICT,
			Self::UnknownUser => StatusCode::NOT_FOUND,
			Self::NotAccountOwner => StatusCode::FORBIDDEN,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		vec![error::Message {
			content: self.to_string().into(),
			field: None,
			details: None,
		}]
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_signup_flow(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/users")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
				"full_name": "John Smith",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let body = response.json::<Value>();

		assert_eq!(body["full_name"], "John Smith");
		// credentials never leave the server
		assert!(body.get("email").is_none());
		assert!(body.get("password").is_none());

		let response = app
			.post("/users/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app.get("/users/me").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["full_name"], "John Smith");
	}

	#[sqlx::test]
	async fn test_logout_invalidates_session(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app.post("/users/logout").await;

		assert_eq!(response.status_code(), 200);

		let response = app.get("/users/me").await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_me_requires_session(pool: Database) {
		let app = app(pool);

		let response = app.get("/users/me").await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_register_duplicate_email_conflicts(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app
			.post("/users")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
				"full_name": "John Impostor",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_login_rejects_bad_credentials(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app
			.post("/users/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "not-the-password",
			}))
			.await;

		assert_eq!(response.status_code(), 401);

		let response = app
			.post("/users/login")
			.json(&json!({
				"email": "nobody@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_update_profile(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app
			.patch("/users")
			.json(&json!({
				"full_name": "Johnny Smith",
				"preferred_hashtags": ["coffee"],
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<Value>();

		assert_eq!(body["full_name"], "Johnny Smith");
		assert_eq!(body["preferred_hashtags"], json!(["coffee"]));

		let response = app.get("/users/me").await;

		assert_eq!(response.json::<Value>()["full_name"], "Johnny Smith");
	}

	#[sqlx::test]
	async fn test_change_password(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app
			.patch("/users/change-password")
			.json(&json!({ "password": "correct-horse-battery" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app
			.post("/users/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 401);

		let response = app
			.post("/users/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "correct-horse-battery",
			}))
			.await;

		assert_eq!(response.status_code(), 200);
	}

	#[sqlx::test]
	async fn test_reset_password_invalidates_old_one(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app
			.patch("/users/reset-password")
			.json(&json!({ "email": "john@smith.com" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<Value>()["message"],
			"Mail has been sent to user email"
		);

		let response = app
			.post("/users/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_reset_password_for_unknown_email(pool: Database) {
		let app = app(pool);

		let response = app
			.patch("/users/reset-password")
			.json(&json!({ "email": "nobody@smith.com" }))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_delete_user_cascades(pool: Database) {
		let app = app(pool);

		register(&app, "other@x.com", "Other O").await;

		let kept = create_blog(&app, "A blog that stays", &[]).await;
		let kept_id = kept["id"].as_str().unwrap().to_owned();

		let doomed = register(&app, "doomed@x.com", "Doomed D").await;
		let doomed_id = doomed["id"].as_str().unwrap().to_owned();

		create_blog(&app, "A blog that goes", &[]).await;

		let response = app
			.post("/comments")
			.json(&json!({ "blog_id": kept_id, "content": "I will be gone" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let response = app
			.post("/readinglists")
			.json(&json!({ "name": "Doomed reads" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let response = app
			.patch(&format!("/blogs/{kept_id}/like-flag"))
			.json(&json!({ "liked": true }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["likes"], 1);

		let response = app.delete(&format!("/users/{doomed_id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["message"], "User has been removed");

		login(&app, "other@x.com").await;

		let response = app.get("/blogs").await;
		let blogs = response.json::<Value>();
		let blogs = blogs.as_array().unwrap();

		assert_eq!(blogs.len(), 1);
		assert_eq!(blogs[0]["id"], kept["id"]);

		let response = app.get(&format!("/blogs/{kept_id}")).await;
		let body = response.json::<Value>();

		assert_eq!(body["likes"], 0);
		assert_eq!(body["likedByUsers"], json!([]));

		let response = app.get("/comments").await;

		assert_eq!(response.json::<Value>().as_array().unwrap().len(), 0);

		let response = app.get("/readinglists").await;

		assert_eq!(response.json::<Value>().as_array().unwrap().len(), 0);
	}

	#[sqlx::test]
	async fn test_delete_other_user_is_forbidden(pool: Database) {
		let app = app(pool);

		let victim = register(&app, "victim@x.com", "Victim V").await;
		let victim_id = victim["id"].as_str().unwrap().to_owned();

		register(&app, "attacker@x.com", "Attacker A").await;

		let response = app.delete(&format!("/users/{victim_id}")).await;

		assert_eq!(response.status_code(), 403);
	}
}
