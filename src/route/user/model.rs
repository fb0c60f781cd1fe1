use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::Id;

/// A single user.
///
/// The `email` and `password` fields are never serialized to the client.
#[derive(Debug, Serialize, JsonSchema, FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Id,
	/// The user's primary email address, used for logging in and password
	/// resets.
	#[serde(skip_serializing)]
	pub email: String,
	/// argon2, salted with `id`.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// Display name, also copied onto blogs and comments the user writes.
	pub full_name: String,
	/// Phone number SMS notifications go to.
	pub phone_number: String,
	/// Hashtags used to pick recommended blogs for the user.
	pub preferred_hashtags: Vec<String>,
	pub notify_email: bool,
	pub notify_sms: bool,
	/// The creation time of the user.
	pub created_at: DateTime<Utc>,
}

/// A login session.
#[derive(Debug, Serialize, JsonSchema, FromRow)]
pub struct Session {
	/// The session id.
	#[serde(rename = "session_id")]
	pub id: Uuid,
	/// The user that owns the session.
	#[serde(skip)]
	pub user_id: Id,
	/// The creation time of the session.
	pub created_at: DateTime<Utc>,
}

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
fn default_true() -> bool {
	true
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	#[validate(length(min = 3, max = 64))]
	pub full_name: String,
	#[serde(default)]
	pub phone_number: String,
	#[serde(default)]
	pub preferred_hashtags: Vec<String>,
	#[serde(default = "default_true")]
	pub notify_email: bool,
	#[serde(default)]
	pub notify_sms: bool,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct UpdateUserInput {
	#[validate(email)]
	pub email: Option<String>,
	#[validate(length(min = 3, max = 64))]
	pub full_name: Option<String>,
	pub phone_number: Option<String>,
	pub preferred_hashtags: Option<Vec<String>>,
	pub notify_email: Option<bool>,
	pub notify_sms: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ResetPasswordInput {
	#[validate(email)]
	pub email: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ChangePasswordInput {
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}
