use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::Id;

/// A named collection of blogs saved by a user.
///
/// Membership is set-like: a blog appears at most once, and it is changed
/// only through the add-blog/remove-blog endpoints.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, FromRow)]
pub struct ReadingList {
	/// The unique identifier of the reading list.
	#[serde(skip_deserializing)]
	pub id: Id,
	/// The user that owns the list.
	#[serde(skip_deserializing)]
	pub user_id: Id,
	/// The name of the list.
	#[validate(length(min = 1, max = 128))]
	pub name: String,
	/// The blogs saved to the list.
	#[serde(skip_deserializing)]
	pub blogs: Vec<Id>,
	/// The creation time of the list.
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}
