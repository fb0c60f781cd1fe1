use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::Id;

/// A single comment, written by a user under a blog.
///
/// The blog reference is checked when the comment is created, not afterward:
/// a later update may point it elsewhere.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, FromRow)]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: Id,
	/// The blog the comment was written under.
	pub blog_id: Id,
	/// The user that wrote the comment.
	#[serde(skip_deserializing)]
	pub user_id: Id,
	/// Display name of the author, copied from the user at creation time.
	#[serde(skip_deserializing)]
	pub author: String,
	/// The content of the comment.
	#[validate(length(min = 1, max = 1024))]
	pub content: String,
	/// The creation time of the comment.
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}
