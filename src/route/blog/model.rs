use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::Id;

/// A single blog post, created by a user.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, FromRow)]
pub struct Blog {
	/// The unique identifier of the blog.
	#[serde(skip_deserializing)]
	pub id: Id,
	/// The user that wrote the blog.
	#[serde(skip_deserializing)]
	pub user_id: Id,
	/// Display name of the author, copied from the user at creation time.
	#[serde(skip_deserializing)]
	pub author: String,
	/// The title of the blog.
	#[validate(length(min = 3, max = 128))]
	pub title: String,
	/// The content of the blog in Markdown format.
	pub content: String,
	/// The category the blog is filed under.
	pub category: String,
	/// Hashtags used for recommendation matching.
	pub hashtags: Vec<String>,
	/// Users that liked this blog; at most one entry per user.
	#[serde(skip_deserializing, rename = "likedByUsers")]
	pub liked_by: Vec<Id>,
	/// Denormalized like counter, always equal to the size of `likedByUsers`.
	#[serde(skip_deserializing)]
	pub likes: i64,
	/// The creation time of the blog.
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}

/// Body of the like-flag endpoint.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct LikeFlagInput {
	pub liked: bool,
}

/// Body of the keyword search endpoint.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct SearchInput {
	/// Whitespace-separated keywords, e.g. "coffee newyork".
	#[validate(length(min = 1))]
	pub keywords: String,
}
