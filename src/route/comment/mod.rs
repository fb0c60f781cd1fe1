use std::borrow::Cow;

use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use serde_json::json;

use crate::{error, AppState, Id};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Comment cannot be found")]
	UnknownComment(Id),
	#[error("Blog is not found")]
	UnknownBlog(Id),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_comments, get_comments_docs).post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/:id",
			get_with(get_comment, get_comment_docs)
				.patch_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownComment(..) | Self::UnknownBlog(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let (content, key, id) = match self {
			Self::UnknownComment(comment) => ("unknown_comment", "comment", comment),
			Self::UnknownBlog(blog) => ("unknown_blog", "blog", blog),
		};

		vec![error::Message {
			content: content.into(),
			field: None,
			details: Some(Cow::Owned({
				let mut map = error::Map::new();
				map.insert(key.into(), json!(id));
				map
			})),
		}]
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_comment_crud_flow(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let blog = create_blog(&app, "A blog worth discussing", &[]).await;
		let blog_id = blog["id"].as_str().unwrap();

		let response = app
			.post("/comments")
			.json(&json!({ "blog_id": blog_id, "content": "Great read" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let comment = response.json::<Value>();
		let id = comment["id"].as_str().unwrap();

		assert_eq!(comment["author"], "John Smith");
		assert_eq!(comment["blog_id"], blog["id"]);

		let response = app.get("/comments").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);

		let response = app
			.patch(&format!("/comments/{id}"))
			.json(&json!({ "content": "Great read, changed my mind" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<Value>()["content"],
			"Great read, changed my mind"
		);

		let response = app.delete(&format!("/comments/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["message"], "Comment is removed.");

		let response = app.get(&format!("/comments/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_comment_requires_existing_blog(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app
			.post("/comments")
			.json(&json!({
				"blog_id": "5fac1fe8b2345678deadbeef",
				"content": "Shouting into the void",
			}))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_comment_body_is_validated(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let blog = create_blog(&app, "A quiet blog", &[]).await;

		let response = app
			.post("/comments")
			.json(&json!({ "blog_id": blog["id"], "content": "" }))
			.await;

		assert_eq!(response.status_code(), 400);
	}
}
