use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, patch_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;

use crate::{error, AppState, Id};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Readinglist cannot be found")]
	UnknownReadingList(Id),
	#[error("Blog not found")]
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
			get_with(get_reading_lists, get_reading_lists_docs)
				.post_with(create_reading_list, create_reading_list_docs),
		)
		.api_route(
			"/:id",
			get_with(get_reading_list, get_reading_list_docs)
				.patch_with(update_reading_list, update_reading_list_docs)
				.delete_with(delete_reading_list, delete_reading_list_docs),
		)
		.api_route(
			"/:id/add-blog/:blogId",
			patch_with(add_blog_to_reading_list, add_blog_to_reading_list_docs),
		)
		.api_route(
			"/:id/remove-blog/:blogId",
			patch_with(
				remove_blog_from_reading_list,
				remove_blog_from_reading_list_docs,
			),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownReadingList(..) | Self::UnknownBlog(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let (content, key, id) = match self {
			Self::UnknownReadingList(list) => ("unknown_reading_list", "reading_list", list),
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
	async fn test_reading_list_crud_flow(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app
			.post("/readinglists")
			.json(&json!({ "name": "Weekend reads" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let list = response.json::<Value>();
		let id = list["id"].as_str().unwrap();

		assert_eq!(list["blogs"], json!([]));

		let response = app
			.patch(&format!("/readinglists/{id}"))
			.json(&json!({ "name": "Weekday reads" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["name"], "Weekday reads");

		let response = app.get("/readinglists").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);

		let response = app.delete(&format!("/readinglists/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<Value>()["message"],
			"Readinglist is removed."
		);

		let response = app.get(&format!("/readinglists/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_membership_is_set_like(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let blog = create_blog(&app, "A blog to save", &[]).await;
		let blog_id = blog["id"].as_str().unwrap().to_owned();

		let response = app
			.post("/readinglists")
			.json(&json!({ "name": "To read" }))
			.await;

		let list_id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.patch(&format!("/readinglists/{list_id}/add-blog/{blog_id}"))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["blogs"], json!([blog_id]));

		// adding the same blog twice keeps exactly one entry
		let response = app
			.patch(&format!("/readinglists/{list_id}/add-blog/{blog_id}"))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<Value>()["message"],
			"Current user has already added this blog to playlist"
		);

		let response = app.get(&format!("/readinglists/{list_id}")).await;

		assert_eq!(response.json::<Value>()["blogs"], json!([blog_id]));

		let response = app
			.patch(&format!("/readinglists/{list_id}/remove-blog/{blog_id}"))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["blogs"], json!([]));

		// removing a blog that is not a member is a no-op, not an error
		let response = app
			.patch(&format!("/readinglists/{list_id}/remove-blog/{blog_id}"))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<Value>()["message"],
			"Current user did not add this blog to playlist before"
		);
	}

	#[sqlx::test]
	async fn test_adding_unknown_blog_is_not_found(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let response = app
			.post("/readinglists")
			.json(&json!({ "name": "To read" }))
			.await;

		let list_id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.patch(&format!(
				"/readinglists/{list_id}/add-blog/5fac1fe8b2345678deadbeef"
			))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_membership_on_unknown_list_is_not_found(pool: Database) {
		let app = app(pool);

		register(&app, "john@smith.com", "John Smith").await;

		let blog = create_blog(&app, "A blog to save", &[]).await;
		let blog_id = blog["id"].as_str().unwrap();

		let response = app
			.patch(&format!(
				"/readinglists/5fac1fe8b2345678deadbeef/add-blog/{blog_id}"
			))
			.await;

		assert_eq!(response.status_code(), 404);
	}
}
