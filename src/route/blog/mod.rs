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
	#[error("Blog cannot be found")]
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
			get_with(get_blogs, get_blogs_docs).post_with(create_blog, create_blog_docs),
		)
		.api_route(
			"/popular-blogs",
			get_with(get_popular_blogs, get_popular_blogs_docs),
		)
		.api_route(
			"/popular-blogs/:category",
			get_with(
				get_popular_blogs_by_category,
				get_popular_blogs_by_category_docs,
			),
		)
		.api_route(
			"/search-by-keywords",
			get_with(search_blogs_by_keywords, search_blogs_by_keywords_docs),
		)
		.api_route(
			"/recommend-me",
			get_with(get_recommended_blogs, get_recommended_blogs_docs),
		)
		.api_route(
			"/:id",
			get_with(get_blog, get_blog_docs)
				.patch_with(update_blog, update_blog_docs)
				.delete_with(delete_blog, delete_blog_docs),
		)
		.api_route(
			"/:id/like-flag",
			patch_with(send_like_flag, send_like_flag_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownBlog(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownBlog(blog) => vec![error::Message {
				content: "unknown_blog".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("blog".into(), json!(blog));
					map
				})),
			}],
		}
	}
}
