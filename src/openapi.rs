use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const BLOG: &str = "Blog";
	pub const COMMENT: &str = "Comment";
	pub const READING_LIST: &str = "ReadingList";
	pub const USER: &str = "User";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Friday Blog Open API")
		.summary("A blogging platform backend")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::BLOG.into(),
			description: Some("Blog management, popularity, recommendation and search".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comment management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::READING_LIST.into(),
			description: Some("Reading list management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::USER.into(),
			description: Some("Accounts, sessions and passwords".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorBody<'static>>, _>(|res| {
			res.example(error::ErrorBody {
				message: "Blog cannot be found".into(),
				status: 404,
				errors: Vec::new(),
			})
		})
}
