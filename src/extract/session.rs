use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{
	error::RouteError, openapi::SECURITY_SCHEME_SESSION, route::user, session, Database,
};

/// Extracts the session and related user from the request.
///
/// If no session cookie is present, a [`user::Error::NoSessionCookie`] is
/// returned. If the session is invalid, a
/// [`user::Error::InvalidSessionCookie`] is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: user::model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<user::Error>;

	/// Extracts the session from the request using the session cookie.
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let cookies = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok());

		let session_id = cookies
			.flat_map(cookie::Cookie::split_parse)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == session::COOKIE_NAME)
			.ok_or(user::Error::NoSessionCookie)?;

		let session_id = Uuid::parse_str(session_id.value())
			.map_err(|_| user::Error::InvalidSessionCookie)?;

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, user::model::User>(
			r#"
				SELECT * FROM "user" WHERE id = (
					SELECT user_id FROM session WHERE id = $1
				)
			"#,
		)
		.bind(session_id)
		.fetch_optional(&database)
		.await?;

		let user = user.ok_or(user::Error::InvalidSessionCookie)?;

		Ok(Session {
			id: session_id,
			user,
		})
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a session cookie requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([[
			(SECURITY_SCHEME_SESSION.to_string(), Vec::new()),
		]
		.into_iter()
		.collect()]);
	}
}
