use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	route::model::Info,
	Database, Id,
};

use super::{model, Error, RouteError};

/// Get all comments
/// Returns every comment, newest first.
#[route(tag = tag::COMMENT)]
pub async fn get_comments(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Comment>>, RouteError> {
	let comments = sqlx::query_as::<_, model::Comment>(
		r#"
			SELECT * FROM comment
			ORDER BY created_at DESC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(comments))
}

/// Get single comment
/// Returns a single comment by its unique id.
#[route(tag = tag::COMMENT)]
pub async fn get_comment(
	State(database): State<Database>,
	Path(comment_id): Path<Id>,
	_session: Session,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			SELECT * FROM comment
			WHERE id = $1
		"#,
	)
	.bind(&comment_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment(comment_id))?))
}

/// Create comment
/// Creates a new comment under an existing blog. The author name and user
/// reference are taken from the session, never from the body.
#[route(tag = tag::COMMENT, response(status = 201, description = "Comment created.", shape = "Json<model::Comment>"))]
pub async fn create_comment(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateComment>,
) -> Result<impl IntoApiResponse, RouteError> {
	let exists =
		sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM blog WHERE id = $1)")
			.bind(&input.blog_id)
			.fetch_one(&database)
			.await?;

	if !exists {
		return Err(Error::UnknownBlog(input.blog_id).into());
	}

	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			INSERT INTO comment (id, blog_id, user_id, author, content)
			VALUES ($1, $2, $3, $4, $5)
			RETURNING *
		"#,
	)
	.bind(Id::new())
	.bind(&input.blog_id)
	.bind(&session.user.id)
	.bind(&session.user.full_name)
	.bind(&input.content)
	.fetch_one(&database)
	.await?;

	Ok((StatusCode::CREATED, Json(comment)).into_response())
}

/// Update comment
/// Merges the given fields into an existing comment by its unique id.
#[route(tag = tag::COMMENT)]
pub async fn update_comment(
	State(database): State<Database>,
	Path(comment_id): Path<Id>,
	_session: Session,
	Json(input): Json<model::UpdateComment>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			UPDATE comment
			SET blog_id = COALESCE($1, blog_id),
				content = COALESCE($2, content)
			WHERE id = $3
			RETURNING *
		"#,
	)
	.bind(input.blog_id)
	.bind(input.content)
	.bind(&comment_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment(comment_id))?))
}

/// Delete comment
/// Deletes an existing comment by its unique id.
#[route(tag = tag::COMMENT)]
pub async fn delete_comment(
	State(database): State<Database>,
	Path(comment_id): Path<Id>,
	_session: Session,
) -> Result<Json<Info>, RouteError> {
	let status = sqlx::query("DELETE FROM comment WHERE id = $1")
		.bind(&comment_id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownComment(comment_id).into());
	}

	Ok(Json(Info::new("Comment is removed.")))
}
