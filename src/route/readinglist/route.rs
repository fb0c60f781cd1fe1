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

/// Get all reading lists
/// Returns every reading list, newest first.
#[route(tag = tag::READING_LIST)]
pub async fn get_reading_lists(
	State(database): State<Database>,
	_session: Session,
) -> Result<Json<Vec<model::ReadingList>>, RouteError> {
	let lists = sqlx::query_as::<_, model::ReadingList>(
		r#"
			SELECT * FROM reading_list
			ORDER BY created_at DESC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(lists))
}

/// Get single reading list
/// Returns a single reading list by its unique id.
#[route(tag = tag::READING_LIST)]
pub async fn get_reading_list(
	State(database): State<Database>,
	Path(list_id): Path<Id>,
	_session: Session,
) -> Result<Json<model::ReadingList>, RouteError> {
	let list = sqlx::query_as::<_, model::ReadingList>(
		r#"
			SELECT * FROM reading_list
			WHERE id = $1
		"#,
	)
	.bind(&list_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(list.ok_or(Error::UnknownReadingList(list_id))?))
}

/// Create reading list
/// Creates a new reading list owned by the authenticated user.
#[route(tag = tag::READING_LIST, response(status = 201, description = "Reading list created.", shape = "Json<model::ReadingList>"))]
pub async fn create_reading_list(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateReadingList>,
) -> Result<impl IntoApiResponse, RouteError> {
	let list = sqlx::query_as::<_, model::ReadingList>(
		r#"
			INSERT INTO reading_list (id, user_id, name)
			VALUES ($1, $2, $3)
			RETURNING *
		"#,
	)
	.bind(Id::new())
	.bind(&session.user.id)
	.bind(&input.name)
	.fetch_one(&database)
	.await?;

	Ok((StatusCode::CREATED, Json(list)).into_response())
}

/// Update reading list
/// Merges the given fields into an existing reading list by its unique id.
#[route(tag = tag::READING_LIST)]
pub async fn update_reading_list(
	State(database): State<Database>,
	Path(list_id): Path<Id>,
	_session: Session,
	Json(input): Json<model::UpdateReadingList>,
) -> Result<Json<model::ReadingList>, RouteError> {
	let list = sqlx::query_as::<_, model::ReadingList>(
		r#"
			UPDATE reading_list
			SET name = COALESCE($1, name)
			WHERE id = $2
			RETURNING *
		"#,
	)
	.bind(input.name)
	.bind(&list_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(list.ok_or(Error::UnknownReadingList(list_id))?))
}

/// Add blog to reading list
/// Adds an existing blog to the list if it is not already there. Membership
/// changes in one conditional statement; adding a blog twice is a no-op that
/// reports the existing state.
#[route(tag = tag::READING_LIST)]
pub async fn add_blog_to_reading_list(
	State(database): State<Database>,
	Path((list_id, blog_id)): Path<(Id, Id)>,
	_session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	let exists =
		sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM blog WHERE id = $1)")
			.bind(&blog_id)
			.fetch_one(&database)
			.await?;

	if !exists {
		return Err(Error::UnknownBlog(blog_id).into());
	}

	let updated = sqlx::query_as::<_, model::ReadingList>(
		r#"
			UPDATE reading_list
			SET blogs = array_append(blogs, $2)
			WHERE id = $1 AND NOT ($2 = ANY(blogs))
			RETURNING *
		"#,
	)
	.bind(&list_id)
	.bind(&blog_id)
	.fetch_optional(&database)
	.await?;

	if let Some(list) = updated {
		return Ok(Json(list).into_response());
	}

	let exists =
		sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM reading_list WHERE id = $1)")
			.bind(&list_id)
			.fetch_one(&database)
			.await?;

	if !exists {
		return Err(Error::UnknownReadingList(list_id).into());
	}

	Ok(Json(Info::new(
		"Current user has already added this blog to playlist",
	))
	.into_response())
}

/// Remove blog from reading list
/// Removes a blog from the list if it is there; removing a blog that is not
/// a member is a no-op that reports the existing state.
#[route(tag = tag::READING_LIST)]
pub async fn remove_blog_from_reading_list(
	State(database): State<Database>,
	Path((list_id, blog_id)): Path<(Id, Id)>,
	_session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	let updated = sqlx::query_as::<_, model::ReadingList>(
		r#"
			UPDATE reading_list
			SET blogs = array_remove(blogs, $2)
			WHERE id = $1 AND $2 = ANY(blogs)
			RETURNING *
		"#,
	)
	.bind(&list_id)
	.bind(&blog_id)
	.fetch_optional(&database)
	.await?;

	if let Some(list) = updated {
		return Ok(Json(list).into_response());
	}

	let exists =
		sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM reading_list WHERE id = $1)")
			.bind(&list_id)
			.fetch_one(&database)
			.await?;

	if !exists {
		return Err(Error::UnknownReadingList(list_id).into());
	}

	Ok(Json(Info::new(
		"Current user did not add this blog to playlist before",
	))
	.into_response())
}

/// Delete reading list
/// Deletes an existing reading list by its unique id.
#[route(tag = tag::READING_LIST)]
pub async fn delete_reading_list(
	State(database): State<Database>,
	Path(list_id): Path<Id>,
	_session: Session,
) -> Result<Json<Info>, RouteError> {
	let status = sqlx::query("DELETE FROM reading_list WHERE id = $1")
		.bind(&list_id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownReadingList(list_id).into());
	}

	Ok(Json(Info::new("Readinglist is removed.")))
}
