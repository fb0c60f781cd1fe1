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

/// Get all blogs
/// Returns every blog, newest first.
#[route(tag = tag::BLOG)]
pub async fn get_blogs(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Blog>>, RouteError> {
	let blogs = sqlx::query_as::<_, model::Blog>(
		r#"
			SELECT * FROM blog
			ORDER BY created_at DESC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(blogs))
}

/// Get popular blogs
/// Returns every blog ordered by like count, most liked first. Blogs with
/// the same like count are ordered by id, oldest first.
#[route(tag = tag::BLOG)]
pub async fn get_popular_blogs(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Blog>>, RouteError> {
	let blogs = sqlx::query_as::<_, model::Blog>(
		r#"
			SELECT * FROM blog
			ORDER BY likes DESC, id ASC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(blogs))
}

/// Get popular blogs by category
/// Returns the blogs of one category ordered by like count, most liked first.
#[route(tag = tag::BLOG)]
pub async fn get_popular_blogs_by_category(
	State(database): State<Database>,
	Path(category): Path<String>,
) -> Result<Json<Vec<model::Blog>>, RouteError> {
	let blogs = sqlx::query_as::<_, model::Blog>(
		r#"
			SELECT * FROM blog
			WHERE category = $1
			ORDER BY likes DESC, id ASC
		"#,
	)
	.bind(&category)
	.fetch_all(&database)
	.await?;

	Ok(Json(blogs))
}

/// Search blogs by keywords
/// Splits the given keywords on whitespace and returns the blogs where any
/// keyword appears in the title, content, author or category.
#[route(tag = tag::BLOG)]
pub async fn search_blogs_by_keywords(
	State(database): State<Database>,
	Json(input): Json<model::SearchInput>,
) -> Result<Json<Vec<model::Blog>>, RouteError> {
	let keywords = input
		.keywords
		.split_whitespace()
		.map(str::to_owned)
		.collect::<Vec<_>>();

	let blogs = sqlx::query_as::<_, model::Blog>(
		r#"
			SELECT * FROM blog
			WHERE EXISTS (
				SELECT 1 FROM unnest($1::text[]) AS keyword
				WHERE title ILIKE '%' || keyword || '%'
					OR content ILIKE '%' || keyword || '%'
					OR author ILIKE '%' || keyword || '%'
					OR category ILIKE '%' || keyword || '%'
			)
			ORDER BY created_at DESC
		"#,
	)
	.bind(&keywords)
	.fetch_all(&database)
	.await?;

	Ok(Json(blogs))
}

/// Get recommended blogs
/// Returns the blogs whose hashtags intersect the authenticated user's
/// preferred hashtags.
#[route(tag = tag::BLOG)]
pub async fn get_recommended_blogs(
	State(database): State<Database>,
	session: Session,
) -> Result<Json<Vec<model::Blog>>, RouteError> {
	let blogs = sqlx::query_as::<_, model::Blog>(
		r#"
			SELECT * FROM blog
			WHERE hashtags && $1::text[]
			ORDER BY created_at DESC
		"#,
	)
	.bind(&session.user.preferred_hashtags)
	.fetch_all(&database)
	.await?;

	Ok(Json(blogs))
}

/// Get single blog
/// Returns a single blog by its unique id.
#[route(tag = tag::BLOG)]
pub async fn get_blog(
	State(database): State<Database>,
	Path(blog_id): Path<Id>,
	_session: Session,
) -> Result<Json<model::Blog>, RouteError> {
	let blog = sqlx::query_as::<_, model::Blog>(
		r#"
			SELECT * FROM blog
			WHERE id = $1
		"#,
	)
	.bind(&blog_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(blog.ok_or(Error::UnknownBlog(blog_id))?))
}

/// Create blog
/// Creates a new blog. The author name and user reference are taken from the
/// session, never from the body.
#[route(tag = tag::BLOG, response(status = 201, description = "Blog created.", shape = "Json<model::Blog>"))]
pub async fn create_blog(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateBlog>,
) -> Result<impl IntoApiResponse, RouteError> {
	let blog = sqlx::query_as::<_, model::Blog>(
		r#"
			INSERT INTO blog (id, user_id, author, title, content, category, hashtags)
			VALUES ($1, $2, $3, $4, $5, $6, $7)
			RETURNING *
		"#,
	)
	.bind(Id::new())
	.bind(&session.user.id)
	.bind(&session.user.full_name)
	.bind(&input.title)
	.bind(&input.content)
	.bind(&input.category)
	.bind(&input.hashtags)
	.fetch_one(&database)
	.await?;

	Ok((StatusCode::CREATED, Json(blog)).into_response())
}

/// Update blog
/// Merges the given fields into an existing blog by its unique id.
#[route(tag = tag::BLOG)]
pub async fn update_blog(
	State(database): State<Database>,
	Path(blog_id): Path<Id>,
	_session: Session,
	Json(input): Json<model::UpdateBlog>,
) -> Result<Json<model::Blog>, RouteError> {
	let blog = sqlx::query_as::<_, model::Blog>(
		r#"
			UPDATE blog
			SET title = COALESCE($1, title),
				content = COALESCE($2, content),
				category = COALESCE($3, category),
				hashtags = COALESCE($4::text[], hashtags)
			WHERE id = $5
			RETURNING *
		"#,
	)
	.bind(input.title)
	.bind(input.content)
	.bind(input.category)
	.bind(input.hashtags)
	.bind(&blog_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(blog.ok_or(Error::UnknownBlog(blog_id))?))
}

/// Like or unlike a blog
/// Records whether the authenticated user likes the blog. Membership and the
/// like counter change in one conditional statement, so the counter can never
/// drift from the membership set; repeating a like or unlike is a no-op that
/// reports the existing state.
#[route(tag = tag::BLOG)]
pub async fn send_like_flag(
	State(database): State<Database>,
	Path(blog_id): Path<Id>,
	session: Session,
	Json(input): Json<model::LikeFlagInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let sql = if input.liked {
		r#"
			UPDATE blog
			SET liked_by = array_append(liked_by, $2), likes = likes + 1
			WHERE id = $1 AND NOT ($2 = ANY(liked_by))
			RETURNING *
		"#
	} else {
		r#"
			UPDATE blog
			SET liked_by = array_remove(liked_by, $2), likes = likes - 1
			WHERE id = $1 AND $2 = ANY(liked_by)
			RETURNING *
		"#
	};

	let updated = sqlx::query_as::<_, model::Blog>(sql)
		.bind(&blog_id)
		.bind(&session.user.id)
		.fetch_optional(&database)
		.await?;

	if let Some(blog) = updated {
		return Ok(Json(blog).into_response());
	}

	let exists =
		sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM blog WHERE id = $1)")
			.bind(&blog_id)
			.fetch_one(&database)
			.await?;

	if !exists {
		return Err(Error::UnknownBlog(blog_id).into());
	}

	Ok(Json(Info::new(if input.liked {
		"Current user has already liked this blog"
	} else {
		"Current user did not liked this blog"
	}))
	.into_response())
}

/// Delete blog
/// Deletes a blog together with its dependents: every comment under it and
/// its entry in every reading list. All three steps run in one transaction
/// and the response is sent only after the commit.
#[route(tag = tag::BLOG)]
pub async fn delete_blog(
	State(database): State<Database>,
	Path(blog_id): Path<Id>,
	_session: Session,
) -> Result<Json<Info>, RouteError> {
	let mut tx = database.begin().await?;

	let comments = sqlx::query("DELETE FROM comment WHERE blog_id = $1")
		.bind(&blog_id)
		.execute(&mut *tx)
		.await?;

	let lists = sqlx::query(
		"UPDATE reading_list SET blogs = array_remove(blogs, $1) WHERE $1 = ANY(blogs)",
	)
	.bind(&blog_id)
	.execute(&mut *tx)
	.await?;

	let blog = sqlx::query("DELETE FROM blog WHERE id = $1")
		.bind(&blog_id)
		.execute(&mut *tx)
		.await?;

	if blog.rows_affected() == 0 {
		return Err(Error::UnknownBlog(blog_id).into());
	}

	if let Err(error) = tx.commit().await {
		tracing::error!(%error, blog = %blog_id, "cascade aborted: blog delete rolled back");

		return Err(error.into());
	}

	tracing::info!(
		blog = %blog_id,
		comments = comments.rows_affected(),
		reading_lists = lists.rows_affected(),
		"removed blog and its dependents"
	);

	Ok(Json(Info::new("Blog is removed.")))
}
