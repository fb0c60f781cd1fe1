use aide::axum::IntoApiResponse;
use argon2::Argon2;
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::IntoResponse,
};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Path, Session},
	notify::Notification,
	openapi::tag,
	route::model::Info,
	session, AppState, Database, Id,
};

use super::{model, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and creating a new password,
/// the scope of this function can remain in here with no issues.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Id,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_str().as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Maps a unique-email constraint violation to [`Error::EmailTaken`].
fn map_email_conflict(e: sqlx::Error) -> RouteError {
	match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("user_email_key") => Error::EmailTaken.into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	}
}

/// Register account
/// Registers a new account, returning the created user and an associated
/// session cookie.
#[route(tag = tag::USER, response(status = 201, description = "Registered successfully.", shape = "Json<model::User>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user_id = Id::new();
	let hashed = hash_password(&state.hasher, &input.password, &user_id).map_err(Error::Argon)?;

	let mut tx = state.database.begin().await?;

	let user = sqlx::query_as::<_, model::User>(
		r#"
			INSERT INTO "user" (id, email, password, full_name, phone_number, preferred_hashtags, notify_email, notify_sms)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
			RETURNING *
		"#,
	)
	.bind(&user_id)
	.bind(&input.email)
	.bind(&hashed[..])
	.bind(&input.full_name)
	.bind(&input.phone_number)
	.bind(&input.preferred_hashtags)
	.bind(input.notify_email)
	.bind(input.notify_sms)
	.fetch_one(&mut *tx)
	.await
	.map_err(map_email_conflict)?;

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO session (user_id) VALUES ($1) RETURNING *",
	)
	.bind(&user_id)
	.fetch_one(&mut *tx)
	.await?;

	tx.commit().await?;

	let cookie = session::create_cookie(session.id);

	Ok((
		StatusCode::CREATED,
		[(header::SET_COOKIE, cookie.to_string())],
		Json(user),
	)
		.into_response())
}

/// Log in
/// Logs in to an account, returning an associated session cookie.
#[route(tag = tag::USER, response(status = 200, description = "Logged in successfully.", shape = "Json<model::Session>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(input): Json<model::LoginInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE email = $1"#)
		.bind(&input.email)
		.fetch_optional(&state.database)
		.await?;

	let Some(user) = user else {
		return Err(Error::InvalidEmailOrPassword.into());
	};

	let hashed = hash_password(&state.hasher, &input.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		return Err(Error::InvalidEmailOrPassword.into());
	}

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO session (user_id) VALUES ($1) RETURNING *",
	)
	.bind(&user.id)
	.fetch_one(&state.database)
	.await?;

	let cookie = session::create_cookie(session.id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)).into_response())
}

/// Log out
/// Logs out of the authenticated session, clearing the session cookie.
#[route(tag = tag::USER)]
pub async fn logout(
	State(database): State<Database>,
	session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	sqlx::query("DELETE FROM session WHERE id = $1")
		.bind(session.id)
		.execute(&database)
		.await?;

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		Json(Info::new("Logged out")),
	)
		.into_response())
}

/// Get session user
/// Returns the authenticated user.
#[route(tag = tag::USER)]
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}

/// Get all users
/// Returns every user, newest first.
#[route(tag = tag::USER)]
pub async fn get_users(
	State(database): State<Database>,
	_session: Session,
) -> Result<Json<Vec<model::User>>, RouteError> {
	let users = sqlx::query_as::<_, model::User>(
		r#"
			SELECT * FROM "user"
			ORDER BY created_at DESC
		"#,
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(users))
}

/// Update user
/// Merges the given fields into the authenticated user's profile.
#[route(tag = tag::USER)]
pub async fn update_me(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::UpdateUserInput>,
) -> Result<Json<model::User>, RouteError> {
	// TODO: propagate full_name changes to the denormalized author copies
	// on blog and comment rows.
	let user = sqlx::query_as::<_, model::User>(
		r#"
			UPDATE "user"
			SET email = COALESCE($1, email),
				full_name = COALESCE($2, full_name),
				phone_number = COALESCE($3, phone_number),
				preferred_hashtags = COALESCE($4::text[], preferred_hashtags),
				notify_email = COALESCE($5, notify_email),
				notify_sms = COALESCE($6, notify_sms)
			WHERE id = $7
			RETURNING *
		"#,
	)
	.bind(input.email)
	.bind(input.full_name)
	.bind(input.phone_number)
	.bind(input.preferred_hashtags)
	.bind(input.notify_email)
	.bind(input.notify_sms)
	.bind(&session.user.id)
	.fetch_one(&state.database)
	.await
	.map_err(map_email_conflict)?;

	Ok(Json(user))
}

/// Reset password
/// Replaces the password of the account behind the given email with a random
/// temporary one and emits an email notification intent carrying it.
#[route(tag = tag::USER)]
pub async fn reset_password(
	State(state): State<AppState>,
	Json(input): Json<model::ResetPasswordInput>,
) -> Result<Json<Info>, RouteError> {
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE email = $1"#)
		.bind(&input.email)
		.fetch_optional(&state.database)
		.await?;

	let Some(user) = user else {
		return Err(Error::UnknownUser.into());
	};

	let temporary = Uuid::new_v4().simple().to_string();
	let temporary = &temporary[..8];

	let hashed = hash_password(&state.hasher, temporary, &user.id).map_err(Error::Argon)?;

	sqlx::query(r#"UPDATE "user" SET password = $1 WHERE id = $2"#)
		.bind(&hashed[..])
		.bind(&user.id)
		.execute(&state.database)
		.await?;

	state.notifier.send(Notification::Email {
		to: user.email,
		subject: "Password Reset Information".into(),
		body: format!(
			"Your password has been reset. New password is: {temporary}. \
			Please do not share it with others."
		),
	});

	Ok(Json(Info::new("Mail has been sent to user email")))
}

/// Change password
/// Replaces the authenticated user's password. When the user opted into SMS
/// notifications, emits an SMS notification intent to their phone number.
#[route(tag = tag::USER)]
pub async fn change_password(
	State(state): State<AppState>,
	session: Session,
	Json(input): Json<model::ChangePasswordInput>,
) -> Result<Json<model::User>, RouteError> {
	let hashed =
		hash_password(&state.hasher, &input.password, &session.user.id).map_err(Error::Argon)?;

	let user = sqlx::query_as::<_, model::User>(
		r#"UPDATE "user" SET password = $1 WHERE id = $2 RETURNING *"#,
	)
	.bind(&hashed[..])
	.bind(&session.user.id)
	.fetch_one(&state.database)
	.await?;

	if user.notify_sms {
		state.notifier.send(Notification::Sms {
			to: format!("+{}", user.phone_number),
			body: format!(
				"Your password has been changed successfully. New password is {}",
				input.password
			),
		});
	}

	Ok(Json(user))
}

/// Delete user
/// Deletes the authenticated user's account together with everything they
/// own: authored blogs (with their comments and reading list entries), their
/// own comments and reading lists, their likes and their sessions. All steps
/// run in one transaction and the response is sent only after the commit.
/// This action is irreversible.
#[route(tag = tag::USER)]
pub async fn delete_user(
	State(database): State<Database>,
	Path(user_id): Path<Id>,
	session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	if session.user.id != user_id {
		return Err(Error::NotAccountOwner.into());
	}

	let mut tx = database.begin().await?;

	let blogs = sqlx::query_scalar::<_, Id>("SELECT id FROM blog WHERE user_id = $1")
		.bind(&user_id)
		.fetch_all(&mut *tx)
		.await?;

	// Dependents of the user's own blogs go first, so the liked-by cleanup
	// below never touches rows that are about to disappear anyway.
	sqlx::query("DELETE FROM comment WHERE blog_id = ANY($1) OR user_id = $2")
		.bind(&blogs)
		.bind(&user_id)
		.execute(&mut *tx)
		.await?;

	sqlx::query(
		r#"
			UPDATE reading_list
			SET blogs = ARRAY(SELECT entry FROM unnest(blogs) AS entry WHERE NOT (entry = ANY($1)))
			WHERE blogs && $1
		"#,
	)
	.bind(&blogs)
	.execute(&mut *tx)
	.await?;

	sqlx::query("DELETE FROM blog WHERE user_id = $1")
		.bind(&user_id)
		.execute(&mut *tx)
		.await?;

	sqlx::query("DELETE FROM reading_list WHERE user_id = $1")
		.bind(&user_id)
		.execute(&mut *tx)
		.await?;

	let likes = sqlx::query(
		r#"
			UPDATE blog
			SET liked_by = array_remove(liked_by, $1), likes = likes - 1
			WHERE $1 = ANY(liked_by)
		"#,
	)
	.bind(&user_id)
	.execute(&mut *tx)
	.await?;

	sqlx::query("DELETE FROM session WHERE user_id = $1")
		.bind(&user_id)
		.execute(&mut *tx)
		.await?;

	let user = sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
		.bind(&user_id)
		.execute(&mut *tx)
		.await?;

	if user.rows_affected() == 0 {
		return Err(Error::UnknownUser.into());
	}

	if let Err(error) = tx.commit().await {
		tracing::error!(%error, user = %user_id, "cascade aborted: user delete rolled back");

		return Err(error.into());
	}

	tracing::info!(
		user = %user_id,
		blogs = blogs.len(),
		likes_removed = likes.rows_affected(),
		"removed user and their content"
	);

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		Json(Info::new("User has been removed")),
	)
		.into_response())
}
