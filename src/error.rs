use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message presented to the client, optionally scoped to an
/// input field and carrying structured details.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	pub content: Cow<'a, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

/// The wire shape of every error response: a human-readable message and the
/// HTTP status, with optional per-field messages. Anything uncategorized
/// defaults to 500.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorBody<'a> {
	pub message: Cow<'a, str>,
	pub status: u16,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub errors: Vec<Message<'a>>,
}

/// Implemented by every route module's error type.
///
/// The Display impl is sent to the client as the top-level message, so it
/// must not contain sensitive information.
pub trait ErrorShape: std::fmt::Display {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;
}

pub fn respond<'a>(
	status: StatusCode,
	message: impl Into<Cow<'a, str>>,
	errors: Vec<Message<'a>>,
) -> Response<Body> {
	(
		status,
		Json(ErrorBody {
			message: message.into(),
			status: status.as_u16(),
			errors,
		}),
	)
		.into_response()
}

/// Failures that can occur in any route: extractor rejections and database
/// errors. Route-specific failures live in each route module's own error
/// type and reach the client through [`RouteError`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("Validation failed")]
	Validation(#[from] validator::ValidationErrors),
	#[error("Request body is not valid JSON")]
	Json(#[from] rejection::JsonRejection),
	#[error("Please enter a valid id")]
	Path(#[from] rejection::PathRejection),
	#[error("Internal server error")]
	Database(#[from] sqlx::Error),
}

impl AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Path(..) => StatusCode::BAD_REQUEST,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		match self {
			Self::Validation(errors) => {
				let errors = errors
					.field_errors()
					.into_iter()
					.flat_map(|(field, errors)| {
						errors.iter().map(move |error| Message {
							content: error.code.clone(),
							field: Some(Cow::Borrowed(field)),
							details: None,
						})
					})
					.collect();

				respond(status, "Validation failed", errors)
			}
			Self::Json(error) => respond(status, error.to_string(), Vec::new()),
			Self::Path(error) => respond(status, error.to_string(), Vec::new()),
			Self::Database(error) => {
				tracing::error!(%error, "database failure");

				respond(status, "Internal server error", Vec::new())
			}
		}
	}
}

impl aide::OperationOutput for AppError {
	type Inner = Self;
}

/// An error returned from a route: either a module-specific failure or an
/// app-level one. Each route module aliases this with its own error type
/// and adds the `From<Error>` conversion.
#[derive(Debug)]
pub enum RouteError<E> {
	Route(E),
	App(AppError),
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Route(error) => {
				let status = error.status();
				let message = error.to_string();
				let errors = error.errors();

				respond(status, message, errors)
			}
			Self::App(error) => error.into_response(),
		}
	}
}

impl<E: ErrorShape> aide::OperationOutput for RouteError<E> {
	type Inner = Self;
}
