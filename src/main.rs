#![warn(clippy::pedantic)]

mod error;
mod extract;
mod id;
mod notify;
mod openapi;
mod ratelimit;
mod route;
mod session;
#[cfg(test)]
mod test;
mod trace;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub use id::Id;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the database connection pool, the hash configuration (expensive to
/// create) and the notifier handle.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub notifier: notify::Notifier,
}

/// Builds the application router and its OpenAPI document.
///
/// Rate limiting is applied around this in [`main`] so tests exercise the
/// routes without a client address.
pub fn router(state: State) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/blogs", route::blog::routes())
		.nest("/comments", route::comment::routes())
		.nest("/readinglists", route::readinglist::routes())
		.nest("/users", route::user::routes())
		.nest_api_service("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive())
				.layer(Extension(Arc::new(api))),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	let _guard = trace::init_tracing_subscriber();

	dotenvy::dotenv().ok();

	let state = State {
		database: Database::connect(
			&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
		)
		.await
		.expect("failed to connect to database"),
		hasher: Argon2::default(),
		notifier: notify::Notifier::spawn(),
	};

	sqlx::migrate!()
		.run(&state.database)
		.await
		.expect("failed to run migrations");

	let governor = ratelimit::default();

	ratelimit::cleanup_old_limits(&[&governor, &ratelimit::secure()]);

	let app = router(state).layer(GovernorLayer { config: governor });

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(listener, app).await.unwrap();
}
