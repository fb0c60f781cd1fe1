use std::{
	sync::{Arc, OnceLock},
	time::Duration,
};

use axum::{
	body::Body,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use serde_json::json;
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError,
};

type Config = GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

static DEFAULT: OnceLock<Arc<Config>> = OnceLock::new();
static SECURE: OnceLock<Arc<Config>> = OnceLock::new();

/// Shared limiter applied to the whole application surface.
pub fn default() -> Arc<Config> {
	DEFAULT
		.get_or_init(|| {
			Arc::new(
				GovernorConfigBuilder::default()
					.per_second(10)
					.burst_size(50)
					.use_headers()
					.error_handler(error_handler)
					.finish()
					.unwrap(),
			)
		})
		.clone()
}

/// Stricter limiter for credential endpoints (login, password reset).
pub fn secure() -> Arc<Config> {
	SECURE
		.get_or_init(|| {
			Arc::new(
				GovernorConfigBuilder::default()
					.per_second(1)
					.burst_size(5)
					.use_headers()
					.error_handler(error_handler)
					.finish()
					.unwrap(),
			)
		})
		.clone()
}

fn error_handler(error: GovernorError) -> Response<Body> {
	let (status, message) = match error {
		GovernorError::TooManyRequests { .. } => {
			(StatusCode::TOO_MANY_REQUESTS, "Too many requests")
		}
		GovernorError::UnableToExtractKey => {
			(StatusCode::INTERNAL_SERVER_ERROR, "Unable to identify client")
		}
		GovernorError::Other { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Rate limiter failure"),
	};

	(
		status,
		Json(json!({ "message": message, "status": status.as_u16() })),
	)
		.into_response()
}

pub fn cleanup_old_limits<T, M>(configs: &[&Arc<GovernorConfig<T, M>>])
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiters = configs
		.iter()
		.map(|config| config.limiter().clone())
		.collect::<Vec<_>>();
	let interval = Duration::from_secs(60);

	std::thread::spawn(move || loop {
		std::thread::sleep(interval);

		for limiter in &limiters {
			tracing::debug!("rate limiting storage size: {}", limiter.len());

			limiter.retain_recent();
		}
	});
}
