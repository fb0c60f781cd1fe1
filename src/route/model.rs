use std::borrow::Cow;

use schemars::JsonSchema;
use serde::Serialize;

/// Informational response body used by delete confirmations and by the
/// idempotent no-op paths (repeated likes, repeated reading list membership
/// changes). These respond 200 on purpose: the requested end state already
/// holds.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Info {
	pub message: Cow<'static, str>,
}

impl Info {
	pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
		Self {
			message: message.into(),
		}
	}
}
