use std::{fmt, str::FromStr};

use schemars::{
	gen::SchemaGenerator,
	schema::{Schema, SchemaObject},
	JsonSchema,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Length of the hex form.
const LEN: usize = 24;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// An opaque entity identifier: a 24-character lowercase hex string made of
/// a 4-byte unix timestamp followed by 8 random bytes, so ids created later
/// sort after ids created earlier.
///
/// Anything that is not 24 hex characters fails to parse, which rejects the
/// request before any handler logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct Id(String);

impl Id {
	/// Generates a fresh identifier.
	pub fn new() -> Self {
		let seconds = u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
		let entropy = Uuid::new_v4();

		let mut out = String::with_capacity(LEN);

		for byte in seconds.to_be_bytes().iter().chain(&entropy.as_bytes()[..8]) {
			out.push(HEX[usize::from(byte >> 4)] as char);
			out.push(HEX[usize::from(byte & 0xf)] as char);
		}

		Self(out)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for Id {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Debug, thiserror::Error)]
#[error("Please enter a valid id: expected a 24 character hex string")]
pub struct ParseIdError;

impl FromStr for Id {
	type Err = ParseIdError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		if value.len() == LEN && value.bytes().all(|byte| byte.is_ascii_hexdigit()) {
			Ok(Self(value.to_ascii_lowercase()))
		} else {
			Err(ParseIdError)
		}
	}
}

impl Serialize for Id {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for Id {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;

		value.parse().map_err(de::Error::custom)
	}
}

impl JsonSchema for Id {
	fn schema_name() -> String {
		"Id".into()
	}

	fn json_schema(gen: &mut SchemaGenerator) -> Schema {
		let mut schema: SchemaObject = <String>::json_schema(gen).into();

		schema.string().pattern = Some("^[0-9a-fA-F]{24}$".into());
		Schema::Object(schema)
	}
}

#[cfg(test)]
mod test {
	use super::Id;

	#[test]
	fn test_new_is_well_formed() {
		let id = Id::new();

		assert_eq!(id.as_str().len(), 24);
		assert!(id.as_str().bytes().all(|byte| byte.is_ascii_hexdigit()));
	}

	#[test]
	fn test_parse_roundtrip() {
		let id = Id::new();
		let parsed = id.as_str().parse::<Id>().unwrap();

		assert_eq!(id, parsed);
	}

	#[test]
	fn test_parse_normalizes_case() {
		let id = "5FAC1FE8B2345678DEADBEEF".parse::<Id>().unwrap();

		assert_eq!(id.as_str(), "5fac1fe8b2345678deadbeef");
	}

	#[test]
	fn test_parse_rejects_bad_input() {
		assert!("".parse::<Id>().is_err());
		assert!("5fac1fe8".parse::<Id>().is_err());
		assert!("zfac1fe8b2345678deadbeef".parse::<Id>().is_err());
		assert!("5fac1fe8b2345678deadbeef0".parse::<Id>().is_err());
	}
}
