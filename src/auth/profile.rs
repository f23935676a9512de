//! Authenticated user profile returned by `/api/v1/users/@me`.

// self
use crate::_prelude::*;

/// Raw profile object with typed accessors for the fields the client relies on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(pub serde_json::Map<String, JsonValue>);
impl Profile {
	/// User identifier; numeric identifiers are rendered as strings.
	pub fn id(&self) -> Option<String> {
		match self.0.get("id")? {
			JsonValue::String(id) => Some(id.clone()),
			JsonValue::Number(id) => Some(id.to_string()),
			_ => None,
		}
	}

	/// Display username, when present.
	pub fn username(&self) -> Option<&str> {
		self.0.get("username").and_then(JsonValue::as_str)
	}

	/// Looks up any other profile field.
	pub fn get(&self, field: &str) -> Option<&JsonValue> {
		self.0.get(field)
	}
}
