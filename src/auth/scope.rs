//! Scope list used when building authorization URLs.

// std
use std::{slice::Iter, str::FromStr};
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Scope requested when the caller does not name any.
pub const DEFAULT_SCOPE: &str = "identify";

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeError {
	/// Dynamic input was not a sequence of scopes.
	#[error("Scopes must be an array.")]
	NotASequence,
	/// A sequence entry cannot be rendered as a scope.
	#[error("Scope entry at index {index} must be a string, number, or boolean.")]
	UnsupportedEntry {
		/// Position of the offending entry.
		index: usize,
	},
}

/// Ordered, deduplicated list of OAuth scopes.
///
/// Entries are trimmed, empty entries are dropped, and repeats keep their first position, so
/// `["identify", "identify", " email "]` renders as `identify email`. Inner whitespace is kept
/// verbatim, so `["identify email"]` is one entry that renders unchanged.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Creates a normalized scope list from any iterator.
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut list = Vec::new();

		for scope in scopes {
			let trimmed = scope.as_ref().trim();

			if trimmed.is_empty() {
				continue;
			}
			if !list.iter().any(|existing: &String| existing == trimmed) {
				list.push(trimmed.to_owned());
			}
		}

		Self(list)
	}

	/// Builds a scope list from untyped JSON, which must be an array of scalars.
	pub fn from_json(value: &JsonValue) -> Result<Self, ScopeError> {
		let JsonValue::Array(entries) = value else {
			return Err(ScopeError::NotASequence);
		};
		let mut raw = Vec::with_capacity(entries.len());

		for (index, entry) in entries.iter().enumerate() {
			match entry {
				JsonValue::String(s) => raw.push(s.clone()),
				JsonValue::Number(n) => raw.push(n.to_string()),
				JsonValue::Bool(b) => raw.push(b.to_string()),
				_ => return Err(ScopeError::UnsupportedEntry { index }),
			}
		}

		Ok(Self::new(raw))
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over scopes in request order.
	pub fn iter(&self) -> Iter<'_, String> {
		self.0.iter()
	}

	/// Space-delimited representation sent as the `scope` parameter.
	pub fn joined(&self) -> String {
		self.0.join(" ")
	}
}
impl Default for ScopeList {
	fn default() -> Self {
		Self(vec![DEFAULT_SCOPE.to_owned()])
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.joined())
	}
}
impl TryFrom<&JsonValue> for ScopeList {
	type Error = ScopeError;

	fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
		Self::from_json(value)
	}
}
impl FromStr for ScopeList {
	type Err = ScopeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::new(s.split_whitespace()))
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = Iter<'a, String>;
	type Item = &'a String;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in &self.0 {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = JsonValue::deserialize(deserializer)?;

		ScopeList::from_json(&value).map_err(DeError::custom)
	}
}
