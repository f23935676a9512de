//! Thread-safe expiring cache keyed by access token.
//!
//! Entries are only visible while `now < expires_at`. Expired entries are evicted lazily by the
//! read that observes them; there is no background sweep and no capacity bound.

// self
use crate::{_prelude::*, auth::Profile};

/// TTL applied to cached profiles, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 3_600;

type CacheMap<T> = Arc<Mutex<HashMap<String, CacheEntry<T>>>>;

/// Cached value alongside the instant it stops being visible.
#[derive(Clone, Debug)]
pub struct CacheEntry<T> {
	/// Cached payload.
	pub data: T,
	/// First instant at which the entry is considered expired.
	pub expires_at: OffsetDateTime,
}
impl<T> CacheEntry<T> {
	/// Returns true if the entry is expired at the provided instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}
}

/// Cache used by the client for `/users/@me` lookups.
pub type ProfileCache = TokenCache<Profile>;

/// In-process expiring map from raw access token to cached data.
pub struct TokenCache<T>(CacheMap<T>);
impl<T> TokenCache<T>
where
	T: Clone,
{
	/// Stores `data` for one hour, replacing any existing entry.
	pub fn set(&self, key: impl Into<String>, data: T) {
		self.set_with_ttl(key, data, Duration::seconds(DEFAULT_TTL_SECS));
	}

	/// Stores `data` for `ttl`, replacing any existing entry.
	pub fn set_with_ttl(&self, key: impl Into<String>, data: T, ttl: Duration) {
		self.set_at(key, data, ttl, OffsetDateTime::now_utc());
	}

	/// Stores `data` as if written at `now`.
	pub fn set_at(&self, key: impl Into<String>, data: T, ttl: Duration, now: OffsetDateTime) {
		let entry = CacheEntry { data, expires_at: now.saturating_add(ttl) };

		self.0.lock().insert(key.into(), entry);
	}

	/// Returns the cached data if present and unexpired.
	pub fn get(&self, key: &str) -> Option<T> {
		self.get_at(key, OffsetDateTime::now_utc())
	}

	/// Returns the cached data as observed at `now`, evicting the entry if it has expired.
	pub fn get_at(&self, key: &str, now: OffsetDateTime) -> Option<T> {
		let mut map = self.0.lock();
		let expired = map.get(key)?.is_expired_at(now);

		if expired {
			map.remove(key);

			return None;
		}

		map.get(key).map(|entry| entry.data.clone())
	}

	/// Drops the entry for `key`, returning its data if one was stored.
	pub fn remove(&self, key: &str) -> Option<T> {
		self.0.lock().remove(key).map(|entry| entry.data)
	}

	/// Drops every entry.
	pub fn clear(&self) {
		self.0.lock().clear();
	}

	/// Number of stored entries, including expired ones not yet read.
	pub fn len(&self) -> usize {
		self.0.lock().len()
	}

	/// Returns true if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.lock().is_empty()
	}
}
impl<T> Clone for TokenCache<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}
impl<T> Default for TokenCache<T> {
	fn default() -> Self {
		Self(Default::default())
	}
}
impl<T> Debug for TokenCache<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// Keys are bearer credentials.
		f.debug_struct("TokenCache").field("entries", &self.0.lock().len()).finish()
	}
}
