use std::{
	collections::HashMap,
	hash::Hash,
	sync::Mutex,
	time::{Duration, Instant},
};

/// A small in-process cache with per-entry expiry. Entries are dropped lazily
/// on access.
pub struct TtlCache<K, V> {
	ttl: Duration,
	entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
	pub fn new(ttl: Duration) -> Self {
		Self { ttl, entries: Mutex::new(HashMap::new()) }
	}

	pub fn get(&self, key: &K) -> Option<V> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		match entries.get(key) {
			Some((inserted_at, value)) if inserted_at.elapsed() < self.ttl => {
				Some(value.clone())
			},
			Some(_) => {
				entries.remove(key);

				None
			},
			None => None,
		}
	}

	pub fn set(&self, key: K, value: V) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.insert(key, (Instant::now(), value));
	}

	pub fn invalidate(&self, key: &K) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.remove(key);
	}
}
