//! Thread-safe in-memory [`CredentialStore`] implementation.
//!
//! Useful for tests and for sharing one credential between several clients living in the same
//! process; it does not survive restarts.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	store::{CredentialStore, StoreError, StoreFuture, StoreKey},
};

type StoreMap = Arc<RwLock<HashMap<StoreKey, Credential>>>;

/// Thread-safe storage backend that keeps credentials in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the number of stored credentials.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing has been stored yet.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn save_now(map: StoreMap, key: StoreKey, credential: Credential) -> Result<(), StoreError> {
		map.write().insert(key, credential);

		Ok(())
	}

	fn fetch_now(map: StoreMap, key: &StoreKey) -> Option<Credential> {
		map.read().get(key).cloned()
	}
}
impl CredentialStore for MemoryStore {
	fn fetch<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<Credential>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::fetch_now(map, key)) })
	}

	fn save<'a>(&'a self, key: &'a StoreKey, credential: Credential) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Self::save_now(map, key, credential) })
	}
}
