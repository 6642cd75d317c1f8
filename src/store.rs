//! Storage contracts and built-in store implementations for shared credentials.
//!
//! A [`CredentialStore`] lets several client replicas share one access token (and ticket)
//! instead of each refreshing its own; the platform invalidates older tokens once a newer one
//! is issued, so unshared replicas end up rejecting each other's credentials. Stores are
//! advisory: values read back are always re-validated against their expiry before use.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AppId, Credential, CredentialKind},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by credential stores.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the credential stored under `key`, if present.
	///
	/// Implementations may return expired values; callers check expiry themselves.
	fn fetch<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<Credential>>;

	/// Persists or replaces the credential stored under `key`.
	fn save<'a>(&'a self, key: &'a StoreKey, credential: Credential) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a stored credential.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreKey {
	/// Application the credential belongs to.
	pub app_id: AppId,
	/// Credential kind.
	pub kind: CredentialKind,
}
impl StoreKey {
	/// Builds a key for the provided application and credential kind.
	pub fn new(app_id: &AppId, kind: CredentialKind) -> Self {
		Self { app_id: app_id.clone(), kind }
	}

	/// Flat `appid:kind` form, handy for key-value backends.
	pub fn flatten(&self) -> String {
		format!("{}:{}", self.app_id, self.kind.as_str())
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.flatten())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "redis unreachable".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("redis unreachable"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn store_keys_partition_by_app_and_kind() {
		let app = AppId::new("wx-store").expect("App fixture should be valid.");
		let token = StoreKey::new(&app, CredentialKind::AccessToken);
		let ticket = StoreKey::new(&app, CredentialKind::JsapiTicket);

		assert_ne!(token, ticket);
		assert_eq!(token.flatten(), "wx-store:access_token");
		assert_eq!(ticket.to_string(), "wx-store:jsapi_ticket");
	}
}
