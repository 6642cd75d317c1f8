//! Shared helpers for the credential managers (store read-through, write-through, lifetimes).

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialKind},
	error::{CredentialFetchError, DecodeError},
	flows::RefreshMetrics,
	obs,
	store::{CredentialStore, StoreKey},
};

/// Upstream lifetime in seconds as reported by the credential endpoints.
pub(crate) fn credential_from_lifetime(
	value: String,
	issued_at: OffsetDateTime,
	expires_in: i64,
	safety_margin: Duration,
) -> Result<Credential> {
	if expires_in <= 0 {
		return Err(DecodeError::InvalidExpiresIn { expires_in }.into());
	}

	Credential::from_lifetime(value, issued_at, Duration::seconds(expires_in), safety_margin)
		.ok_or_else(|| DecodeError::InvalidExpiresIn { expires_in }.into())
}

/// Everything a refresh future needs to consult and update the external store.
#[derive(Clone)]
pub(crate) struct StoreHandle {
	pub(crate) key: StoreKey,
	pub(crate) store: Option<Arc<dyn CredentialStore>>,
	pub(crate) metrics: Arc<RefreshMetrics>,
}
impl StoreHandle {
	fn kind(&self) -> CredentialKind {
		self.key.kind
	}

	/// Runs one refresh: store read (unless forced), upstream fetch, store write.
	///
	/// Store failures are logged and never fail the refresh; the upstream stays authoritative.
	pub(crate) async fn read_through<F, Fut>(
		self,
		force: bool,
		fetch: F,
	) -> Result<Credential, CredentialFetchError>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<Credential>>,
	{
		if !force {
			if let Some(credential) = self.load().await {
				self.metrics.record_store_hit();
				obs::debug!(key = %self.key, "Adopted credential from the external store.");

				return Ok(credential);
			}
		}

		self.metrics.record_fetch();

		let credential = fetch().await.map_err(|e| CredentialFetchError::new(self.kind(), e))?;

		self.persist(&credential).await;

		Ok(credential)
	}

	async fn load(&self) -> Option<Credential> {
		let store = self.store.as_ref()?;

		match store.fetch(&self.key).await {
			Ok(credential) => credential.filter(Credential::is_valid),
			Err(e) => {
				obs::warn!(
					key = %self.key,
					error = %e,
					"External store read failed; fetching upstream."
				);

				#[cfg(not(feature = "tracing"))]
				let _ = e;

				None
			},
		}
	}

	async fn persist(&self, credential: &Credential) {
		let Some(store) = self.store.as_ref() else { return };

		if let Err(e) = store.save(&self.key, credential.clone()).await {
			obs::warn!(
				key = %self.key,
				error = %e,
				"External store write failed; keeping the credential in memory only."
			);

			#[cfg(not(feature = "tracing"))]
			let _ = e;
		}
	}
}
impl Debug for StoreHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StoreHandle")
			.field("key", &self.key)
			.field("store_configured", &self.store.is_some())
			.finish()
	}
}
