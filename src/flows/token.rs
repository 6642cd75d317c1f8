//! Access token manager.

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialKind},
	config::ClientConfig,
	error::{ConfigError, CredentialFetchError},
	flows::{RefreshCell, RefreshMetrics, RefreshOutcome, common::{self, StoreHandle}, dispatch},
	http::{HttpTransport, TransportRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::{CredentialStore, StoreKey},
};

const TOKEN_PATH: &str = "/cgi-bin/token";

#[derive(Deserialize)]
struct AccessTokenGrant {
	access_token: String,
	expires_in: i64,
}

/// Owns the application access token: caching, deduplicated refreshes, and store sharing.
pub struct TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	transport: Arc<C>,
	config: Arc<ClientConfig>,
	store: Option<Arc<dyn CredentialStore>>,
	cell: RefreshCell,
}
impl<C> TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) fn new(
		transport: Arc<C>,
		config: Arc<ClientConfig>,
		store: Option<Arc<dyn CredentialStore>>,
	) -> Self {
		Self { transport, config, store, cell: RefreshCell::default() }
	}

	/// Same token slot, different store.
	pub(crate) fn rebind(&self, store: Option<Arc<dyn CredentialStore>>) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			store,
			cell: self.cell.clone(),
		}
	}

	/// Returns a valid access token, refreshing it when missing, expired, or forced.
	///
	/// Concurrent callers share one upstream fetch and observe the same result.
	pub async fn get_token(&self, force_refresh: bool) -> Result<Credential> {
		self.acquire(force_refresh).await.map(|outcome| outcome.credential)
	}

	/// Replaces a token the platform just rejected.
	///
	/// When another caller already swapped in a different valid token, that token is returned
	/// without a new fetch. A forced refresh that merely joined an in-flight one and produced the
	/// rejected value again is followed by one refresh of this caller's own.
	pub async fn refresh_rejected(&self, rejected: &Credential) -> Result<Credential> {
		if let Some(current) = self.cell.cached_at(OffsetDateTime::now_utc()) {
			if current.expose() != rejected.expose() {
				obs::debug!("Rejected access token already replaced by a concurrent refresh.");

				return Ok(current);
			}
		}

		let outcome = self.acquire(true).await?;

		if outcome.joined && outcome.credential.expose() == rejected.expose() {
			return self.get_token(true).await;
		}

		Ok(outcome.credential)
	}

	/// Returns the cached token without refreshing, even when expired.
	pub fn cached(&self) -> Option<Credential> {
		self.cell.current()
	}

	/// Returns `true` while an upstream token refresh is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.cell.is_refreshing()
	}

	/// Counters describing this manager's activity.
	pub fn metrics(&self) -> &Arc<RefreshMetrics> {
		self.cell.metrics()
	}

	async fn acquire(&self, force_refresh: bool) -> Result<RefreshOutcome> {
		const KIND: FlowKind = FlowKind::AccessToken;

		self.metrics().record_attempt();

		if !force_refresh {
			if let Some(credential) = self.cell.cached_at(OffsetDateTime::now_utc()) {
				self.metrics().record_cache_hit();

				return Ok(RefreshOutcome { credential, joined: false });
			}
		}

		let span = FlowSpan::new(KIND, &self.config.app_id, "get_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result =
			span.instrument(self.cell.run(force_refresh, || self.refresh(force_refresh))).await;

		match &result {
			Ok(outcome) => {
				span.record_joined(outcome.joined);
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		Ok(result?)
	}

	fn refresh(
		&self,
		force: bool,
	) -> impl 'static + Send + Future<Output = Result<Credential, CredentialFetchError>> + use<C> {
		let transport = self.transport.clone();
		let config = self.config.clone();
		let handle = StoreHandle {
			key: StoreKey::new(&config.app_id, CredentialKind::AccessToken),
			store: self.store.clone(),
			metrics: self.metrics().clone(),
		};

		async move {
			handle
				.read_through(force, || fetch_access_token(transport.as_ref(), config.as_ref()))
				.await
		}
	}
}
impl<C> Clone for TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			store: self.store.clone(),
			cell: self.cell.clone(),
		}
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("app_id", &self.config.app_id)
			.field("cell", &self.cell)
			.field("store_configured", &self.store.is_some())
			.finish()
	}
}

async fn fetch_access_token<C>(transport: &C, config: &ClientConfig) -> Result<Credential>
where
	C: ?Sized + HttpTransport,
{
	let mut url = config.resolve(TOKEN_PATH).map_err(|source| ConfigError::InvalidRequestUrl {
		path: TOKEN_PATH.into(),
		source,
	})?;

	url.query_pairs_mut()
		.append_pair("grant_type", "client_credential")
		.append_pair("appid", config.app_id.as_ref())
		.append_pair("secret", config.app_secret.expose());

	let issued_at = OffsetDateTime::now_utc();
	let response = transport.send(TransportRequest::get(url)).await?;
	let grant: AccessTokenGrant = dispatch::decode_envelope(&response)?;

	obs::debug!(expires_in = grant.expires_in, "Fetched access token from the platform.");

	common::credential_from_lifetime(
		grant.access_token,
		issued_at,
		grant.expires_in,
		config.safety_margin,
	)
}
