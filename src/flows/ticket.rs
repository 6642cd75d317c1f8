//! JS-SDK ticket manager.

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialKind},
	error::CredentialFetchError,
	flows::{ApiRequest, Dispatcher, RefreshCell, RefreshMetrics, common::{self, StoreHandle}},
	http::HttpTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::{CredentialStore, StoreKey},
};

const TICKET_PATH: &str = "/cgi-bin/ticket/getticket";

#[derive(Deserialize)]
struct TicketGrant {
	ticket: String,
	expires_in: i64,
}

/// Owns the `jsapi_ticket` used for JS-SDK signing.
///
/// Shares the refresh discipline of [`TokenManager`](crate::flows::TokenManager) with its own
/// slot and expiry. The upstream fetch goes through the [`Dispatcher`], so it draws a valid
/// access token (refreshing it only when that token is itself stale or rejected).
pub struct TicketManager<C>
where
	C: ?Sized + HttpTransport,
{
	dispatcher: Dispatcher<C>,
	store: Option<Arc<dyn CredentialStore>>,
	cell: RefreshCell,
}
impl<C> TicketManager<C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) fn new(dispatcher: Dispatcher<C>, store: Option<Arc<dyn CredentialStore>>) -> Self {
		Self { dispatcher, store, cell: RefreshCell::default() }
	}

	pub(crate) fn rebind(
		&self,
		dispatcher: Dispatcher<C>,
		store: Option<Arc<dyn CredentialStore>>,
	) -> Self {
		Self { dispatcher, store, cell: self.cell.clone() }
	}

	/// Returns a valid ticket, refreshing it when missing, expired, or `force_refresh` is set.
	pub async fn get_ticket(&self, force_refresh: bool) -> Result<Credential> {
		const KIND: FlowKind = FlowKind::JsapiTicket;

		self.metrics().record_attempt();

		if !force_refresh {
			if let Some(ticket) = self.cell.cached_at(OffsetDateTime::now_utc()) {
				self.metrics().record_cache_hit();

				return Ok(ticket);
			}
		}

		let span = FlowSpan::new(KIND, &self.dispatcher.config().app_id, "get_ticket");

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

		Ok(result?.credential)
	}

	/// Returns the cached ticket without refreshing, even when expired.
	pub fn cached(&self) -> Option<Credential> {
		self.cell.current()
	}

	/// Returns `true` while an upstream ticket refresh is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.cell.is_refreshing()
	}

	/// Counters describing this manager's activity.
	pub fn metrics(&self) -> &Arc<RefreshMetrics> {
		self.cell.metrics()
	}

	fn refresh(
		&self,
		force: bool,
	) -> impl 'static + Send + Future<Output = Result<Credential, CredentialFetchError>> + use<C> {
		let dispatcher = self.dispatcher.clone();
		let handle = StoreHandle {
			key: StoreKey::new(&dispatcher.config().app_id, CredentialKind::JsapiTicket),
			store: self.store.clone(),
			metrics: self.metrics().clone(),
		};

		async move { handle.read_through(force, || fetch_ticket(&dispatcher)).await }
	}
}
impl<C> Clone for TicketManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			dispatcher: self.dispatcher.clone(),
			store: self.store.clone(),
			cell: self.cell.clone(),
		}
	}
}
impl<C> Debug for TicketManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TicketManager")
			.field("cell", &self.cell)
			.field("store_configured", &self.store.is_some())
			.finish()
	}
}

async fn fetch_ticket<C>(dispatcher: &Dispatcher<C>) -> Result<Credential>
where
	C: ?Sized + HttpTransport,
{
	let issued_at = OffsetDateTime::now_utc();
	let grant: TicketGrant =
		dispatcher.dispatch(ApiRequest::get(TICKET_PATH).query("type", "jsapi")).await?;

	obs::debug!(expires_in = grant.expires_in, "Fetched jsapi ticket from the platform.");

	common::credential_from_lifetime(
		grant.ticket,
		issued_at,
		grant.expires_in,
		dispatcher.config().safety_margin,
	)
}
