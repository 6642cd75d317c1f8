//! Credential managers, request dispatch, and the [`Client`] facade that wires them together.

pub mod dispatch;
pub mod ticket;
pub mod token;

mod common;
mod refresh;

pub use dispatch::*;
pub use refresh::RefreshMetrics;
pub use ticket::*;
pub use token::*;

pub(crate) use refresh::{RefreshCell, RefreshOutcome};

// self
use crate::{
	_prelude::*,
	auth::Credential,
	config::ClientConfig,
	http::HttpTransport,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type DefaultClient = Client<ReqwestTransport>;

/// Platform client for one application.
///
/// The client owns the configuration, the transport, and the optional external store, and
/// builds one [`TokenManager`], one [`TicketManager`], and one [`Dispatcher`] on top of them.
/// Clones share the same managers, so every clone observes the same cached credentials and joins
/// the same in-flight refreshes.
pub struct Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Validated application configuration.
	pub config: Arc<ClientConfig>,
	/// Transport used for every outbound request.
	pub transport: Arc<C>,
	/// External store shared with other replicas, if any.
	pub store: Option<Arc<dyn CredentialStore>>,
	tokens: TokenManager<C>,
	tickets: TicketManager<C>,
	dispatcher: Dispatcher<C>,
}
impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<C>>) -> Self {
		Self::assemble(Arc::new(config), transport.into(), None)
	}

	/// Attaches an external credential store; builder form of [`Client::set_store`].
	pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
		self.set_store(Some(store));

		self
	}

	/// Replaces (or removes) the external credential store.
	///
	/// Credentials already cached in memory are kept; later refreshes consult and update the new
	/// store. Clones taken earlier still share the cached credentials but write to the old store.
	pub fn set_store(&mut self, store: Option<Arc<dyn CredentialStore>>) {
		let tokens = self.tokens.rebind(store.clone());
		let dispatcher =
			Dispatcher::new(self.transport.clone(), self.config.clone(), tokens.clone());

		self.tickets = self.tickets.rebind(dispatcher.clone(), store.clone());
		self.tokens = tokens;
		self.dispatcher = dispatcher;
		self.store = store;
	}

	fn assemble(
		config: Arc<ClientConfig>,
		transport: Arc<C>,
		store: Option<Arc<dyn CredentialStore>>,
	) -> Self {
		let tokens = TokenManager::new(transport.clone(), config.clone(), store.clone());
		let dispatcher = Dispatcher::new(transport.clone(), config.clone(), tokens.clone());
		let tickets = TicketManager::new(dispatcher.clone(), store.clone());

		Self { config, transport, store, tokens, tickets, dispatcher }
	}

	/// Access token manager.
	pub fn tokens(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// JS-SDK ticket manager.
	pub fn tickets(&self) -> &TicketManager<C> {
		&self.tickets
	}

	/// Request dispatcher used by the endpoint wrappers.
	pub fn dispatcher(&self) -> &Dispatcher<C> {
		&self.dispatcher
	}

	/// Shorthand for [`TokenManager::get_token`].
	pub async fn get_token(&self, force_refresh: bool) -> Result<Credential> {
		self.tokens.get_token(force_refresh).await
	}

	/// Shorthand for [`TicketManager::get_ticket`].
	pub async fn get_ticket(&self, force_refresh: bool) -> Result<Credential> {
		self.tickets.get_ticket(force_refresh).await
	}

	/// Sends an arbitrary platform call through the dispatcher.
	pub async fn request<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.dispatcher.dispatch(request).await
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_transport(config, ReqwestTransport::default())
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			transport: self.transport.clone(),
			store: self.store.clone(),
			tokens: self.tokens.clone(),
			tickets: self.tickets.clone(),
			dispatcher: self.dispatcher.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("store_configured", &self.store.is_some())
			.finish()
	}
}
