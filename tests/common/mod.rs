#![allow(dead_code)]

// std
use std::{
	collections::{HashMap, VecDeque},
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use url::Url;
// self
use wx_broker::{
	auth::{AppId, Secret},
	config::{Channel, ClientConfig},
	error::TransportError,
	flows::Client,
	http::{HttpTransport, TransportFuture, TransportRequest, TransportResponse},
	store::{CredentialStore, MemoryStore},
};

pub const APP_ID: &str = "wx-test-app";

pub fn config(base_url: &str, channel: Channel) -> ClientConfig {
	ClientConfig::builder(
		AppId::new(APP_ID).expect("Test app identifier should be valid."),
		Secret::new("test-secret"),
	)
	.channel(channel)
	.base_url(Url::parse(base_url).expect("Mock server URL should parse successfully."))
	.build()
	.expect("Test client configuration should build successfully.")
}

/// Reqwest-backed client plus the memory store it writes through to.
pub fn reqwest_client(
	base_url: &str,
	channel: Channel,
) -> (Client<wx_broker::http::ReqwestTransport>, Arc<MemoryStore>) {
	let backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn CredentialStore> = backend.clone();
	let transport = wx_broker::http::ReqwestTransport::default();
	let client = Client::with_transport(config(base_url, channel), transport).with_store(store);

	(client, backend)
}

pub fn json(body: serde_json::Value) -> TransportResponse {
	TransportResponse::json(body.to_string())
}

/// Deterministic transport answering from per-path queues.
///
/// The last queued response of a path is repeated once the queue drains. Every call sleeps for
/// `latency` first so concurrent callers overlap.
#[derive(Default)]
pub struct ScriptedTransport {
	latency: StdDuration,
	responses: Mutex<HashMap<String, VecDeque<Result<TransportResponse, u16>>>>,
	requests: Mutex<Vec<TransportRequest>>,
	sends: AtomicUsize,
}
impl ScriptedTransport {
	pub fn with_latency(latency: StdDuration) -> Self {
		Self { latency, ..Default::default() }
	}

	pub fn push(&self, path: &str, response: TransportResponse) -> &Self {
		self.queue(path, Ok(response))
	}

	/// Queues a network-level failure reported as `TransportError::Status`.
	pub fn push_failure(&self, path: &str, status: u16) -> &Self {
		self.queue(path, Err(status))
	}

	pub fn calls(&self, path: &str) -> usize {
		self.requests
			.lock()
			.expect("Request log lock poisoned.")
			.iter()
			.filter(|r| r.url.path() == path)
			.count()
	}

	pub fn requests(&self) -> Vec<TransportRequest> {
		self.requests.lock().expect("Request log lock poisoned.").clone()
	}

	pub fn total_sends(&self) -> usize {
		self.sends.load(Ordering::SeqCst)
	}

	fn queue(&self, path: &str, response: Result<TransportResponse, u16>) -> &Self {
		self.responses
			.lock()
			.expect("Response queue lock poisoned.")
			.entry(path.to_owned())
			.or_default()
			.push_back(response);

		self
	}

	fn next(&self, path: &str) -> Result<TransportResponse, u16> {
		let mut responses = self.responses.lock().expect("Response queue lock poisoned.");
		let queue = responses
			.get_mut(path)
			.unwrap_or_else(|| panic!("No scripted response for {path}."));

		if queue.len() > 1 {
			queue.pop_front().expect("Queue length was checked.")
		} else {
			queue.front().cloned().expect("Scripted queues are never empty.")
		}
	}
}
impl HttpTransport for ScriptedTransport {
	fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			self.sends.fetch_add(1, Ordering::SeqCst);

			if !self.latency.is_zero() {
				tokio::time::sleep(self.latency).await;
			}

			let path = request.url.path().to_owned();

			self.requests.lock().expect("Request log lock poisoned.").push(request);

			self.next(&path).map_err(|status| TransportError::Status { status })
		})
	}
}

pub fn scripted_client(transport: Arc<ScriptedTransport>) -> Client<ScriptedTransport> {
	Client::with_transport(config("https://api.weixin.qq.com", Channel::OfficialAccount), transport)
}
