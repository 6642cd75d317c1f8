//! WeChat platform client built around a concurrency-safe access token broker: singleflight
//! refreshes, pluggable cross-replica credential stores, JS-SDK signing, and typed endpoint
//! wrappers in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod sign;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AppId, Secret},
		config::{Channel, ClientConfig},
		flows::Client,
		http::ReqwestTransport,
		store::{CredentialStore, MemoryStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestTransport>;

	/// Builds a configuration pointing every endpoint at `base_url` (usually an `httpmock`
	/// server) for the provided channel.
	pub fn test_config(base_url: &str, channel: Channel) -> ClientConfig {
		let base = Url::parse(base_url).expect("Mock server URL should parse successfully.");

		ClientConfig::builder(
			AppId::new("wx-test-app").expect("Test app identifier should be valid."),
			Secret::new("test-secret"),
		)
		.channel(channel)
		.base_url(base)
		.build()
		.expect("Test client configuration should build successfully.")
	}

	/// Constructs a [`Client`] backed by an in-memory store and the reqwest transport used
	/// across integration tests.
	pub fn build_reqwest_test_client(base_url: &str) -> (ReqwestTestClient, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let config = test_config(base_url, Channel::OfficialAccount);
		let client = Client::with_transport(config, ReqwestTransport::default()).with_store(store);

		(client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
