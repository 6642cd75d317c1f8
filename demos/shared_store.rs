//! Demonstrates two replicas sharing one access token through a file-backed store: only the
//! first replica contacts the platform, the second adopts the persisted token.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use wx_broker::{
	auth::{AppId, Secret},
	config::ClientConfig,
	flows::Client,
	store::{CredentialStore, FileStore},
};

fn replica(
	base_url: &str,
	store: Arc<dyn CredentialStore>,
) -> Result<wx_broker::flows::DefaultClient> {
	let config = ClientConfig::builder(AppId::new("wx-demo")?, Secret::new("demo-secret"))
		.base_url(Url::parse(base_url)?)
		.build()?;

	Ok(Client::new(config).with_store(store))
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"shared-access\",\"expires_in\":7200}");
		})
		.await;
	let path = env::temp_dir().join(format!("wx_broker_demo_{}.json", std::process::id()));
	let first = replica(&server.base_url(), Arc::new(FileStore::open(&path)?))?;
	let second = replica(&server.base_url(), Arc::new(FileStore::open(&path)?))?;
	let a = first.get_token(false).await?;
	let b = second.get_token(false).await?;

	println!("Replica A token expires at {}.", a.expires_at);
	println!("Replica B reused the same token: {}.", a == b);
	println!("Upstream fetches: {}.", token_mock.hits_async().await);

	std::fs::remove_file(&path)?;

	Ok(())
}
