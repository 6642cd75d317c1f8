//! Demonstrates producing a signed `wx.config` payload against a mocked platform: the client
//! fetches the access token, then the jsapi ticket, and signs the page URL.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use wx_broker::{
	api::JsConfigOptions,
	auth::{AppId, Secret},
	config::ClientConfig,
	flows::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":7200}");
		})
		.await;
	let ticket_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/ticket/getticket")
				.query_param("access_token", "demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\",\"ticket\":\"demo-ticket\",\"expires_in\":7200}");
		})
		.await;
	let config = ClientConfig::builder(AppId::new("wx-demo")?, Secret::new("demo-secret"))
		.base_url(Url::parse(&server.base_url())?)
		.build()?;
	let client = Client::new(config);
	let options = JsConfigOptions::new("https://shop.example/item?id=7#/detail")
		.js_api_list(["chooseImage", "scanQRCode"]);
	let signed = client.js_config(options).await?;

	println!("wx.config({})", serde_json::to_string_pretty(&signed)?);

	token_mock.assert_async().await;
	ticket_mock.assert_async().await;

	Ok(())
}
