#![cfg(feature = "reqwest")]

mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use common::ScriptedTransport;
use wx_broker::{api::JsConfigOptions, config::Channel, error::Error, sign};

fn ticket(value: &str) -> wx_broker::http::TransportResponse {
	common::json(serde_json::json!({ "errcode": 0, "errmsg": "ok", "ticket": value, "expires_in": 7200 }))
}

fn token(value: &str) -> wx_broker::http::TransportResponse {
	common::json(serde_json::json!({ "access_token": value, "expires_in": 7200 }))
}

#[tokio::test]
async fn ticket_fetch_draws_a_token_and_caches_independently() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server.base_url(), Channel::OfficialAccount);
	let token = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"T1","expires_in":7200}"#);
		})
		.await;
	let ticket = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/ticket/getticket")
				.query_param("type", "jsapi")
				.query_param("access_token", "T1");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"errcode":0,"errmsg":"ok","ticket":"JSAPI","expires_in":7200}"#);
		})
		.await;
	let first = client.get_ticket(false).await.expect("Ticket fetch should succeed.");
	let second = client.get_ticket(false).await.expect("Cached ticket should be served.");

	assert_eq!(first.expose(), "JSAPI");
	assert_eq!(second, first);
	ticket.assert_hits_async(1).await;
	token.assert_hits_async(1).await;

	client.get_ticket(true).await.expect("Forced ticket refresh should succeed.");

	ticket.assert_hits_async(2).await;
	token.assert_hits_async(1).await;
}

#[tokio::test]
async fn concurrent_ticket_callers_share_one_fetch() {
	let transport = Arc::new(ScriptedTransport::with_latency(std::time::Duration::from_millis(40)));

	transport
		.push("/cgi-bin/token", token("T1"))
		.push("/cgi-bin/ticket/getticket", ticket("JSAPI"));

	let client = common::scripted_client(transport.clone());
	let (a, b, c) =
		tokio::join!(client.get_ticket(false), client.get_ticket(false), client.get_ticket(false));

	for result in [a, b, c] {
		assert_eq!(result.expect("Every caller should succeed.").expose(), "JSAPI");
	}
	assert_eq!(transport.calls("/cgi-bin/ticket/getticket"), 1);
	assert_eq!(transport.calls("/cgi-bin/token"), 1);
}

#[tokio::test]
async fn ticket_fetch_recovers_from_a_rejected_token() {
	let transport = Arc::new(ScriptedTransport::default());

	transport.push("/cgi-bin/token", token("T1")).push("/cgi-bin/token", token("T2"));
	transport
		.push(
			"/cgi-bin/ticket/getticket",
			common::json(serde_json::json!({ "errcode": 40001, "errmsg": "invalid credential" })),
		)
		.push("/cgi-bin/ticket/getticket", ticket("JSAPI"));

	let client = common::scripted_client(transport.clone());
	let ticket = client.get_ticket(false).await.expect("Ticket fetch should recover.");

	assert_eq!(ticket.expose(), "JSAPI");
	assert_eq!(transport.calls("/cgi-bin/token"), 2);
}

#[tokio::test]
async fn ticket_failures_name_the_failing_credential() {
	let transport = Arc::new(ScriptedTransport::default());

	transport.push("/cgi-bin/token", token("T1")).push(
		"/cgi-bin/ticket/getticket",
		common::json(serde_json::json!({ "errcode": 40164, "errmsg": "invalid ip" })),
	);

	let client = common::scripted_client(transport.clone());

	match client.get_ticket(false).await {
		Err(Error::CredentialFetch(fetch)) => {
			assert_eq!(fetch.kind, wx_broker::auth::CredentialKind::JsapiTicket);
			assert_eq!(fetch.errcode(), Some(40164));
		},
		other => panic!("Unexpected result: {other:?}"),
	}
}

#[tokio::test]
async fn js_config_signs_the_page_without_its_fragment() {
	let transport = Arc::new(ScriptedTransport::default());

	transport
		.push("/cgi-bin/token", token("T1"))
		.push("/cgi-bin/ticket/getticket", ticket("JSAPI"));

	let client = common::scripted_client(transport.clone());
	let config = client
		.js_config(JsConfigOptions::new("https://shop.example/item?id=7#/detail").debug(true))
		.await
		.expect("JS config should be produced.");

	assert_eq!(config.url, "https://shop.example/item?id=7");
	assert_eq!(config.app_id, common::APP_ID);
	assert!(config.debug);
	assert_eq!(config.nonce_str.len(), sign::NONCE_LEN);
	assert_eq!(config.js_api_list.len(), sign::DEFAULT_JS_API_LIST.len());
	assert_eq!(
		config.signature,
		sign::sign("JSAPI", "https://shop.example/item?id=7", &config.nonce_str, config.timestamp)
	);

	let again = client
		.js_config(
			JsConfigOptions::new("https://shop.example/item?id=7").js_api_list(["scanQRCode"]),
		)
		.await
		.expect("Second JS config should be produced.");

	assert_eq!(again.js_api_list, ["scanQRCode"]);
	assert_eq!(transport.calls("/cgi-bin/ticket/getticket"), 1);
}
