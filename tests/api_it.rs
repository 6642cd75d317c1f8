#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use wx_broker::{
	api::{Button, MaterialType, Menu, QrCodeOptions, TemplateMessage, WxaCodeOptions},
	auth::OpenId,
	config::Channel,
};

async fn mock_token(server: &MockServer) {
	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"T1","expires_in":7200}"#);
		})
		.await;
}

#[tokio::test]
async fn mini_program_code_exchange_uses_jscode2session_without_a_token() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server.base_url(), Channel::MiniProgram);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/sns/jscode2session")
				.query_param("appid", common::APP_ID)
				.query_param("secret", "test-secret")
				.query_param("js_code", "CODE")
				.query_param("grant_type", "authorization_code")
				.query_param_missing("access_token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"openid":"o-mini","session_key":"SESSION","unionid":"u-1"}"#);
		})
		.await;
	let session = client.get_access_token("CODE").await.expect("Code exchange should succeed.");

	mock.assert_async().await;
	assert_eq!(&*session.openid, "o-mini");
	assert_eq!(session.session_key.as_ref().map(|key| key.expose()), Some("SESSION"));
	assert!(session.access_token.is_none());
}

#[tokio::test]
async fn official_account_code_exchange_uses_web_oauth() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server.base_url(), Channel::OfficialAccount);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/sns/oauth2/access_token").query_param("code", "CODE");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"USER","expires_in":7200,"refresh_token":"R","openid":"o-web","scope":"snsapi_userinfo"}"#,
			);
		})
		.await;
	let session = client.get_access_token("CODE").await.expect("Code exchange should succeed.");

	mock.assert_async().await;
	assert_eq!(session.access_token.as_ref().map(|token| token.expose()), Some("USER"));
	assert_eq!(session.scope.as_deref(), Some("snsapi_userinfo"));

	let profile = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/sns/userinfo")
				.query_param("access_token", "USER")
				.query_param("openid", "o-web");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"openid":"o-web","nickname":"Ann","sex":2,"privilege":[]}"#);
		})
		.await;
	let info = client
		.get_auth_info(&session.openid, "USER")
		.await
		.expect("Profile lookup should succeed.");

	profile.assert_async().await;
	assert_eq!(info.nickname, "Ann");
	assert_eq!(info.sex, 2);
}

#[tokio::test]
async fn follower_endpoints_decode_typed_payloads() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server.base_url(), Channel::OfficialAccount);

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/user/info")
				.query_param("openid", "o-1")
				.query_param("lang", "zh_CN");
			then.status(200).header("content-type", "application/json").body(
				r#"{"subscribe":1,"openid":"o-1","language":"zh_CN","subscribe_time":1382694957,"tagid_list":[128,2],"subscribe_scene":"ADD_SCENE_QR_CODE","qr_scene":98765}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/user/get").query_param("next_openid", "");
			then.status(200).header("content-type", "application/json").body(
				r#"{"total":2,"count":2,"data":{"openid":["o-1","o-2"]},"next_openid":"o-2"}"#,
			);
		})
		.await;

	let openid = OpenId::new("o-1").expect("Fixture should be valid.");
	let info = client.get_user_info(&openid).await.expect("User info should decode.");

	assert_eq!(info.tagid_list, [128, 2]);
	assert_eq!(info.subscribe_scene, Some(wx_broker::api::SubscribeScene::AddSceneQrCode));

	let page = client.get_user_list(None).await.expect("User list should decode.");

	assert_eq!(page.data.openid.len(), 2);
	assert_eq!(page.next_cursor(), Some("o-2"));
}

#[tokio::test]
async fn menu_and_material_round_trip_through_json_bodies() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server.base_url(), Channel::OfficialAccount);
	let menu = Menu { button: vec![Button::click("Today", "TODAY")] };

	mock_token(&server).await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/menu/create")
				.json_body(serde_json::json!({ "button": [{ "name": "Today", "type": "click", "key": "TODAY" }] }));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"errcode":0,"errmsg":"ok"}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/menu/get");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"menu":{"button":[{"type":"click","name":"Today","key":"TODAY","sub_button":[]}]}}"#);
		})
		.await;
	let materials = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/material/batchget_material")
				.json_body(serde_json::json!({ "type": "image", "offset": 20, "count": 20 }));
			then.status(200).header("content-type", "application/json").body(
				r#"{"total_count":21,"item_count":1,"item":[{"media_id":"m-1","name":"a.jpg","update_time":1517629847,"url":"https://mmbiz.example/a.jpg"}]}"#,
			);
		})
		.await;

	client.create_menu(&menu).await.expect("Menu creation should succeed.");
	create.assert_async().await;
	assert_eq!(client.get_menu().await.expect("Menu should decode."), menu);

	let page = client
		.get_material_list(MaterialType::Image, 20)
		.await
		.expect("Material page should decode.");

	materials.assert_async().await;
	assert_eq!(page.item[0].media_id, "m-1");
}

#[tokio::test]
async fn template_messages_return_the_msgid() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server.base_url(), Channel::OfficialAccount);

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/message/template/send").json_body(serde_json::json!({
				"touser": "o-1",
				"template_id": "TPL",
				"url": "https://shop.example/order/1",
				"data": { "first": { "value": "Paid" } }
			}));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"errcode":0,"errmsg":"ok","msgid":200228332}"#);
		})
		.await;

	let message = TemplateMessage::new("o-1", "TPL")
		.url("https://shop.example/order/1")
		.field("first", "Paid");
	let msgid =
		client.send_template_message(&message).await.expect("Template send should succeed.");

	assert_eq!(msgid, 200_228_332);
}

#[tokio::test]
async fn qr_codes_and_mini_program_codes() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server.base_url(), Channel::OfficialAccount);

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/qrcode/create");
			then.status(200).header("content-type", "application/json").body(
				r#"{"ticket":"gQH47joAAAAAAAAAASxodHRwOi8vd2VpeGluLnFxLmNvbS9xL2taZ2Z3TVRtNzJXV1Brb3ZhYmJJAAIEZ23sUwMEmm3sUw==","expire_seconds":60,"url":"http://weixin.qq.com/q/kZgfwMTm72WWPkovabbI"}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/wxa/getwxacodeunlimit");
			then.status(200).header("content-type", "image/png").body([0x89_u8, b'P', b'N', b'G']);
		})
		.await;

	let code = client
		.get_qr_code(&QrCodeOptions::temporary(123, 60))
		.await
		.expect("QR code should be created.");

	assert_eq!(code.expire_seconds, Some(60));
	assert!(code.image_url().starts_with("https://mp.weixin.qq.com/cgi-bin/showqrcode?ticket="));

	let image = client
		.get_wxacode_unlimit(&WxaCodeOptions::new("id=1").width(430))
		.await
		.expect("Mini program code should render.");

	assert_eq!(image.content_type.as_deref(), Some("image/png"));
	assert_eq!(&image.bytes[1..], b"PNG");
}

#[tokio::test]
async fn flagged_images_report_false() {
	let server = MockServer::start_async().await;
	let (client, _) = common::reqwest_client(&server.base_url(), Channel::MiniProgram);

	mock_token(&server).await;

	let check = server
		.mock_async(|when, then| {
			when.method(POST).path("/wxa/img_sec_check").header_exists("content-type");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"errcode":87014,"errmsg":"risky content"}"#);
		})
		.await;

	assert!(!client.img_sec_check(vec![0xff, 0xd8]).await.expect("Moderation should answer."));
	check.assert_async().await;
}
