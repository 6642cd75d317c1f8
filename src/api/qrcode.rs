//! Parametric QR codes for official accounts and unlimited mini program codes.

// self
use crate::{
	_prelude::*,
	flows::{ApiRequest, Client, MediaPayload},
	http::HttpTransport,
};

const SHOW_QR_CODE_URL: &str = "https://mp.weixin.qq.com/cgi-bin/showqrcode";

/// QR code kind: temporary or permanent, with an integer or string scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QrAction {
	/// Temporary, integer scene.
	#[serde(rename = "QR_SCENE")]
	Temporary,
	/// Temporary, string scene.
	#[serde(rename = "QR_STR_SCENE")]
	TemporaryStr,
	/// Permanent, integer scene.
	#[serde(rename = "QR_LIMIT_SCENE")]
	Permanent,
	/// Permanent, string scene.
	#[serde(rename = "QR_LIMIT_STR_SCENE")]
	PermanentStr,
}

/// Parameters of [`Client::get_qr_code`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCodeOptions {
	/// Code kind.
	pub action_name: QrAction,
	/// Lifetime of temporary codes in seconds (platform default 30, maximum 2592000).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expire_seconds: Option<u32>,
	/// Scene payload.
	pub action_info: QrActionInfo,
}
impl QrCodeOptions {
	/// Temporary code with an integer scene.
	pub fn temporary(scene_id: u32, expire_seconds: u32) -> Self {
		Self::new(QrAction::Temporary, Some(expire_seconds), QrScene::id(scene_id))
	}

	/// Temporary code with a string scene.
	pub fn temporary_str(scene_str: impl Into<String>, expire_seconds: u32) -> Self {
		Self::new(QrAction::TemporaryStr, Some(expire_seconds), QrScene::text(scene_str))
	}

	/// Permanent code with an integer scene (at most 100000).
	pub fn permanent(scene_id: u32) -> Self {
		Self::new(QrAction::Permanent, None, QrScene::id(scene_id))
	}

	/// Permanent code with a string scene.
	pub fn permanent_str(scene_str: impl Into<String>) -> Self {
		Self::new(QrAction::PermanentStr, None, QrScene::text(scene_str))
	}

	fn new(action_name: QrAction, expire_seconds: Option<u32>, scene: QrScene) -> Self {
		Self { action_name, expire_seconds, action_info: QrActionInfo { scene } }
	}
}

/// Wrapper around [`QrScene`] matching the platform body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrActionInfo {
	/// Scene.
	pub scene: QrScene,
}

/// Scene value echoed back in the subscribe/scan event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrScene {
	/// Integer scene.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scene_id: Option<u32>,
	/// String scene, 1 to 64 characters.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scene_str: Option<String>,
}
impl QrScene {
	fn id(scene_id: u32) -> Self {
		Self { scene_id: Some(scene_id), scene_str: None }
	}

	fn text(scene_str: impl Into<String>) -> Self {
		Self { scene_id: None, scene_str: Some(scene_str.into()) }
	}
}

/// Created QR code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCode {
	/// Ticket exchanged for the image.
	pub ticket: String,
	/// Lifetime in seconds; absent for permanent codes.
	#[serde(default)]
	pub expire_seconds: Option<u32>,
	/// Content encoded in the QR code.
	pub url: String,
}
impl QrCode {
	/// URL of the rendered QR image.
	pub fn image_url(&self) -> String {
		let ticket: String = url::form_urlencoded::byte_serialize(self.ticket.as_bytes()).collect();

		format!("{SHOW_QR_CODE_URL}?ticket={ticket}")
	}
}

/// Parameters of [`Client::get_wxacode_unlimit`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WxaCodeOptions {
	/// Scene, at most 32 visible characters.
	pub scene: String,
	/// Page path without a leading `/`; the home page when unset.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page: Option<String>,
	/// Width in pixels (280 to 1280, default 430).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<u32>,
	/// Derives the line color automatically.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_color: Option<bool>,
	/// Explicit line color, used when `auto_color` is off.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub line_color: Option<LineColor>,
	/// Renders on a transparent background.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_hyaline: Option<bool>,
}
impl WxaCodeOptions {
	/// Creates options for `scene` with platform defaults.
	pub fn new(scene: impl Into<String>) -> Self {
		Self { scene: scene.into(), ..Default::default() }
	}

	/// Sets the target page.
	pub fn page(mut self, page: impl Into<String>) -> Self {
		self.page = Some(page.into());

		self
	}

	/// Sets the width in pixels.
	pub fn width(mut self, width: u32) -> Self {
		self.width = Some(width);

		self
	}
}

/// RGB line color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineColor {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an official-account QR code.
	pub async fn get_qr_code(&self, options: &QrCodeOptions) -> Result<QrCode> {
		self.dispatcher().dispatch(ApiRequest::post("/cgi-bin/qrcode/create").json(options)?).await
	}

	/// Renders an unlimited mini program code and returns the image.
	pub async fn get_wxacode_unlimit(&self, options: &WxaCodeOptions) -> Result<MediaPayload> {
		let request = ApiRequest::post("/wxa/getwxacodeunlimit").json(options)?;

		self.dispatcher().dispatch_binary(request).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn qr_options_match_the_platform_body() {
		assert_eq!(
			serde_json::to_value(QrCodeOptions::temporary(123, 604_800))
				.expect("Options should serialize."),
			serde_json::json!({
				"action_name": "QR_SCENE",
				"expire_seconds": 604800,
				"action_info": { "scene": { "scene_id": 123 } }
			})
		);
		assert_eq!(
			serde_json::to_value(QrCodeOptions::permanent_str("promo"))
				.expect("Options should serialize."),
			serde_json::json!({
				"action_name": "QR_LIMIT_STR_SCENE",
				"action_info": { "scene": { "scene_str": "promo" } }
			})
		);
	}

	#[test]
	fn qr_image_urls_encode_the_ticket() {
		let code =
			QrCode { ticket: "gQH4/8Do==".into(), expire_seconds: Some(60), url: "u".into() };

		assert_eq!(
			code.image_url(),
			"https://mp.weixin.qq.com/cgi-bin/showqrcode?ticket=gQH4%2F8Do%3D%3D"
		);
	}

	#[test]
	fn wxacode_options_skip_unset_fields() {
		assert_eq!(
			serde_json::to_value(WxaCodeOptions::new("id=1234").page("pages/index/index"))
				.expect("Options should serialize."),
			serde_json::json!({ "scene": "id=1234", "page": "pages/index/index" })
		);
	}
}
