//! Custom menus for official accounts.

// self
use crate::{
	_prelude::*,
	flows::{ApiRequest, Client},
	http::HttpTransport,
};

/// Interaction triggered by a menu button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonType {
	/// Opens a mini program page.
	Miniprogram,
	/// Pushes a click event carrying `key`.
	Click,
	/// Opens `url`.
	View,
	/// Opens the scanner and pushes the result.
	ScancodePush,
	/// Opens the scanner and waits for a reply.
	ScancodeWaitmsg,
	/// Opens the camera.
	PicSysphoto,
	/// Opens the camera or the album.
	PicPhotoOrAlbum,
	/// Opens the in-app album.
	PicWeixin,
	/// Opens the location picker.
	LocationSelect,
	/// Sends permanent material.
	MediaId,
	/// Opens an article.
	ViewLimited,
}

/// Menu button; top-level buttons may carry up to five sub-buttons instead of an action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
	/// Label.
	pub name: String,
	/// Action; absent on buttons that only group sub-buttons.
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<ButtonType>,
	/// Event key for click-like actions.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub key: Option<String>,
	/// Link for `view` and fallback link for `miniprogram`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	/// Material identifier for `media_id` and `view_limited`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub media_id: Option<String>,
	/// Mini program identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub appid: Option<String>,
	/// Mini program page path.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pagepath: Option<String>,
	/// Second-level buttons.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub sub_button: Vec<Button>,
}
impl Button {
	/// Click button pushing `key`.
	pub fn click(name: impl Into<String>, key: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: Some(ButtonType::Click),
			key: Some(key.into()),
			..Default::default()
		}
	}

	/// Link button.
	pub fn view(name: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: Some(ButtonType::View),
			url: Some(url.into()),
			..Default::default()
		}
	}

	/// Mini program button; `url` is opened by clients without mini program support.
	pub fn miniprogram(
		name: impl Into<String>,
		appid: impl Into<String>,
		pagepath: impl Into<String>,
		url: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			kind: Some(ButtonType::Miniprogram),
			appid: Some(appid.into()),
			pagepath: Some(pagepath.into()),
			url: Some(url.into()),
			..Default::default()
		}
	}

	/// Group button holding `children`.
	pub fn group(name: impl Into<String>, children: impl IntoIterator<Item = Button>) -> Self {
		Self { name: name.into(), sub_button: children.into_iter().collect(), ..Default::default() }
	}
}

/// Whole menu: at most three top-level buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
	/// Top-level buttons.
	#[serde(default)]
	pub button: Vec<Button>,
}

#[derive(Deserialize)]
struct MenuEnvelope {
	menu: Menu,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Replaces the account menu.
	pub async fn create_menu(&self, menu: &Menu) -> Result<()> {
		self.dispatcher().dispatch_ack(ApiRequest::post("/cgi-bin/menu/create").json(menu)?).await
	}

	/// Reads the account menu.
	pub async fn get_menu(&self) -> Result<Menu> {
		let envelope: MenuEnvelope =
			self.dispatcher().dispatch(ApiRequest::get("/cgi-bin/menu/get")).await?;

		Ok(envelope.menu)
	}
}
