//! Permanent material listing.

// self
use crate::{
	_prelude::*,
	flows::{ApiRequest, Client},
	http::HttpTransport,
};

/// Page size used by [`Client::get_material_list`].
pub const MATERIAL_PAGE_SIZE: u32 = 20;

/// Kinds of permanent material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
	/// Images.
	Image,
	/// Videos.
	Video,
	/// Voice clips.
	Voice,
	/// Article bundles.
	News,
}

/// One page of permanent material.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialList {
	/// Total material of the requested type.
	pub total_count: u64,
	/// Items in this page.
	pub item_count: u64,
	/// Items.
	pub item: Vec<Material>,
}

/// One permanent material item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
	/// Identifier usable in messages and menus.
	pub media_id: String,
	/// Last update (unix seconds); the platform sends either a number or a numeric string.
	#[serde(deserialize_with = "lenient_timestamp")]
	pub update_time: i64,
	/// File name (image, voice, video).
	#[serde(default)]
	pub name: Option<String>,
	/// Access URL (image, voice, video).
	#[serde(default)]
	pub url: Option<String>,
	/// Articles (news only).
	#[serde(default)]
	pub content: Option<NewsContent>,
}

/// Article bundle carried by news material.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsContent {
	/// Articles.
	pub news_item: Vec<NewsArticle>,
}

/// One article of a news bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsArticle {
	/// Title.
	pub title: String,
	/// Cover material identifier.
	pub thumb_media_id: String,
	/// Whether the cover is shown in the body.
	pub show_cover_pic: u8,
	/// Author.
	pub author: String,
	/// Summary.
	pub digest: String,
	/// HTML body.
	pub content: String,
	/// Article URL.
	pub url: String,
	/// Cover URL.
	pub thumb_url: String,
	/// "Read more" link.
	pub content_source_url: String,
	/// Whether comments are open.
	pub need_open_comment: Option<u8>,
	/// Whether only followers may comment.
	pub only_fans_can_comment: Option<u8>,
}

#[derive(Serialize)]
struct MaterialQuery {
	#[serde(rename = "type")]
	kind: MaterialType,
	offset: u32,
	count: u32,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists permanent material of `kind`, [`MATERIAL_PAGE_SIZE`] items starting at `offset`.
	pub async fn get_material_list(&self, kind: MaterialType, offset: u32) -> Result<MaterialList> {
		let request = ApiRequest::post("/cgi-bin/material/batchget_material").json(&MaterialQuery {
			kind,
			offset,
			count: MATERIAL_PAGE_SIZE,
		})?;

		self.dispatcher().dispatch(request).await
	}
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: serde::Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Number(i64),
		Text(String),
	}

	match Raw::deserialize(deserializer)? {
		Raw::Number(value) => Ok(value),
		Raw::Text(value) => value.parse().map_err(serde::de::Error::custom),
	}
}
