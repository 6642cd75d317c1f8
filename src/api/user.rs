//! Follower lookups for official accounts.

// self
use crate::{
	_prelude::*,
	auth::OpenId,
	flows::{ApiRequest, Client},
	http::HttpTransport,
};

/// Channel through which a follower subscribed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscribeScene {
	/// Account search.
	AddSceneSearch,
	/// Account migration.
	AddSceneAccountMigration,
	/// Business card.
	AddSceneProfileCard,
	/// QR code scan.
	AddSceneQrCode,
	/// Name link inside an article.
	#[serde(rename = "ADD_SCENEPROFILE")]
	AddSceneProfileLink,
	/// Avatar inside an article.
	AddSceneProfileItem,
	/// After a payment.
	AddScenePaid,
	/// Anything else.
	AddSceneOthers,
	/// Scene not known to this crate.
	#[serde(other)]
	Unknown,
}

/// Follower profile. Users that unsubscribed only carry `openid` and `subscribe = 0`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
	/// Follower identifier.
	pub openid: String,
	/// Cross-application identifier.
	pub unionid: Option<String>,
	/// `1` while subscribed.
	pub subscribe: u8,
	/// Client language.
	pub language: String,
	/// Subscription time (unix seconds).
	pub subscribe_time: i64,
	/// Remark set by the account operator.
	pub remark: String,
	/// Group identifier.
	pub groupid: i64,
	/// Tags applied to the follower.
	pub tagid_list: Vec<i64>,
	/// Subscription channel.
	pub subscribe_scene: Option<SubscribeScene>,
	/// Integer QR scene.
	pub qr_scene: i64,
	/// String QR scene.
	pub qr_scene_str: String,
}

/// One page of follower identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserList {
	/// Total followers.
	pub total: u64,
	/// Identifiers in this page (at most 10000).
	pub count: u64,
	/// Page payload.
	pub data: UserListData,
	/// Cursor for the next page; empty on the last one.
	pub next_openid: String,
}
impl UserList {
	/// Returns the cursor for the next page, if the platform reported one.
	pub fn next_cursor(&self) -> Option<&str> {
		Some(self.next_openid.as_str()).filter(|cursor| !cursor.is_empty())
	}
}

/// Identifier payload of [`UserList`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserListData {
	/// Follower identifiers.
	pub openid: Vec<OpenId>,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Reads one follower's profile.
	pub async fn get_user_info(&self, openid: &OpenId) -> Result<UserInfo> {
		let request =
			ApiRequest::get("/cgi-bin/user/info").query("openid", openid).query("lang", "zh_CN");

		self.dispatcher().dispatch(request).await
	}

	/// Lists followers starting after `next_openid` (from the beginning when `None`).
	pub async fn get_user_list(&self, next_openid: Option<&str>) -> Result<UserList> {
		let request = ApiRequest::get("/cgi-bin/user/get")
			.query("next_openid", next_openid.unwrap_or_default());

		self.dispatcher().dispatch(request).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unsubscribed_users_decode_with_defaults() {
		let info: UserInfo = serde_json::from_str(r#"{"subscribe":0,"openid":"o6_bmjrPTlm6_2sgVt7hMZOPfL2M"}"#)
			.expect("Sparse profiles should decode.");

		assert_eq!(info.subscribe, 0);
		assert!(info.subscribe_scene.is_none());
		assert!(info.tagid_list.is_empty());
	}

	#[test]
	fn unknown_scenes_do_not_fail_decoding() {
		let info: UserInfo =
			serde_json::from_str(r#"{"openid":"o1","subscribe":1,"subscribe_scene":"ADD_SCENE_WECHAT_ADVERTISEMENT"}"#)
				.expect("Unknown scenes should decode.");

		assert_eq!(info.subscribe_scene, Some(SubscribeScene::Unknown));

		let info: UserInfo = serde_json::from_str(r#"{"openid":"o1","subscribe_scene":"ADD_SCENEPROFILE"}"#)
			.expect("Profile link scenes should decode.");

		assert_eq!(info.subscribe_scene, Some(SubscribeScene::AddSceneProfileLink));
	}

	#[test]
	fn last_user_page_has_no_cursor() {
		let page: UserList = serde_json::from_str(r#"{"total":2,"count":0,"next_openid":""}"#)
			.expect("Empty pages should decode.");

		assert_eq!(page.next_cursor(), None);
		assert!(page.data.openid.is_empty());
	}
}
