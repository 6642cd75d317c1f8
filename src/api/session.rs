//! User sign-in: exchanging a login `code` and reading web-authorized profiles.

// self
use crate::{
	_prelude::*,
	auth::{OpenId, Secret},
	config::Channel,
	flows::{ApiRequest, Client},
	http::HttpTransport,
};

/// Per-user session returned by the code exchange.
///
/// Mini programs fill `session_key`; official accounts and apps fill the OAuth fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
	/// User identifier scoped to this application.
	pub openid: OpenId,
	/// Identifier shared across applications of the same developer account.
	#[serde(default)]
	pub unionid: Option<String>,
	/// Mini program session key.
	#[serde(default)]
	pub session_key: Option<Secret>,
	/// User access token (not the application access token).
	#[serde(default)]
	pub access_token: Option<Secret>,
	/// Lifetime of `access_token`, in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Token used to renew `access_token`.
	#[serde(default)]
	pub refresh_token: Option<Secret>,
	/// Granted scope.
	#[serde(default)]
	pub scope: Option<String>,
}

/// Profile returned by web authorization (`snsapi_userinfo`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthInfo {
	/// User identifier scoped to this application.
	pub openid: String,
	/// Cross-application identifier.
	pub unionid: Option<String>,
	/// Nickname.
	pub nickname: String,
	/// `1` male, `2` female, `0` unknown.
	pub sex: u8,
	/// Province.
	pub province: String,
	/// City.
	pub city: String,
	/// Country.
	pub country: String,
	/// Avatar URL.
	pub headimgurl: String,
	/// Privilege labels.
	pub privilege: Vec<String>,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Exchanges a front-end login `code` for a [`UserSession`].
	///
	/// Mini programs use `jscode2session`; the other channels use the web OAuth endpoint. Both
	/// authenticate with the app secret, so no application access token is attached.
	pub async fn get_access_token(&self, code: &str) -> Result<UserSession> {
		let request = match self.config.channel {
			Channel::MiniProgram =>
				ApiRequest::get("/sns/jscode2session").query("js_code", code),
			Channel::OfficialAccount | Channel::App =>
				ApiRequest::get("/sns/oauth2/access_token").query("code", code),
		};
		let request = request
			.query("appid", &self.config.app_id)
			.query("secret", self.config.app_secret.expose())
			.query("grant_type", "authorization_code")
			.without_credential();

		self.dispatcher().dispatch(request).await
	}

	/// Reads the web-authorized profile of `openid` using that user's own access token.
	pub async fn get_auth_info(
		&self,
		openid: &OpenId,
		user_access_token: &str,
	) -> Result<AuthInfo> {
		let request = ApiRequest::get("/sns/userinfo")
			.query("access_token", user_access_token)
			.query("openid", openid)
			.query("lang", "zh_CN")
			.without_credential();

		self.dispatcher().dispatch(request).await
	}
}
