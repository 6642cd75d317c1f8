//! Host-supplied client configuration: application credentials, channel, and endpoint base.
//!
//! [`ClientConfig`] is validated once through [`ClientConfigBuilder`] and then shared
//! (behind `Arc`) by every manager and the dispatcher, so flows never re-check it.

/// Builder API for assembling validated configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{AppId, Secret},
};

/// Default platform endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com";

/// Deployment context of the application; decides channel-specific endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
	/// Official account (web pages using the JS-SDK).
	#[default]
	#[serde(rename = "jssdk")]
	OfficialAccount,
	/// Mini program.
	#[serde(rename = "wxapp")]
	MiniProgram,
	/// Mobile application.
	#[serde(rename = "app")]
	App,
}
impl Channel {
	/// Returns the stable channel label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::OfficialAccount => "jssdk",
			Self::MiniProgram => "wxapp",
			Self::App => "app",
		}
	}
}
impl Display for Channel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable client configuration consumed by the managers and dispatcher.
///
/// Deserialization runs the same validation as [`ClientConfigBuilder::build`]; `base_url`,
/// `channel`, and `safety_margin_secs` may be omitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClientConfigFile")]
pub struct ClientConfig {
	/// Application identifier.
	pub app_id: AppId,
	/// Application secret; never logged.
	pub app_secret: Secret,
	/// Deployment channel.
	pub channel: Channel,
	/// Base endpoint relative request paths resolve against.
	pub base_url: Url,
	/// Margin subtracted from every upstream lifetime before a credential is considered expired.
	#[serde(rename = "safety_margin_secs", serialize_with = "seconds::serialize")]
	pub safety_margin: Duration,
}
impl ClientConfig {
	/// Default margin subtracted from upstream lifetimes (five minutes).
	pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::minutes(5);

	/// Creates a new builder for the provided application credentials.
	pub fn builder(app_id: AppId, app_secret: Secret) -> ClientConfigBuilder {
		ClientConfigBuilder::new(app_id, app_secret)
	}

	/// Resolves a request path against the base endpoint; absolute `http(s)` URLs pass through.
	///
	/// Paths are joined relative to the base so a base with a path prefix (e.g. a proxy) keeps it.
	pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
		if path.starts_with("https://") || path.starts_with("http://") {
			Url::parse(path)
		} else if self.base_url.path().ends_with('/') {
			self.base_url.join(path.trim_start_matches('/'))
		} else {
			let mut base = self.base_url.clone();

			base.set_path(&format!("{}/", base.path()));
			base.join(path.trim_start_matches('/'))
		}
	}
}

/// Unvalidated shape of a [`ClientConfig`] as hosts write it in their own config files.
#[derive(Deserialize)]
struct ClientConfigFile {
	app_id: AppId,
	app_secret: Secret,
	#[serde(default)]
	channel: Channel,
	#[serde(default)]
	base_url: Option<Url>,
	#[serde(default = "default_safety_margin", rename = "safety_margin_secs", with = "seconds")]
	safety_margin: Duration,
}
impl TryFrom<ClientConfigFile> for ClientConfig {
	type Error = ClientConfigError;

	fn try_from(file: ClientConfigFile) -> Result<Self, Self::Error> {
		ClientConfigBuilder {
			app_id: file.app_id,
			app_secret: file.app_secret,
			channel: file.channel,
			base_url: file.base_url,
			safety_margin: file.safety_margin,
		}
		.build()
	}
}

fn default_safety_margin() -> Duration {
	ClientConfig::DEFAULT_SAFETY_MARGIN
}

mod seconds {
	// self
	use crate::_prelude::*;

	pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::seconds)
	}
}
