//! Signed `wx.config` payloads for the browser-side JS-SDK.

// self
use crate::{_prelude::*, auth::Secret, flows::Client, http::HttpTransport, sign};

/// Caller-supplied parameters for [`Client::js_config`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsConfigOptions {
	/// Full URL of the page that will call `wx.config`; any fragment is ignored.
	pub url: String,
	/// Enables the JS-SDK debug mode.
	pub debug: bool,
	/// Requested interfaces; `None` requests [`sign::DEFAULT_JS_API_LIST`].
	pub js_api_list: Option<Vec<String>>,
}
impl JsConfigOptions {
	/// Creates options for `url` with debug off and the default interface list.
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into(), debug: false, js_api_list: None }
	}

	/// Toggles the JS-SDK debug mode.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;

		self
	}

	/// Requests an explicit interface list.
	pub fn js_api_list<I, S>(mut self, apis: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.js_api_list = Some(apis.into_iter().map(Into::into).collect());

		self
	}
}

/// Signed configuration handed to `wx.config`.
///
/// Serializes to the camelCase object the JS-SDK expects; the ticket and the signed URL stay
/// server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsConfig {
	/// JS-SDK debug mode.
	pub debug: bool,
	/// Application identifier.
	pub app_id: String,
	/// Unix timestamp in seconds used for signing.
	pub timestamp: i64,
	/// Random nonce used for signing.
	pub nonce_str: String,
	/// Lowercase hex SHA-1 signature.
	pub signature: String,
	/// Requested interfaces.
	pub js_api_list: Vec<String>,
	/// Ticket the signature was computed with.
	#[serde(skip)]
	pub ticket: Secret,
	/// Page URL the signature binds to, fragment removed.
	#[serde(skip)]
	pub url: String,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Signs `options.url` with the current ticket. The result is never cached.
	pub async fn js_config(&self, options: JsConfigOptions) -> Result<JsConfig> {
		let ticket = self.get_ticket(false).await?;
		let url = sign::strip_fragment(&options.url).to_owned();
		let nonce_str = sign::nonce();
		let timestamp = OffsetDateTime::now_utc().unix_timestamp();
		let signature = sign::sign(ticket.expose(), &url, &nonce_str, timestamp);
		let js_api_list = options.js_api_list.unwrap_or_else(|| {
			sign::DEFAULT_JS_API_LIST.iter().map(|api| (*api).to_owned()).collect()
		});

		Ok(JsConfig {
			debug: options.debug,
			app_id: self.config.app_id.to_string(),
			timestamp,
			nonce_str,
			signature,
			js_api_list,
			ticket: ticket.value,
			url,
		})
	}
}
