// self
use crate::{
	_prelude::*,
	auth::{AppId, Secret},
	config::{Channel, ClientConfig, DEFAULT_BASE_URL},
};

/// Errors raised while constructing or validating client configurations.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ClientConfigError {
	/// The application secret is empty.
	#[error("Application secret cannot be empty.")]
	EmptySecret,
	/// Base endpoint must use HTTPS unless it targets a loopback host.
	#[error("The base endpoint must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base endpoint cannot carry query strings or fragments.
	#[error("The base endpoint cannot carry a query or fragment: {url}.")]
	BaseUrlWithQuery {
		/// Base URL that failed validation.
		url: String,
	},
	/// Safety margin must not be negative.
	#[error("The safety margin must not be negative.")]
	NegativeSafetyMargin,
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Application identifier.
	pub app_id: AppId,
	/// Application secret.
	pub app_secret: Secret,
	/// Deployment channel.
	pub channel: Channel,
	/// Optional base endpoint override.
	pub base_url: Option<Url>,
	/// Safety margin subtracted from upstream lifetimes.
	pub safety_margin: Duration,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the application credentials.
	pub fn new(app_id: AppId, app_secret: Secret) -> Self {
		Self {
			app_id,
			app_secret,
			channel: Channel::default(),
			base_url: None,
			safety_margin: ClientConfig::DEFAULT_SAFETY_MARGIN,
		}
	}

	/// Sets the deployment channel.
	pub fn channel(mut self, channel: Channel) -> Self {
		self.channel = channel;

		self
	}

	/// Overrides the base endpoint (defaults to the public platform endpoint).
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the safety margin subtracted from upstream lifetimes.
	pub fn safety_margin(mut self, margin: Duration) -> Self {
		self.safety_margin = margin;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL).map_err(|_| ClientConfigError::InsecureBaseUrl {
				url: DEFAULT_BASE_URL.into(),
			})?,
		};
		let config = ClientConfig {
			app_id: self.app_id,
			app_secret: self.app_secret,
			channel: self.channel,
			base_url,
			safety_margin: self.safety_margin,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ClientConfigError> {
		if self.app_secret.expose().is_empty() {
			return Err(ClientConfigError::EmptySecret);
		}
		if self.safety_margin.is_negative() {
			return Err(ClientConfigError::NegativeSafetyMargin);
		}

		validate_base_url(&self.base_url)
	}
}

fn validate_base_url(url: &Url) -> Result<(), ClientConfigError> {
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ClientConfigError::BaseUrlWithQuery { url: url.to_string() });
	}

	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ClientConfigError::InsecureBaseUrl { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain == "localhost",
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> ClientConfigBuilder {
		ClientConfig::builder(
			AppId::new("wx-builder").expect("App fixture should be valid."),
			Secret::new("secret"),
		)
	}

	fn url(value: &str) -> Url {
		Url::parse(value).expect("URL fixture should parse.")
	}

	#[test]
	fn defaults_target_the_public_endpoint() {
		let config = builder().build().expect("Default configuration should build.");

		assert_eq!(config.base_url.as_str(), "https://api.weixin.qq.com/");
		assert_eq!(config.channel, Channel::OfficialAccount);
		assert_eq!(config.safety_margin, Duration::minutes(5));
	}

	#[test]
	fn insecure_endpoints_are_rejected_except_loopback() {
		let err = builder()
			.base_url(url("http://api.weixin.qq.com"))
			.build()
			.expect_err("Plain HTTP endpoints should be rejected.");

		assert!(matches!(err, ClientConfigError::InsecureBaseUrl { .. }));

		builder()
			.base_url(url("http://127.0.0.1:8080"))
			.build()
			.expect("Loopback endpoints should be accepted for local testing.");
		builder()
			.base_url(url("http://localhost:8080"))
			.build()
			.expect("Localhost endpoints should be accepted for local testing.");
	}

	#[test]
	fn invalid_secret_query_and_margin_are_rejected() {
		let err = ClientConfig::builder(
			AppId::new("wx-builder").expect("App fixture should be valid."),
			Secret::new(""),
		)
		.build()
		.expect_err("Empty secrets should be rejected.");

		assert_eq!(err, ClientConfigError::EmptySecret);

		let err = builder()
			.base_url(url("https://api.weixin.qq.com/?debug=1"))
			.build()
			.expect_err("Base URLs with queries should be rejected.");

		assert!(matches!(err, ClientConfigError::BaseUrlWithQuery { .. }));

		let err = builder()
			.safety_margin(Duration::seconds(-1))
			.build()
			.expect_err("Negative margins should be rejected.");

		assert_eq!(err, ClientConfigError::NegativeSafetyMargin);
	}
}
