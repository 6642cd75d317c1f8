//! JS-SDK signature engine.
//!
//! The platform verifies `wx.config` by recomputing SHA-1 over the four signing fields joined in
//! ASCII key order: `jsapi_ticket`, `noncestr`, `timestamp`, `url`. Field names, their order, and
//! the lowercase hex rendering are part of the platform contract.

// crates.io
use rand::{Rng, distr::Alphanumeric};
use sha1::{Digest, Sha1};

/// Length of the nonce generated by [`nonce`].
pub const NONCE_LEN: usize = 16;

/// Common JS interfaces requested when the caller does not list any.
pub const DEFAULT_JS_API_LIST: [&str; 31] = [
	"updateAppMessageShareData",
	"updateTimelineShareData",
	"onMenuShareTimeline",
	"onMenuShareAppMessage",
	"onMenuShareQQ",
	"onMenuShareWeibo",
	"startRecord",
	"stopRecord",
	"onVoiceRecordEnd",
	"playVoice",
	"pauseVoice",
	"stopVoice",
	"onVoicePlayEnd",
	"uploadVoice",
	"downloadVoice",
	"chooseImage",
	"previewImage",
	"uploadImage",
	"downloadImage",
	"translateVoice",
	"getNetworkType",
	"openLocation",
	"getLocation",
	"hideOptionMenu",
	"showOptionMenu",
	"hideMenuItems",
	"showMenuItems",
	"hideAllNonBaseMenuItem",
	"showAllNonBaseMenuItem",
	"closeWindow",
	"scanQRCode",
];

/// Builds the canonical string the platform hashes.
pub fn canonical_string(ticket: &str, url: &str, nonce: &str, timestamp: i64) -> String {
	format!("jsapi_ticket={ticket}&noncestr={nonce}&timestamp={timestamp}&url={url}")
}

/// Signs one page URL: lowercase hex SHA-1 of [`canonical_string`].
pub fn sign(ticket: &str, url: &str, nonce: &str, timestamp: i64) -> String {
	hex::encode(Sha1::digest(canonical_string(ticket, url, nonce, timestamp).as_bytes()))
}

/// Generates a random alphanumeric nonce of [`NONCE_LEN`] characters.
pub fn nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Drops the `#fragment` part; the page URL is signed without it.
pub fn strip_fragment(url: &str) -> &str {
	url.split_once('#').map_or(url, |(page, _)| page)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const TICKET: &str =
		"sM4AOVdWfPE4DxkXGEs8VMCPGGVi4C3VM0P37wVUCFvkVAy_90u5h9nbSlYy3-Sl-HhTdfl2fzFy1AOcHKP7qg";
	const URL: &str = "http://mp.weixin.qq.com?params=value";
	const NONCE: &str = "Wm3WZYTPz0wzccnW";
	const TIMESTAMP: i64 = 1_414_587_457;

	#[test]
	fn canonical_string_keeps_the_platform_field_order() {
		assert_eq!(
			canonical_string("T", "https://a.example/p?x=1", "N", 42),
			"jsapi_ticket=T&noncestr=N&timestamp=42&url=https://a.example/p?x=1"
		);
	}

	#[test]
	fn sign_matches_the_documented_vector() {
		assert_eq!(sign(TICKET, URL, NONCE, TIMESTAMP), "0f9de62fce790f9a083d5c99e95740ceb90c27ed");
	}

	#[test]
	fn sign_is_deterministic_and_field_sensitive() {
		let base = sign(TICKET, URL, NONCE, TIMESTAMP);

		assert_eq!(base, sign(TICKET, URL, NONCE, TIMESTAMP));
		assert_eq!(base.len(), 40);
		assert!(base.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
		assert_ne!(base, sign("other", URL, NONCE, TIMESTAMP));
		assert_ne!(base, sign(TICKET, "http://mp.weixin.qq.com?params=other", NONCE, TIMESTAMP));
		assert_ne!(base, sign(TICKET, URL, "Wm3WZYTPz0wzccnX", TIMESTAMP));
		assert_ne!(base, sign(TICKET, URL, NONCE, TIMESTAMP + 1));
	}

	#[test]
	fn nonces_are_alphanumeric_and_fresh() {
		let first = nonce();

		assert_eq!(first.len(), NONCE_LEN);
		assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(first, nonce());
	}

	#[test]
	fn fragments_are_not_signed() {
		assert_eq!(strip_fragment("https://a.example/p?x=1#/route"), "https://a.example/p?x=1");
		assert_eq!(strip_fragment("https://a.example/p"), "https://a.example/p");
	}
}
