//! Short-lived platform credentials (access token, JS-SDK ticket) and their lifetimes.

// self
use crate::{_prelude::*, auth::Secret};

/// Which platform credential a value represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
	/// Application-wide access token (`access_token`).
	AccessToken,
	/// JS-SDK ticket used for browser-side signing (`jsapi_ticket`).
	JsapiTicket,
}
impl CredentialKind {
	/// Returns a stable label suitable for store keys, span fields, and metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "access_token",
			Self::JsapiTicket => "jsapi_ticket",
		}
	}
}
impl Display for CredentialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::AccessToken => f.write_str("access token"),
			Self::JsapiTicket => f.write_str("jsapi ticket"),
		}
	}
}

/// Immutable credential value plus the instant after which it must not be used.
///
/// A credential is replaced as a whole on refresh; there are no partial updates.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Opaque credential value; callers must avoid logging it.
	pub value: Secret,
	/// Expiry instant with the safety margin already subtracted.
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Creates a credential that expires at `expires_at`.
	pub fn new(value: impl Into<String>, expires_at: OffsetDateTime) -> Self {
		Self { value: Secret::new(value), expires_at }
	}

	/// Derives a credential from an upstream lifetime.
	///
	/// `expires_at = issued_at + expires_in - safety_margin`. When the lifetime does not exceed
	/// the margin, half of the lifetime is used instead so short-lived values stay usable.
	///
	/// Returns `None` when the expiry falls outside the representable date range.
	pub fn from_lifetime(
		value: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
		safety_margin: Duration,
	) -> Option<Self> {
		let lifetime = if expires_in > safety_margin {
			expires_in.checked_sub(safety_margin)?
		} else {
			expires_in / 2_i32
		};

		issued_at.checked_add(lifetime).map(|expires_at| Self::new(value, expires_at))
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.value.expose()
	}

	/// Returns `true` while `instant` is strictly before the expiry.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Convenience helper that checks validity against the current UTC instant.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		!self.is_valid_at(instant)
	}

	/// Remaining lifetime at `instant`, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("value", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn validity_is_exclusive_of_the_expiry_instant() {
		let credential = Credential::new("T1", macros::datetime!(2025-01-01 01:00 UTC));

		assert!(credential.is_valid_at(macros::datetime!(2025-01-01 00:59:59 UTC)));
		assert!(credential.is_expired_at(macros::datetime!(2025-01-01 01:00 UTC)));
		assert_eq!(
			credential.remaining_at(macros::datetime!(2025-01-01 00:30 UTC)),
			Duration::minutes(30)
		);
		assert_eq!(
			credential.remaining_at(macros::datetime!(2025-01-02 00:00 UTC)),
			Duration::ZERO
		);
	}

	#[test]
	fn lifetime_subtracts_the_safety_margin() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let credential =
			Credential::from_lifetime("T1", issued, Duration::seconds(7200), Duration::minutes(5))
				.expect("A two-hour lifetime should be representable.");

		assert_eq!(credential.expires_at, macros::datetime!(2025-01-01 01:55 UTC));
	}

	#[test]
	fn short_lifetimes_fall_back_to_half() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let credential =
			Credential::from_lifetime("T1", issued, Duration::seconds(120), Duration::minutes(5))
				.expect("A two-minute lifetime should be representable.");

		assert_eq!(credential.expires_at, macros::datetime!(2025-01-01 00:01 UTC));
	}

	#[test]
	fn unrepresentable_expiry_yields_none() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(
			Credential::from_lifetime(
				"T1",
				issued,
				Duration::seconds(9_000_000_000_000),
				Duration::minutes(5),
			)
			.is_none()
		);
	}

	#[test]
	fn debug_and_serde_keep_expiry_readable() {
		let credential = Credential::new("T1", macros::datetime!(2025-01-01 01:00 UTC));

		assert!(!format!("{credential:?}").contains("T1"));

		let payload = serde_json::to_string(&credential).expect("Credential should serialize.");

		assert_eq!(payload, "{\"value\":\"T1\",\"expires_at\":\"2025-01-01T01:00:00Z\"}");
	}
}
