//! Optional observability helpers for client flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit `wx_broker.flow` spans. Every span carries the `flow`, `app_id`,
//!   and `stage` fields; credential spans add `joined` (whether the caller rode on another
//!   caller's refresh) and dispatch spans add the request `path` plus any rejecting `errcode`.
//!   Debug/warn events cover store adoption, store failures, and rejected-token retries.
//! - Enable `metrics` to count `wx_broker_flow_total{flow, outcome}` and
//!   `wx_broker_credential_rejected_total{errcode}`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, auth::CredentialKind};

/// Flow kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Access token acquisition.
	AccessToken,
	/// JS-SDK ticket acquisition.
	JsapiTicket,
	/// Authenticated platform call.
	Dispatch,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::AccessToken => "access_token",
			FlowKind::JsapiTicket => "jsapi_ticket",
			FlowKind::Dispatch => "dispatch",
		}
	}
}
impl From<CredentialKind> for FlowKind {
	fn from(kind: CredentialKind) -> Self {
		match kind {
			CredentialKind::AccessToken => FlowKind::AccessToken,
			CredentialKind::JsapiTicket => FlowKind::JsapiTicket,
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Emits a debug-level event when the `tracing` feature is enabled.
macro_rules! debug {
	($($arg:tt)*) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::debug!($($arg)*);
		}
	}};
}

/// Emits a warn-level event when the `tracing` feature is enabled.
macro_rules! warn_ {
	($($arg:tt)*) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::warn!($($arg)*);
		}
	}};
}

pub(crate) use {debug, warn_ as warn};
