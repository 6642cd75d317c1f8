// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counts one `outcome` of `kind` as `wx_broker_flow_total{flow, outcome}`.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"wx_broker_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts a platform rejection of the attached access token, labeled by `errcode`.
///
/// Each rejection triggers the dispatcher's single forced-refresh retry, so a rising rate points
/// at replicas that do not share a store or at a secret rotated elsewhere.
pub fn record_credential_rejected(errcode: i64) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("wx_broker_credential_rejected_total", "errcode" => errcode.to_string())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = errcode;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::flows::CREDENTIAL_INVALID_ERRCODES;

	#[test]
	fn counters_accept_every_flow_and_rejection_code() {
		for kind in [FlowKind::AccessToken, FlowKind::JsapiTicket, FlowKind::Dispatch] {
			for outcome in [FlowOutcome::Attempt, FlowOutcome::Success, FlowOutcome::Failure] {
				record_flow_outcome(kind, outcome);
			}
		}
		for errcode in CREDENTIAL_INVALID_ERRCODES {
			record_credential_rejected(errcode);
		}
	}
}
