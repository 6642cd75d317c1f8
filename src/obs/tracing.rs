// self
use crate::{_prelude::*, auth::AppId, obs::FlowKind};

/// Future returned by [`FlowSpan::instrument`]; the future itself when tracing is disabled.
#[cfg(feature = "tracing")]
pub type Traced<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; the future itself when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type Traced<F> = F;

/// `wx_broker.flow` span opened once per token fetch, ticket fetch, or platform call.
///
/// Without the `tracing` feature this is a zero-sized value and every method is a no-op.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind` on behalf of `app_id`; `stage` names the public entry point.
	pub fn new(kind: FlowKind, app_id: &AppId, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"wx_broker.flow",
				flow = kind.as_str(),
				app_id = &**app_id,
				stage,
				joined = tracing::field::Empty,
				path = tracing::field::Empty,
				errcode = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, app_id, stage);

			Self {}
		}
	}

	/// Records whether the caller joined a refresh another caller started.
	pub fn record_joined(&self, joined: bool) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("joined", joined);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = joined;
		}
	}

	/// Records the platform path a dispatch targets.
	pub fn record_path(&self, path: &str) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("path", path);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = path;
		}
	}

	/// Records the non-zero `errcode` the platform answered with.
	pub fn record_errcode(&self, errcode: i64) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("errcode", errcode);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = errcode;
		}
	}

	/// Runs `fut` inside the span. No guard is held across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
