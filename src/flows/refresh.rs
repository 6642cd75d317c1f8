//! Singleflight refresh slot shared by the token and ticket managers.
//!
//! A [`RefreshCell`] owns one manager's cached [`Credential`] plus, while a refresh is running,
//! the shared future representing it. The first caller that finds the slot stale creates the
//! refresh future and parks a [`Shared`] handle in the cell; every caller arriving before it
//! settles clones that handle instead of starting a second upstream fetch, so all of them
//! observe the identical outcome. The future clears the in-flight marker itself on settlement,
//! caching the credential only on success, which lets the next caller retry after a failure.
//! A refresh that panics also clears the marker before the panic resumes, so the slot never
//! stays wedged on a poisoned future.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::panic::{self, AssertUnwindSafe};
// crates.io
use futures::future::{BoxFuture, FutureExt, Shared};
// self
use crate::{_prelude::*, auth::Credential, error::CredentialFetchError};

type RefreshResult = Result<Credential, CredentialFetchError>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshResult>>;

/// Credential produced by [`RefreshCell::run`] plus whether the caller joined another's refresh.
#[derive(Clone, Debug)]
pub(crate) struct RefreshOutcome {
	pub(crate) credential: Credential,
	pub(crate) joined: bool,
}

#[derive(Default)]
struct RefreshState {
	current: Option<Credential>,
	in_flight: Option<SharedRefresh>,
}

/// Cached credential slot with at most one refresh in flight.
#[derive(Clone, Default)]
pub(crate) struct RefreshCell {
	state: Arc<Mutex<RefreshState>>,
	metrics: Arc<RefreshMetrics>,
}
impl RefreshCell {
	pub(crate) fn metrics(&self) -> &Arc<RefreshMetrics> {
		&self.metrics
	}

	/// Returns the cached credential when it is still valid at `now`.
	pub(crate) fn cached_at(&self, now: OffsetDateTime) -> Option<Credential> {
		self.state.lock().current.as_ref().filter(|credential| credential.is_valid_at(now)).cloned()
	}

	/// Returns the cached credential regardless of expiry.
	pub(crate) fn current(&self) -> Option<Credential> {
		self.state.lock().current.clone()
	}

	pub(crate) fn is_refreshing(&self) -> bool {
		self.state.lock().in_flight.is_some()
	}

	/// Joins the in-flight refresh, or starts one from `start` when none is running.
	///
	/// Unless `force` is set, a credential that became valid between the caller's cache check
	/// and taking the slot lock is returned as is.
	///
	/// `start` only builds the future; it runs under the slot lock and must not block.
	pub(crate) async fn run<F, Fut>(
		&self,
		force: bool,
		start: F,
	) -> Result<RefreshOutcome, CredentialFetchError>
	where
		F: FnOnce() -> Fut,
		Fut: 'static + Send + Future<Output = RefreshResult>,
	{
		let (refresh, joined) = {
			let mut state = self.state.lock();

			if !force {
				let now = OffsetDateTime::now_utc();

				if let Some(credential) = state.current.as_ref().filter(|c| c.is_valid_at(now)) {
					self.metrics.record_cache_hit();

					return Ok(RefreshOutcome { credential: credential.clone(), joined: false });
				}
			}

			match state.in_flight.as_ref() {
				Some(in_flight) => (in_flight.clone(), true),
				None => {
					let refresh = self.settle_with(start());

					state.in_flight = Some(refresh.clone());

					(refresh, false)
				},
			}
		};

		if joined {
			self.metrics.record_join();
		}

		let credential = refresh.await?;

		Ok(RefreshOutcome { credential, joined })
	}

	fn settle_with<Fut>(&self, refresh: Fut) -> SharedRefresh
	where
		Fut: 'static + Send + Future<Output = RefreshResult>,
	{
		let state = Arc::downgrade(&self.state);
		let metrics = self.metrics.clone();

		async move {
			let settled = AssertUnwindSafe(refresh).catch_unwind().await;

			if !matches!(settled, Ok(Ok(_))) {
				metrics.record_failure();
			}
			if let Some(state) = state.upgrade() {
				let mut state = state.lock();

				if let Ok(Ok(credential)) = &settled {
					state.current = Some(credential.clone());
				}

				state.in_flight = None;
			}

			match settled {
				Ok(result) => result,
				Err(payload) => panic::resume_unwind(payload),
			}
		}
		.boxed()
		.shared()
	}
}
impl Debug for RefreshCell {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("RefreshCell")
			.field("current", &state.current)
			.field("refreshing", &state.in_flight.is_some())
			.finish()
	}
}
