//! Client-level error types shared across flows, transports, and stores.

// self
use crate::{_prelude::*, auth::CredentialKind};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, unexpected HTTP status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Access token or ticket acquisition failed.
	#[error(transparent)]
	CredentialFetch(#[from] CredentialFetchError),

	/// Platform answered with a non-zero `errcode` that was not recovered locally.
	#[error("Platform rejected the request with errcode {errcode}: {errmsg}.")]
	RemoteApi {
		/// Platform error code.
		errcode: i64,
		/// Platform error message.
		errmsg: String,
	},
}
impl Error {
	/// Returns the platform `errcode` carried by [`Error::RemoteApi`], if any.
	pub fn errcode(&self) -> Option<i64> {
		match self {
			Self::RemoteApi { errcode, .. } => Some(*errcode),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Client configuration failed validation.
	#[error(transparent)]
	InvalidClientConfig(#[from] crate::config::ClientConfigError),
	/// Request path cannot be resolved against the base endpoint.
	#[error("Request path `{path}` cannot be resolved against the base endpoint.")]
	InvalidRequestUrl {
		/// Path or URL supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, unexpected status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Platform responded with a non-success status and no readable envelope.
	#[error("Platform responded with HTTP status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not a JSON envelope at all.
	#[error("Platform returned a body that is not a JSON envelope.")]
	Envelope {
		/// Underlying JSON failure.
		#[source]
		source: serde_json::Error,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Envelope payload does not match the expected shape.
	#[error("Platform returned a payload that does not match the expected shape.")]
	Payload {
		/// Structured parsing failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Credential endpoint reported a lifetime that cannot be used.
	#[error("Credential endpoint returned an unusable expires_in value: {expires_in}.")]
	InvalidExpiresIn {
		/// Raw value reported by the platform.
		expires_in: i64,
	},
}

/// Failure to acquire an access token or ticket.
///
/// Cloneable so every caller joined onto the same in-flight refresh receives the identical
/// outcome.
#[derive(Clone, Debug, ThisError)]
#[error("Failed to fetch the {kind}.")]
pub struct CredentialFetchError {
	/// Which credential was being fetched.
	pub kind: CredentialKind,
	/// Underlying cause shared by all waiters.
	#[source]
	pub source: Arc<Error>,
}
impl CredentialFetchError {
	/// Wraps `source` as a fetch failure for `kind`, passing nested fetch failures through.
	pub fn new(kind: CredentialKind, source: Error) -> Self {
		match source {
			Error::CredentialFetch(inner) => inner,
			other => Self { kind, source: Arc::new(other) },
		}
	}

	/// Returns the platform `errcode` behind this failure, if the platform rejected the fetch.
	pub fn errcode(&self) -> Option<i64> {
		self.source.errcode()
	}
}
