//! Transport primitives for platform calls.
//!
//! The module exposes [`HttpTransport`] alongside the owned [`TransportRequest`] and
//! [`TransportResponse`] shapes so downstream crates can plug in custom HTTP clients (or
//! deterministic fakes in tests) without the client depending on a particular stack. The
//! reqwest-backed [`ReqwestTransport`] is the default.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing platform calls.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so they can be shared (behind `Arc`) by the managers and the
/// dispatcher, and the returned future must be `Send` so refreshes can be driven from any task.
/// Transports never retry on their own; retry policy lives above them.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the raw response, whatever its status.
	fn send(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl HttpMethod {
	/// Returns the canonical method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One file part of a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct MultipartPart {
	/// Form field name.
	pub name: String,
	/// File name reported to the platform.
	pub file_name: String,
	/// MIME type of the part.
	pub content_type: String,
	/// Raw part payload.
	pub bytes: Vec<u8>,
}
impl Debug for MultipartPart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MultipartPart")
			.field("name", &self.name)
			.field("file_name", &self.file_name)
			.field("content_type", &self.content_type)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// Serialized request body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TransportBody {
	/// No body.
	#[default]
	Empty,
	/// JSON document, already serialized.
	Json(Vec<u8>),
	/// `multipart/form-data` with file parts.
	Multipart(Vec<MultipartPart>),
}

/// Fully resolved outbound request: the URL already carries every query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute URL including the serialized query string.
	pub url: Url,
	/// Request body.
	pub body: TransportBody,
}
impl TransportRequest {
	/// Creates a body-less `GET` request.
	pub fn get(url: Url) -> Self {
		Self { method: HttpMethod::Get, url, body: TransportBody::Empty }
	}
}

/// Raw response returned by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Declared `Content-Type`, if any.
	pub content_type: Option<String>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Creates a `200` JSON response; convenient for fakes.
	pub fn json(body: impl Into<Vec<u8>>) -> Self {
		Self { status: 200, content_type: Some("application/json".into()), body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` when the declared content type (or, lacking one, the body) looks like JSON.
	///
	/// Binary endpoints report failures as JSON envelopes, sometimes labeled `text/plain`.
	pub fn looks_like_json(&self) -> bool {
		match self.content_type.as_deref() {
			Some(ct) if ct.contains("json") => true,
			Some(ct) if ct.starts_with("text/") => self.body_starts_with_brace(),
			Some(_) => false,
			None => self.body_starts_with_brace(),
		}
	}

	fn body_starts_with_brace(&self) -> bool {
		self.body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{')
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a transport whose every request is bounded by `timeout`.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}

	fn build(&self, request: TransportRequest) -> Result<reqwest::RequestBuilder, TransportError> {
		let method = match request.method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
		};
		let builder = self.0.request(method, request.url);
		let builder = match request.body {
			TransportBody::Empty => builder,
			TransportBody::Json(bytes) =>
				builder.header(reqwest::header::CONTENT_TYPE, "application/json").body(bytes),
			TransportBody::Multipart(parts) => {
				let mut form = reqwest::multipart::Form::new();

				for part in parts {
					let field = reqwest::multipart::Part::bytes(part.bytes)
						.file_name(part.file_name)
						.mime_str(&part.content_type)?;

					form = form.part(part.name, field);
				}

				builder.multipart(form)
			},
		};

		Ok(builder)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let response = self.build(request)?.send().await?;
			let status = response.status().as_u16();
			let content_type = response
				.headers()
				.get(reqwest::header::CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let body = response.bytes().await?.to_vec();

			Ok(TransportResponse { status, content_type, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(content_type: Option<&str>, body: &str) -> TransportResponse {
		TransportResponse {
			status: 200,
			content_type: content_type.map(str::to_owned),
			body: body.as_bytes().to_vec(),
		}
	}

	#[test]
	fn json_detection_follows_content_type_then_body() {
		assert!(response(Some("application/json; charset=utf-8"), "{}").looks_like_json());
		assert!(response(Some("text/plain"), " {\"errcode\":40001}").looks_like_json());
		assert!(!response(Some("text/plain"), "plain words").looks_like_json());
		assert!(!response(Some("image/jpeg"), "{not really json").looks_like_json());
		assert!(response(None, "\n{\"errcode\":0}").looks_like_json());
		assert!(!response(None, "\u{0089}PNG").looks_like_json());
	}

	#[test]
	fn multipart_debug_hides_payload() {
		let part = MultipartPart {
			name: "media".into(),
			file_name: "image.jpg".into(),
			content_type: "image/jpeg".into(),
			bytes: vec![0xff, 0xd8, 0xff],
		};

		assert!(format!("{part:?}").contains("len: 3"));
	}
}
