//! Authenticated request dispatch with the platform envelope policy.
//!
//! Every JSON endpoint answers with `{ errcode, errmsg, ...payload }`. The [`Dispatcher`]
//! attaches the current access token, inspects that envelope, and recovers locally from exactly
//! one class of failure: the platform rejecting the token itself. Those codes trigger a single
//! forced refresh plus one resend; every other non-zero code surfaces as [`Error::RemoteApi`].

// self
use crate::{
	_prelude::*,
	auth::Credential,
	config::ClientConfig,
	error::{ConfigError, DecodeError, TransportError},
	flows::TokenManager,
	http::{
		HttpMethod, HttpTransport, MultipartPart, TransportBody, TransportRequest,
		TransportResponse,
	},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Envelope codes meaning the access token itself was rejected (invalid, mismatched, expired).
pub const CREDENTIAL_INVALID_ERRCODES: [i64; 3] = [40001, 40014, 42001];

/// Returns `true` when `errcode` warrants a forced token refresh and one resend.
pub fn is_credential_rejected(errcode: i64) -> bool {
	CREDENTIAL_INVALID_ERRCODES.contains(&errcode)
}

/// Platform call described independently of the token it will carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Path relative to the base endpoint, or an absolute `http(s)://` URL.
	pub path: String,
	/// Query parameters, serialized in key order.
	pub query: BTreeMap<String, String>,
	/// Request body.
	pub body: TransportBody,
	/// Whether the access token is appended as `access_token`.
	pub attach_credential: bool,
}
impl ApiRequest {
	/// Starts a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(HttpMethod::Get, path)
	}

	/// Starts a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(HttpMethod::Post, path)
	}

	fn new(method: HttpMethod, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: BTreeMap::new(),
			body: TransportBody::Empty,
			attach_credential: true,
		}
	}

	/// Adds or replaces one query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.insert(key.into(), value.to_string());

		self
	}

	/// Serializes `body` as the JSON request body.
	pub fn json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		let bytes = serde_json::to_vec(body).map_err(ConfigError::BodySerialize)?;

		self.body = TransportBody::Json(bytes);

		Ok(self)
	}

	/// Appends a multipart file part, switching the body to `multipart/form-data`.
	pub fn multipart(mut self, part: MultipartPart) -> Self {
		match &mut self.body {
			TransportBody::Multipart(parts) => parts.push(part),
			body => *body = TransportBody::Multipart(vec![part]),
		}

		self
	}

	/// Sends the request without an access token (endpoints authenticated by secret or user token).
	pub fn without_credential(mut self) -> Self {
		self.attach_credential = false;

		self
	}

	/// Resolves the final URL, merging any query already present on the path.
	///
	/// Each parameter appears exactly once; an `access_token` supplied by the caller is replaced
	/// by `credential`.
	pub fn to_transport(
		&self,
		config: &ClientConfig,
		credential: Option<&Credential>,
	) -> Result<TransportRequest> {
		let mut url = config.resolve(&self.path).map_err(|source| ConfigError::InvalidRequestUrl {
			path: self.path.clone(),
			source,
		})?;
		let mut query: BTreeMap<String, String> = url.query_pairs().into_owned().collect();

		query.extend(self.query.iter().map(|(k, v)| (k.clone(), v.clone())));

		if let Some(credential) = credential {
			query.insert("access_token".into(), credential.expose().to_owned());
		}
		if query.is_empty() {
			url.set_query(None);
		} else {
			url.query_pairs_mut().clear().extend_pairs(&query);
		}

		Ok(TransportRequest { method: self.method, url, body: self.body.clone() })
	}
}

/// Raw payload returned by binary endpoints (media downloads, QR images).
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPayload {
	/// Declared `Content-Type`, if any.
	pub content_type: Option<String>,
	/// Payload bytes.
	pub bytes: Vec<u8>,
}
impl Debug for MediaPayload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MediaPayload")
			.field("content_type", &self.content_type)
			.field("len", &self.bytes.len())
			.finish()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResponseMode {
	Json,
	Binary,
}

#[derive(Debug, Deserialize)]
struct EnvelopeHeader {
	#[serde(default)]
	errcode: i64,
	#[serde(default)]
	errmsg: String,
}

/// Sends platform calls with the current access token and applies the envelope policy.
pub struct Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	transport: Arc<C>,
	config: Arc<ClientConfig>,
	tokens: TokenManager<C>,
}
impl<C> Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) fn new(
		transport: Arc<C>,
		config: Arc<ClientConfig>,
		tokens: TokenManager<C>,
	) -> Self {
		Self { transport, config, tokens }
	}

	/// Configuration requests are resolved against.
	pub fn config(&self) -> &Arc<ClientConfig> {
		&self.config
	}

	/// Token manager supplying credentials to this dispatcher.
	pub fn tokens(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Sends `request` and decodes the envelope payload into `T`.
	pub async fn dispatch<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.execute(&request, ResponseMode::Json).await?;

		decode_payload(&response)
	}

	/// Sends `request` and only checks the envelope for success.
	pub async fn dispatch_ack(&self, request: ApiRequest) -> Result<()> {
		self.execute(&request, ResponseMode::Json).await.map(|_| ())
	}

	/// Sends `request` and returns the raw body; JSON bodies are still checked for errors.
	pub async fn dispatch_binary(&self, request: ApiRequest) -> Result<MediaPayload> {
		let response = self.execute(&request, ResponseMode::Binary).await?;

		Ok(MediaPayload { content_type: response.content_type, bytes: response.body })
	}

	async fn execute(&self, request: &ApiRequest, mode: ResponseMode) -> Result<TransportResponse> {
		const KIND: FlowKind = FlowKind::Dispatch;

		let span = FlowSpan::new(KIND, &self.config.app_id, "dispatch");

		span.record_path(&request.path);
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.execute_with_retry(request, mode)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => {
				if let Some(errcode) = e.errcode() {
					span.record_errcode(errcode);
				}

				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	async fn execute_with_retry(
		&self,
		request: &ApiRequest,
		mode: ResponseMode,
	) -> Result<TransportResponse> {
		if !request.attach_credential {
			let response = self.send(request, None).await?;

			inspect(&response, mode)?;

			return Ok(response);
		}

		let credential = self.tokens.get_token(false).await?;
		let response = self.send(request, Some(&credential)).await?;

		match inspect(&response, mode) {
			Ok(()) => Ok(response),
			Err(Error::RemoteApi { errcode, .. }) if is_credential_rejected(errcode) => {
				obs::warn!(
					errcode,
					path = %request.path,
					"Access token rejected; retrying once with a fresh one."
				);
				obs::record_credential_rejected(errcode);

				let fresh = self.tokens.refresh_rejected(&credential).await?;
				let response = self.send(request, Some(&fresh)).await?;

				inspect(&response, mode)?;

				Ok(response)
			},
			Err(e) => Err(e),
		}
	}

	async fn send(
		&self,
		request: &ApiRequest,
		credential: Option<&Credential>,
	) -> Result<TransportResponse> {
		let request = request.to_transport(&self.config, credential)?;

		Ok(self.transport.send(request).await?)
	}
}
impl<C> Clone for Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			tokens: self.tokens.clone(),
		}
	}
}
impl<C> Debug for Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher").field("base_url", &self.config.base_url.as_str()).finish()
	}
}

/// Checks the envelope and decodes the payload; used where no retry applies.
pub(crate) fn decode_envelope<T>(response: &TransportResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	inspect(response, ResponseMode::Json)?;

	decode_payload(response)
}

fn inspect(response: &TransportResponse, mode: ResponseMode) -> Result<()> {
	if mode == ResponseMode::Binary && !response.looks_like_json() {
		if response.is_success() {
			return Ok(());
		}

		return Err(TransportError::Status { status: response.status }.into());
	}

	let header = match serde_json::from_slice::<EnvelopeHeader>(&response.body) {
		Ok(header) => header,
		Err(_) if !response.is_success() =>
			return Err(TransportError::Status { status: response.status }.into()),
		Err(source) => return Err(DecodeError::Envelope { source, status: response.status }.into()),
	};

	if header.errcode != 0 {
		return Err(Error::RemoteApi { errcode: header.errcode, errmsg: header.errmsg });
	}
	if !response.is_success() {
		return Err(TransportError::Status { status: response.status }.into());
	}

	Ok(())
}

fn decode_payload<T>(response: &TransportResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Payload { source, status: response.status }.into())
}
