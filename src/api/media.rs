//! Media download and image moderation.

// self
use crate::{
	_prelude::*,
	flows::{ApiRequest, Client, MediaPayload},
	http::{HttpTransport, MultipartPart},
};

/// Envelope code returned by `img_sec_check` for images that violate content rules.
pub const RISKY_CONTENT_ERRCODE: i64 = 87014;

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Downloads temporary media.
	///
	/// Video media is answered with a JSON document carrying a download URL; it is returned as
	/// is, with its JSON content type.
	pub async fn download_media(&self, media_id: &str) -> Result<MediaPayload> {
		let request = ApiRequest::get("/cgi-bin/media/get").query("media_id", media_id);

		self.dispatcher().dispatch_binary(request).await
	}

	/// Checks an image against content rules; `Ok(false)` means the image was flagged.
	///
	/// The platform expects images under 1 MB and within 750 x 1334 pixels.
	pub async fn img_sec_check(&self, image: impl Into<Vec<u8>>) -> Result<bool> {
		let request = ApiRequest::post("/wxa/img_sec_check").multipart(MultipartPart {
			name: "media".into(),
			file_name: "image".into(),
			content_type: "application/octet-stream".into(),
			bytes: image.into(),
		});

		match self.dispatcher().dispatch_ack(request).await {
			Ok(()) => Ok(true),
			Err(Error::RemoteApi { errcode: RISKY_CONTENT_ERRCODE, .. }) => Ok(false),
			Err(e) => Err(e),
		}
	}
}
