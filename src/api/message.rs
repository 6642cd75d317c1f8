//! Customer-service and template messages.

// self
use crate::{
	_prelude::*,
	flows::{ApiRequest, Client},
	http::HttpTransport,
};

/// Customer-service message addressed to one follower.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	/// Recipient openid.
	pub touser: String,
	/// Payload; serialized as `msgtype` plus the matching content field.
	#[serde(flatten)]
	pub body: MessageBody,
	/// Sends as a specific customer-service account.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customservice: Option<CustomService>,
}
impl Message {
	/// Creates a message with the provided body.
	pub fn new(touser: impl Into<String>, body: MessageBody) -> Self {
		Self { touser: touser.into(), body, customservice: None }
	}

	/// Text message.
	pub fn text(touser: impl Into<String>, content: impl Into<String>) -> Self {
		Self::new(touser, MessageBody::Text { text: TextContent { content: content.into() } })
	}

	/// Image message referencing uploaded media.
	pub fn image(touser: impl Into<String>, media_id: impl Into<String>) -> Self {
		Self::new(touser, MessageBody::Image { image: MediaRef { media_id: media_id.into() } })
	}

	/// Sends through the named customer-service account.
	pub fn as_account(mut self, kf_account: impl Into<String>) -> Self {
		self.customservice = Some(CustomService { kf_account: kf_account.into() });

		self
	}

	/// Returns the `msgtype` label of the body.
	pub fn msgtype(&self) -> &'static str {
		self.body.msgtype()
	}
}

/// Message payload tagged by `msgtype`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum MessageBody {
	/// Plain text.
	Text {
		/// Content.
		text: TextContent,
	},
	/// Image.
	Image {
		/// Uploaded image.
		image: MediaRef,
	},
	/// Voice clip.
	Voice {
		/// Uploaded voice clip.
		voice: MediaRef,
	},
	/// Video.
	Video {
		/// Video details.
		video: VideoContent,
	},
	/// Music.
	Music {
		/// Music details.
		music: MusicContent,
	},
	/// External article links.
	News {
		/// Articles.
		news: NewsLinks,
	},
	/// Article stored as material.
	MpNews {
		/// Material reference.
		mpnews: MediaRef,
	},
	/// Inline menu.
	MsgMenu {
		/// Menu details.
		msgmenu: MsgMenuContent,
	},
	/// Card coupon.
	WxCard {
		/// Card reference.
		wxcard: CardRef,
	},
	/// Mini program card.
	MiniProgramPage {
		/// Card details.
		miniprogrampage: MiniProgramPageContent,
	},
}
impl MessageBody {
	/// Returns the `msgtype` label.
	pub const fn msgtype(&self) -> &'static str {
		match self {
			Self::Text { .. } => "text",
			Self::Image { .. } => "image",
			Self::Voice { .. } => "voice",
			Self::Video { .. } => "video",
			Self::Music { .. } => "music",
			Self::News { .. } => "news",
			Self::MpNews { .. } => "mpnews",
			Self::MsgMenu { .. } => "msgmenu",
			Self::WxCard { .. } => "wxcard",
			Self::MiniProgramPage { .. } => "miniprogrampage",
		}
	}
}

/// Text content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
	/// Text.
	pub content: String,
}

/// Reference to uploaded media.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
	/// Media identifier.
	pub media_id: String,
}

/// Video message details.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoContent {
	/// Video media identifier.
	pub media_id: String,
	/// Thumbnail media identifier.
	pub thumb_media_id: String,
	/// Title.
	pub title: String,
	/// Description.
	pub description: String,
}

/// Music message details.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicContent {
	/// Title.
	pub title: String,
	/// Description.
	pub description: String,
	/// Music URL.
	pub musicurl: String,
	/// High-quality music URL.
	pub hqmusicurl: String,
	/// Thumbnail media identifier.
	pub thumb_media_id: String,
}

/// External article list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsLinks {
	/// Articles (one is rendered).
	pub articles: Vec<NewsLink>,
}

/// External article link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsLink {
	/// Title.
	pub title: String,
	/// Description.
	pub description: String,
	/// Target URL.
	pub url: String,
	/// Cover image URL.
	pub picurl: String,
}

/// Inline menu message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMenuContent {
	/// Text before the options.
	pub head_content: String,
	/// Text after the options.
	pub tail_content: String,
	/// Options.
	pub list: Vec<MsgMenuItem>,
}

/// Inline menu option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMenuItem {
	/// Option identifier echoed back on click.
	pub id: String,
	/// Option label.
	pub content: String,
}

/// Card coupon reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
	/// Card identifier.
	pub card_id: String,
}

/// Mini program card details.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniProgramPageContent {
	/// Title.
	pub title: String,
	/// Mini program identifier.
	pub appid: String,
	/// Page path.
	pub pagepath: String,
	/// Thumbnail media identifier.
	pub thumb_media_id: String,
}

/// Customer-service account selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomService {
	/// Account, e.g. `test1@kftest`.
	pub kf_account: String,
}

/// Template (service notification) message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMessage {
	/// Recipient openid.
	pub touser: String,
	/// Template identifier.
	pub template_id: String,
	/// Page opened on tap.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	/// Mini program opened on tap; takes precedence over `url`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub miniprogram: Option<MiniProgramLink>,
	/// Template variables.
	pub data: BTreeMap<String, TemplateField>,
}
impl TemplateMessage {
	/// Creates a message without variables.
	pub fn new(touser: impl Into<String>, template_id: impl Into<String>) -> Self {
		Self {
			touser: touser.into(),
			template_id: template_id.into(),
			url: None,
			miniprogram: None,
			data: BTreeMap::new(),
		}
	}

	/// Sets the page opened on tap.
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());

		self
	}

	/// Sets one template variable.
	pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.data.insert(key.into(), TemplateField { value: value.into(), color: None });

		self
	}
}

/// Mini program target of a template message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniProgramLink {
	/// Mini program identifier.
	pub appid: String,
	/// Page path.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pagepath: Option<String>,
}

/// Value of one template variable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateField {
	/// Rendered value.
	pub value: String,
	/// Font color such as `#173177`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
}

#[derive(Deserialize)]
struct MessageId {
	msgid: i64,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Sends a customer-service message.
	pub async fn send_message(&self, message: &Message) -> Result<()> {
		let request = ApiRequest::post("/cgi-bin/message/custom/send").json(message)?;

		self.dispatcher().dispatch_ack(request).await
	}

	/// Sends a template message and returns its `msgid`.
	pub async fn send_template_message(&self, message: &TemplateMessage) -> Result<i64> {
		let request = ApiRequest::post("/cgi-bin/message/template/send").json(message)?;
		let id: MessageId = self.dispatcher().dispatch(request).await?;

		Ok(id.msgid)
	}
}
