//! Typed wrappers for platform endpoints.
//!
//! Each wrapper translates typed parameters into one [`ApiRequest`](crate::flows::ApiRequest)
//! and decodes the envelope payload, so all of them inherit the dispatcher's credential handling.

pub mod jssdk;
pub mod material;
pub mod media;
pub mod menu;
pub mod message;
pub mod qrcode;
pub mod session;
pub mod user;

pub use jssdk::*;
pub use material::*;
pub use media::*;
pub use menu::*;
pub use message::*;
pub use qrcode::*;
pub use session::*;
pub use user::*;
