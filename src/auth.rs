//! Identifiers, secrets, and credential models shared by every flow.

pub mod credential;
pub mod id;
pub mod secret;

pub use credential::*;
pub use id::*;
pub use secret::*;
