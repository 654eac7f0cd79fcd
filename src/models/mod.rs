//! Data models for Nomiko.

mod chat;
mod document;
mod media;

pub use chat::{ChatMessage, Sender};
pub use document::{derive_name, Document};
pub use media::{DataUri, DataUriError};
