//! Chats domain - minimal recent-chats listing

pub mod actions;
pub mod models;

pub use models::{Chat, LastMessage, NewChat};
