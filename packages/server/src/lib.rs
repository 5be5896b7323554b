// LangBridge - API Core
//
// Chat-application backend: phone OTP authentication, user preferences,
// contact lookup and a recent-chats listing.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
