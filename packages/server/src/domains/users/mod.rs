//! Users domain - user documents and their preferences

pub mod actions;
pub mod models;

pub use models::{Preferences, User};
