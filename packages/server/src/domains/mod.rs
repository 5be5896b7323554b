pub mod auth;
pub mod chats;
pub mod contacts;
pub mod users;
