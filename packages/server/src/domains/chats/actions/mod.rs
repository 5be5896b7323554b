mod recent_chats;

pub use recent_chats::{recent_chats, RECENT_CHATS_LIMIT};
