// HTTP routes
pub mod auth;
pub mod chats;
pub mod contacts;
pub mod health;
pub mod settings;
pub mod users;

pub use auth::*;
pub use chats::*;
pub use contacts::*;
pub use health::*;
pub use settings::*;
pub use users::*;
