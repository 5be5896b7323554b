pub mod preferences;
pub mod user;

pub use preferences::Preferences;
pub use user::User;
