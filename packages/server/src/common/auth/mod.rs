//! Authentication errors shared by the auth domain and the HTTP layer.

mod errors;

pub use errors::AuthError;
