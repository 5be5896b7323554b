//! Auth domain actions - business logic functions
//!
//! Actions are async functions called directly from HTTP handlers with the
//! shared `ServerDeps`.

mod authenticate;
mod request_otp;
mod verify_otp;

pub use authenticate::{authenticate, bearer_token};
pub use request_otp::request_otp;
pub use verify_otp::verify_otp;
