//! Auth domain - handles authentication via OTP (phone number)
//!
//! Flow:
//!   request_otp → verifier delivers a code
//!   verify_otp  → verifier approves → user upserted → session token issued
//!   authenticate → bearer token → stored user
//!
//! The auth core never touches HTTP types; handlers pass header values in.

pub mod actions;
pub mod jwt;

pub use jwt::{Claims, JwtService, TokenError};
