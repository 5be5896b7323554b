//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod dev_otp;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PostgresChatStore, PostgresUserStore, ServerDeps, TwilioAdapter};
pub use dev_otp::DevOtpVerifier;
pub use test_dependencies::{
    InMemoryChatStore, InMemoryUserStore, MockOtpVerifier, TestDependencies,
};
pub use traits::*;
