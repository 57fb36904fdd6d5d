extern crate thiserror;

pub mod actor;
pub mod config;
pub mod error;
pub mod feed;
pub mod interactions;
pub mod notifications;
pub mod platform;
pub mod realtime;
pub mod session;

pub use config::PlatformConfig;
pub use error::ClientError;
pub use platform::Platform;
pub use session::Session;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
