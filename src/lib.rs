// Inbucket configuration library
// Environment binding and usage output for the SMTP, POP3 and web servers

pub mod build_info;
pub mod config;

pub use build_info::BuildInfo;
pub use config::{BindErrors, ConfigError, Root};
