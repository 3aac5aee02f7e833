// BSD 3-Clause License
// Copyright (c) 2025, NØNOS - NOXTERM
//
//! Inbucket Configuration Module
//! All configuration values are loaded from INBUCKET_* environment variables.

mod coerce;
mod error;
mod loader;
mod schema;
mod types;
pub mod usage;

pub use coerce::{format_duration, parse_bool, parse_duration, parse_integer, parse_map};
pub use error::{BindErrors, ConfigError};
pub use schema::{check, env_key, lookup, Kind, Leaf, Target, PREFIX, SCHEMA};
pub use types::{Pop3Config, Root, SmtpConfig, StorageConfig, WebConfig};
