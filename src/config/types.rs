// BSD 3-Clause License
// Copyright (c) 2025, NØNOS - NOXTERM
//
//! Configuration type definitions
//! All configuration structs consumed by the SMTP, POP3, web and storage subsystems.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use super::coerce::format_duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Root {
    pub log_level: String,
    pub smtp: SmtpConfig,
    pub pop3: Pop3Config,
    pub web: WebConfig,
    pub storage: StorageConfig,
}

/// SMTP server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SmtpConfig {
    pub addr: String,
    pub domain: String,
    /// Always lowercase once bound.
    pub domain_no_store: Option<String>,
    pub max_recipients: i64,
    pub max_message_bytes: i64,
    pub store_messages: bool,
    #[serde(serialize_with = "serialize_duration")]
    pub timeout: Duration,
    /// Never bound from the environment.
    pub debug: bool,
}

/// POP3 server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pop3Config {
    pub addr: String,
    pub domain: String,
    #[serde(serialize_with = "serialize_duration")]
    pub timeout: Duration,
    /// Never bound from the environment.
    pub debug: bool,
}

/// HTTP server configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebConfig {
    pub addr: String,
    pub ui_dir: String,
    pub greeting_file: String,
    pub template_cache: bool,
    pub mailbox_prompt: String,
    #[serde(serialize_with = "serialize_secret")]
    pub cookie_auth_key: Option<String>,
    pub monitor_visible: bool,
    pub monitor_history: i64,
}

impl fmt::Debug for WebConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebConfig")
            .field("addr", &self.addr)
            .field("ui_dir", &self.ui_dir)
            .field("greeting_file", &self.greeting_file)
            .field("template_cache", &self.template_cache)
            .field("mailbox_prompt", &self.mailbox_prompt)
            .field(
                "cookie_auth_key",
                &self.cookie_auth_key.as_ref().map(|_| REDACTED),
            )
            .field("monitor_visible", &self.monitor_visible)
            .field("monitor_history", &self.monitor_history)
            .finish()
    }
}

/// Mail store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageConfig {
    /// Backend selector, `memory` or `file`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Backend specific parameters.
    pub params: HashMap<String, String>,
    #[serde(serialize_with = "serialize_duration")]
    pub retention_period: Duration,
    /// Pause between mailboxes during a retention sweep.
    #[serde(serialize_with = "serialize_duration")]
    pub retention_sleep: Duration,
    pub mailbox_msg_cap: i64,
}

impl StorageConfig {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

const REDACTED: &str = "[REDACTED]";

fn serialize_duration<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_duration(*d))
}

fn serialize_secret<S: Serializer>(v: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(_) => s.serialize_some(REDACTED),
        None => s.serialize_none(),
    }
}
