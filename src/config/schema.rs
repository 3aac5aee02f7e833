// BSD 3-Clause License
// Copyright (c) 2025, NØNOS - NOXTERM
//
//! Static configuration schema
//!
//! One table of leaf descriptors drives both binding and usage output. Each
//! leaf carries an accessor into [`Root`], so the table can be walked without
//! binding anything.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use super::error::ConfigError;
use super::loader::apply;
use super::types::Root;

/// Application prefix of every derived variable name.
pub const PREFIX: &str = "INBUCKET";

/// Semantic type of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Integer,
    Boolean,
    Duration,
    Map,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Text => write!(f, "text"),
            Kind::Integer => write!(f, "integer"),
            Kind::Boolean => write!(f, "boolean"),
            Kind::Duration => write!(f, "duration"),
            Kind::Map => write!(f, "mapping"),
        }
    }
}

/// Field a leaf writes to, tagged with its type.
#[derive(Clone, Copy)]
pub enum Target {
    Text(fn(&mut Root) -> &mut String),
    OptionalText(fn(&mut Root) -> &mut Option<String>),
    Integer(fn(&mut Root) -> &mut i64),
    Boolean(fn(&mut Root) -> &mut bool),
    Duration(fn(&mut Root) -> &mut Duration),
    Map(fn(&mut Root) -> &mut HashMap<String, String>),
}

impl Target {
    pub fn kind(&self) -> Kind {
        match self {
            Target::Text(_) | Target::OptionalText(_) => Kind::Text,
            Target::Integer(_) => Kind::Integer,
            Target::Boolean(_) => Kind::Boolean,
            Target::Duration(_) => Kind::Duration,
            Target::Map(_) => Kind::Map,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({})", self.kind())
    }
}

/// A single configurable setting.
#[derive(Debug, Clone, Copy)]
pub struct Leaf {
    /// Group names down to the field name, e.g. `["SMTP", "Addr"]`.
    pub path: &'static [&'static str],
    pub target: Target,
    pub required: bool,
    pub default: Option<&'static str>,
    pub description: &'static str,
    /// Never read from the environment and never listed in usage output.
    pub ignored: bool,
}

impl Leaf {
    pub fn kind(&self) -> Kind {
        self.target.kind()
    }

    pub fn env_key(&self) -> String {
        env_key(PREFIX, self.path)
    }
}

/// `PREFIX_GROUP_FIELD`, every segment upper-cased.
pub fn env_key(prefix: &str, path: &[&str]) -> String {
    std::iter::once(prefix)
        .chain(path.iter().copied())
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("_")
}

const fn required(
    path: &'static [&'static str],
    target: Target,
    default: &'static str,
    description: &'static str,
) -> Leaf {
    Leaf {
        path,
        target,
        required: true,
        default: Some(default),
        description,
        ignored: false,
    }
}

const fn optional(
    path: &'static [&'static str],
    target: Target,
    description: &'static str,
) -> Leaf {
    Leaf {
        path,
        target,
        required: false,
        default: None,
        description,
        ignored: false,
    }
}

const fn ignored(path: &'static [&'static str], target: Target) -> Leaf {
    Leaf {
        path,
        target,
        required: false,
        default: None,
        description: "",
        ignored: true,
    }
}

pub static SCHEMA: &[Leaf] = &[
    required(
        &["LogLevel"],
        Target::Text(|c| &mut c.log_level),
        "INFO",
        "DEBUG, INFO, WARN, or ERROR",
    ),
    // SMTP
    required(
        &["SMTP", "Addr"],
        Target::Text(|c| &mut c.smtp.addr),
        "0.0.0.0:2500",
        "SMTP server IP4 host:port",
    ),
    required(
        &["SMTP", "Domain"],
        Target::Text(|c| &mut c.smtp.domain),
        "inbucket",
        "HELO domain",
    ),
    optional(
        &["SMTP", "DomainNoStore"],
        Target::OptionalText(|c| &mut c.smtp.domain_no_store),
        "Load testing domain",
    ),
    required(
        &["SMTP", "MaxRecipients"],
        Target::Integer(|c| &mut c.smtp.max_recipients),
        "200",
        "Maximum RCPT TO per message",
    ),
    required(
        &["SMTP", "MaxMessageBytes"],
        Target::Integer(|c| &mut c.smtp.max_message_bytes),
        "10240000",
        "Maximum message size",
    ),
    required(
        &["SMTP", "StoreMessages"],
        Target::Boolean(|c| &mut c.smtp.store_messages),
        "true",
        "Store incoming mail?",
    ),
    required(
        &["SMTP", "Timeout"],
        Target::Duration(|c| &mut c.smtp.timeout),
        "300s",
        "Idle network timeout",
    ),
    ignored(&["SMTP", "Debug"], Target::Boolean(|c| &mut c.smtp.debug)),
    // POP3
    required(
        &["POP3", "Addr"],
        Target::Text(|c| &mut c.pop3.addr),
        "0.0.0.0:1100",
        "POP3 server IP4 host:port",
    ),
    required(
        &["POP3", "Domain"],
        Target::Text(|c| &mut c.pop3.domain),
        "inbucket",
        "HELLO domain",
    ),
    required(
        &["POP3", "Timeout"],
        Target::Duration(|c| &mut c.pop3.timeout),
        "600s",
        "Idle network timeout",
    ),
    ignored(&["POP3", "Debug"], Target::Boolean(|c| &mut c.pop3.debug)),
    // Web
    required(
        &["Web", "Addr"],
        Target::Text(|c| &mut c.web.addr),
        "0.0.0.0:9000",
        "Web server IP4 host:port",
    ),
    required(
        &["Web", "UIDir"],
        Target::Text(|c| &mut c.web.ui_dir),
        "ui",
        "User interface dir",
    ),
    required(
        &["Web", "GreetingFile"],
        Target::Text(|c| &mut c.web.greeting_file),
        "ui/greeting.html",
        "Home page greeting HTML",
    ),
    required(
        &["Web", "TemplateCache"],
        Target::Boolean(|c| &mut c.web.template_cache),
        "true",
        "Cache templates after first use?",
    ),
    required(
        &["Web", "MailboxPrompt"],
        Target::Text(|c| &mut c.web.mailbox_prompt),
        "@inbucket",
        "Prompt next to mailbox input",
    ),
    optional(
        &["Web", "CookieAuthKey"],
        Target::OptionalText(|c| &mut c.web.cookie_auth_key),
        "Session cipher key (text)",
    ),
    required(
        &["Web", "MonitorVisible"],
        Target::Boolean(|c| &mut c.web.monitor_visible),
        "true",
        "Show monitor tab in UI?",
    ),
    required(
        &["Web", "MonitorHistory"],
        Target::Integer(|c| &mut c.web.monitor_history),
        "30",
        "Monitor remembered messages",
    ),
    // Storage
    required(
        &["Storage", "Type"],
        Target::Text(|c| &mut c.storage.kind),
        "memory",
        "Storage impl: file or memory",
    ),
    optional(
        &["Storage", "Params"],
        Target::Map(|c| &mut c.storage.params),
        "Storage impl parameters, see docs.",
    ),
    required(
        &["Storage", "RetentionPeriod"],
        Target::Duration(|c| &mut c.storage.retention_period),
        "24h",
        "Duration to retain messages",
    ),
    required(
        &["Storage", "RetentionSleep"],
        Target::Duration(|c| &mut c.storage.retention_sleep),
        "50ms",
        "Duration to sleep between mailboxes",
    ),
    required(
        &["Storage", "MailboxMsgCap"],
        Target::Integer(|c| &mut c.storage.mailbox_msg_cap),
        "500",
        "Maximum messages per mailbox",
    ),
];

/// Find the leaf bound to a derived variable name.
pub fn lookup(schema: &[Leaf], key: &str) -> Option<Leaf> {
    schema.iter().copied().find(|leaf| leaf.env_key() == key)
}

/// Verify a schema table is internally consistent.
pub fn check(schema: &[Leaf]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    let mut scratch = Root::default();

    for leaf in schema {
        let valid_path = !leaf.path.is_empty()
            && leaf
                .path
                .iter()
                .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()));
        if !valid_path {
            return Err(ConfigError::Schema {
                message: format!("invalid leaf path {:?}", leaf.path),
            });
        }

        let key = leaf.env_key();
        if !seen.insert(key.clone()) {
            return Err(ConfigError::Schema {
                message: format!("duplicate key {}", key),
            });
        }

        if leaf.ignored {
            if leaf.required || leaf.default.is_some() {
                return Err(ConfigError::Schema {
                    message: format!("ignored leaf {} declares binding rules", key),
                });
            }
            continue;
        }

        if let Some(default) = leaf.default {
            apply(leaf, default, &mut scratch).map_err(|e| ConfigError::Schema {
                message: format!("bad default: {}", e),
            })?;
        }
    }

    Ok(())
}
