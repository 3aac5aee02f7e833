// BSD 3-Clause License
// Copyright (c) 2025, NØNOS - NOXTERM
//! Configuration loading from environment variables

use std::env::{self, VarError};

use tracing::{debug, info};

use super::coerce::{parse_bool, parse_duration, parse_integer, parse_map};
use super::error::{BindErrors, ConfigError};
use super::schema::{Leaf, Target, SCHEMA};
use super::types::Root;

impl Root {
    /// Bind against the process environment.
    pub fn from_env() -> Result<Self, BindErrors> {
        Self::bind_vars(SCHEMA, |key| env::var(key))
    }

    /// Bind every leaf of the schema, reading variables through `lookup`.
    pub fn bind<F>(lookup: F) -> Result<Self, BindErrors>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::bind_with(SCHEMA, lookup)
    }

    /// Bind against an explicit schema table.
    pub fn bind_with<F>(schema: &[Leaf], lookup: F) -> Result<Self, BindErrors>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::bind_vars(schema, |key| lookup(key).ok_or(VarError::NotPresent))
    }

    /// Bind with a lookup shaped like [`std::env::var`], so values that are
    /// not valid UTF-8 are reported instead of read as absent.
    ///
    /// All problems are collected; the first one does not stop the pass.
    pub fn bind_vars<F>(schema: &[Leaf], var: F) -> Result<Self, BindErrors>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let mut config = Root::default();
        let mut errors = Vec::new();
        let mut defaulted = 0usize;

        for leaf in schema.iter().filter(|leaf| !leaf.ignored) {
            let key = leaf.env_key();
            let value = match var(&key) {
                Ok(value) if !value.is_empty() => Some(value),
                Ok(_) | Err(VarError::NotPresent) => None,
                Err(VarError::NotUnicode(value)) => {
                    errors.push(ConfigError::InvalidValue {
                        key,
                        value: value.to_string_lossy().into_owned(),
                        reason: "not valid UTF-8".to_string(),
                    });
                    continue;
                }
            };
            let raw = match value {
                Some(value) => value,
                None => match leaf.default {
                    Some(default) => {
                        debug!(key = %key, default, "Using default");
                        defaulted += 1;
                        default.to_string()
                    }
                    None if leaf.required => {
                        errors.push(ConfigError::MissingRequired { key });
                        continue;
                    }
                    None => continue,
                },
            };

            if let Err(e) = apply(leaf, &raw, &mut config) {
                errors.push(e);
            }
        }

        config.smtp.domain_no_store = config
            .smtp
            .domain_no_store
            .take()
            .map(|domain| domain.to_lowercase());

        if !errors.is_empty() {
            return Err(BindErrors::new(errors));
        }

        info!(
            leaves = schema.len(),
            defaulted,
            storage = %config.storage.kind,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Coerce `raw` into the leaf's type and store it in `config`.
pub(crate) fn apply(leaf: &Leaf, raw: &str, config: &mut Root) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: leaf.env_key(),
        value: raw.to_string(),
        reason,
    };

    match leaf.target {
        Target::Text(field) => *field(config) = raw.to_string(),
        Target::OptionalText(field) => *field(config) = Some(raw.to_string()),
        Target::Integer(field) => *field(config) = parse_integer(raw).map_err(invalid)?,
        Target::Boolean(field) => *field(config) = parse_bool(raw).map_err(invalid)?,
        Target::Duration(field) => *field(config) = parse_duration(raw).map_err(invalid)?,
        Target::Map(field) => {
            *field(config) = parse_map(raw).map_err(|reason| ConfigError::MalformedMapping {
                key: leaf.env_key(),
                value: raw.to_string(),
                reason,
            })?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn bind(vars: &[(&str, &str)]) -> Result<Root, BindErrors> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Root::bind(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_in_empty_environment() {
        let config = bind(&[]).unwrap();

        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.smtp.addr, "0.0.0.0:2500");
        assert_eq!(config.smtp.domain, "inbucket");
        assert_eq!(config.smtp.domain_no_store, None);
        assert_eq!(config.smtp.max_recipients, 200);
        assert_eq!(config.smtp.max_message_bytes, 10_240_000);
        assert!(config.smtp.store_messages);
        assert_eq!(config.smtp.timeout, Duration::from_secs(300));
        assert!(!config.smtp.debug);

        assert_eq!(config.pop3.addr, "0.0.0.0:1100");
        assert_eq!(config.pop3.domain, "inbucket");
        assert_eq!(config.pop3.timeout, Duration::from_secs(600));

        assert_eq!(config.web.addr, "0.0.0.0:9000");
        assert_eq!(config.web.ui_dir, "ui");
        assert_eq!(config.web.greeting_file, "ui/greeting.html");
        assert!(config.web.template_cache);
        assert_eq!(config.web.mailbox_prompt, "@inbucket");
        assert_eq!(config.web.cookie_auth_key, None);
        assert!(config.web.monitor_visible);
        assert_eq!(config.web.monitor_history, 30);

        assert_eq!(config.storage.kind, "memory");
        assert!(config.storage.params.is_empty());
        assert_eq!(config.storage.retention_period, Duration::from_secs(24 * 3600));
        assert_eq!(config.storage.retention_sleep, Duration::from_millis(50));
        assert_eq!(config.storage.mailbox_msg_cap, 500);
    }

    #[test]
    fn test_explicit_values() {
        let config = bind(&[
            ("INBUCKET_SMTP_TIMEOUT", "45s"),
            ("INBUCKET_SMTP_STOREMESSAGES", "false"),
            ("INBUCKET_WEB_MONITORHISTORY", "42"),
            ("INBUCKET_WEB_COOKIEAUTHKEY", "s3cret"),
            ("INBUCKET_STORAGE_TYPE", "file"),
            ("INBUCKET_STORAGE_PARAMS", "path=/tmp/inbucket,fsync=1"),
        ])
        .unwrap();

        assert_eq!(config.smtp.timeout, Duration::from_secs(45));
        assert!(!config.smtp.store_messages);
        assert_eq!(config.web.monitor_history, 42);
        assert_eq!(config.web.cookie_auth_key.as_deref(), Some("s3cret"));
        assert_eq!(config.storage.kind, "file");
        assert_eq!(config.storage.param("path"), Some("/tmp/inbucket"));
        assert_eq!(config.storage.param("fsync"), Some("1"));
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let config = bind(&[("INBUCKET_POP3_DOMAIN", "")]).unwrap();
        assert_eq!(config.pop3.domain, "inbucket");
    }

    #[test]
    fn test_domain_no_store_is_lowercased() {
        let config = bind(&[("INBUCKET_SMTP_DOMAINNOSTORE", "MiXeD.Example.COM")]).unwrap();
        assert_eq!(
            config.smtp.domain_no_store.as_deref(),
            Some("mixed.example.com")
        );
    }

    #[test]
    fn test_ignored_leaves_are_not_read() {
        let config = bind(&[
            ("INBUCKET_SMTP_DEBUG", "true"),
            ("INBUCKET_POP3_DEBUG", "not-a-bool"),
        ])
        .unwrap();
        assert!(!config.smtp.debug);
        assert!(!config.pop3.debug);
    }

    #[test]
    fn test_coercion_errors_name_key_and_value() {
        let errors = bind(&[("INBUCKET_SMTP_MAXRECIPIENTS", "lots")]).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors.errors()[0] {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "INBUCKET_SMTP_MAXRECIPIENTS");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_all_errors_are_collected() {
        let errors = bind(&[
            ("INBUCKET_SMTP_STOREMESSAGES", "maybe"),
            ("INBUCKET_POP3_TIMEOUT", "10 minutes"),
            ("INBUCKET_WEB_MONITORHISTORY", "3.5"),
            ("INBUCKET_STORAGE_PARAMS", "a=1,bad"),
        ])
        .unwrap_err();

        let keys: Vec<&str> = errors.iter().filter_map(ConfigError::key).collect();
        assert_eq!(
            keys,
            vec![
                "INBUCKET_SMTP_STOREMESSAGES",
                "INBUCKET_POP3_TIMEOUT",
                "INBUCKET_WEB_MONITORHISTORY",
                "INBUCKET_STORAGE_PARAMS",
            ]
        );
        assert!(matches!(
            errors.errors()[3],
            ConfigError::MalformedMapping { .. }
        ));

        let report = errors.to_string();
        assert_eq!(report.lines().count(), 4);
        assert!(report.contains("'maybe'"));
    }

    #[test]
    fn test_binding_is_idempotent() {
        let vars = [
            ("INBUCKET_LOGLEVEL", "DEBUG"),
            ("INBUCKET_STORAGE_PARAMS", "b=2,a=1"),
            ("INBUCKET_SMTP_DOMAINNOSTORE", "Bulk.Example"),
        ];
        assert_eq!(bind(&vars).unwrap(), bind(&vars).unwrap());
    }

    #[test]
    fn test_missing_required_without_default() {
        let schema = [
            Leaf {
                path: &["SMTP", "Addr"],
                target: Target::Text(|c| &mut c.smtp.addr),
                required: true,
                default: None,
                description: "",
                ignored: false,
            },
            Leaf {
                path: &["SMTP", "Domain"],
                target: Target::Text(|c| &mut c.smtp.domain),
                required: false,
                default: None,
                description: "",
                ignored: false,
            },
        ];

        let errors = Root::bind_with(&schema, |_| None).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ConfigError::MissingRequired {
                key: "INBUCKET_SMTP_ADDR".to_string()
            }]
        );

        let config = Root::bind_with(&schema, |key| {
            (key == "INBUCKET_SMTP_ADDR").then(|| "127.0.0.1:25".to_string())
        })
        .unwrap();
        assert_eq!(config.smtp.addr, "127.0.0.1:25");
        assert_eq!(config.smtp.domain, "");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_value_is_reported() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let errors = Root::bind_vars(SCHEMA, |key| match key {
            "INBUCKET_SMTP_MAXRECIPIENTS" => {
                Err(VarError::NotUnicode(OsString::from_vec(b"5\xff".to_vec())))
            }
            _ => Err(VarError::NotPresent),
        })
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        match &errors.errors()[0] {
            ConfigError::InvalidValue { key, value, reason } => {
                assert_eq!(key, "INBUCKET_SMTP_MAXRECIPIENTS");
                assert_eq!(value, "5\u{FFFD}");
                assert_eq!(reason, "not valid UTF-8");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
