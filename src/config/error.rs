// BSD 3-Clause License
// Copyright (c) 2025, NØNOS - NOXTERM
//! Configuration error types

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {key}")]
    MissingRequired { key: String },

    #[error("Invalid value for {key}: '{value}' - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Malformed mapping entry for {key}: '{value}' - {reason}")]
    MalformedMapping {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unable to render configuration schema: {message}")]
    Schema { message: String },
}

impl ConfigError {
    /// Derived environment variable name the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::MissingRequired { key }
            | ConfigError::InvalidValue { key, .. }
            | ConfigError::MalformedMapping { key, .. } => Some(key),
            ConfigError::Schema { .. } => None,
        }
    }
}

/// Every error recorded during one binding pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindErrors(Vec<ConfigError>);

impl BindErrors {
    pub(crate) fn new(errors: Vec<ConfigError>) -> Self {
        BindErrors(errors)
    }

    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigError> {
        self.0.iter()
    }
}

impl fmt::Display for BindErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for BindErrors {}

impl IntoIterator for BindErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
