// BSD 3-Clause License
// Copyright (c) 2025, NØNOS - NOXTERM
//! Build identity

use serde::Serialize;

/// Version and build stamp of the running binary. Built once at startup and
/// passed to whatever reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    version: String,
    build_date: String,
    git_hash: String,
}

impl BuildInfo {
    pub fn new(
        version: impl Into<String>,
        build_date: impl Into<String>,
        git_hash: impl Into<String>,
    ) -> Self {
        BuildInfo {
            version: version.into(),
            build_date: build_date.into(),
            git_hash: git_hash.into(),
        }
    }

    /// Values stamped in at compile time by the build script.
    pub fn current() -> Self {
        BuildInfo::new(VERSION, BUILD_DATE, GIT_HASH)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    pub fn git_hash(&self) -> &str {
        &self.git_hash
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, built {})", self.version, self.git_hash, self.build_date)
    }
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const BUILD_DATE: &str = env!("BUILD_DATE");
pub const GIT_HASH: &str = env!("GIT_HASH");
