// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Server configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mgmt_pagination::DEFAULT_PAGE_SIZE;
use mgmt_tenancy::ScopePolicy;
use serde::Deserialize;

/// Default bind address for the HTTP server
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8090";

/// Default upper bound on a caller-supplied page size
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 500;

/// Server configuration loaded from environment variables or a JSON file
///
/// Fields missing from a JSON file keep their defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the dropshot server listens on
    pub bind_address: String,

    /// Directory holding `domains.json`, `accounts.json`, `capacity.json`
    /// and `storage_pools.json`
    pub fixtures_dir: PathBuf,

    /// Page size used when a list request gives none
    pub default_page_size: i64,

    /// Largest page size a caller may ask for (-1 is always allowed)
    pub max_page_size: i64,

    /// Scope resolution knobs
    pub scope: ScopePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            fixtures_dir: default_fixtures_dir(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            scope: ScopePolicy::default(),
        }
    }
}

/// Fixtures shipped with the crate
pub fn default_fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);

        let fixtures_dir = std::env::var("FIXTURES_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.fixtures_dir);

        let default_page_size = match std::env::var("DEFAULT_PAGE_SIZE") {
            Ok(v) => v.parse().context("Invalid DEFAULT_PAGE_SIZE")?,
            Err(_) => defaults.default_page_size,
        };

        let max_page_size = match std::env::var("MAX_PAGE_SIZE") {
            Ok(v) => v.parse().context("Invalid MAX_PAGE_SIZE")?,
            Err(_) => defaults.max_page_size,
        };

        // Accepts "true", "1", "yes" (case-insensitive) as true
        let bounded_recursive = std::env::var("SCOPE_BOUNDED_RECURSIVE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let config = Self {
            bind_address,
            fixtures_dir,
            default_page_size,
            max_page_size,
            scope: ScopePolicy { bounded_recursive },
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_page_size <= 0 {
            anyhow::bail!("max_page_size must be positive, got {}", self.max_page_size);
        }
        if self.default_page_size == 0 || self.default_page_size < -1 {
            anyhow::bail!(
                "default_page_size must be positive or -1, got {}",
                self.default_page_size
            );
        }
        if self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size,
                self.max_page_size
            );
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
