use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::{paths, platform::HostOs, version::VersionPolicy};

pub const DEFAULT_DIST_BASE_URL: &str = "https://nodejs.org/dist";
pub const DEFAULT_LOG_FILTER: &str = "node_setup=info";

/// Optional overrides read from `node-setup.toml` next to the binary.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    app_name: Option<String>,
    dist_base_url: Option<String>,
    runtime: Option<String>,
    package_manager: Option<String>,
    verify_checksum: Option<bool>,
    strict_versions: Option<bool>,
    log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub app_name: String,
    pub dist_base_url: String,
    pub runtime: String,
    pub package_manager: String,
    pub verify_checksum: bool,
    pub strict_versions: bool,
    pub log_filter: String,
}

impl Config {
    /// Defaults layered with `node-setup.toml`, when the root has one.
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_for(root, HostOs::current())
    }

    pub fn load_for(root: &Path, os: HostOs) -> Result<Self> {
        let path = paths::config_file(root);
        let file = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?
        } else {
            FileConfig::default()
        };
        Ok(Self::resolve(root, os, file))
    }

    #[cfg(test)]
    pub fn defaults(root: &Path, os: HostOs) -> Self {
        Self::resolve(root, os, FileConfig::default())
    }

    fn resolve(root: &Path, os: HostOs, file: FileConfig) -> Self {
        Self {
            app_name: non_empty(file.app_name).unwrap_or_else(|| paths::app_name(root)),
            dist_base_url: non_empty(file.dist_base_url)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_DIST_BASE_URL.to_string()),
            runtime: non_empty(file.runtime).unwrap_or_else(|| os.runtime_program().to_string()),
            package_manager: non_empty(file.package_manager)
                .unwrap_or_else(|| os.package_manager_program().to_string()),
            verify_checksum: file.verify_checksum.unwrap_or(true),
            strict_versions: file.strict_versions.unwrap_or(false),
            log_filter: non_empty(file.log_filter)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    pub fn version_policy(&self) -> VersionPolicy {
        if self.strict_versions {
            VersionPolicy::Padded
        } else {
            VersionPolicy::Prefix
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
