use anyhow::{Context, Result};

use crate::{error::SetupError, version::Version};

pub const PORT_FLAG: &[&str] = &["--port", "-p"];
pub const FILE_FLAG: &[&str] = &["--filename", "-f"];
pub const AUTH_TOKEN_FLAG: &[&str] = &["--auth-token", "-c"];
pub const MIN_VERSION_FLAG: &[&str] = &["--min-version", "-v"];
pub const NPM_RUN_FLAG: &[&str] = &["--npm-run", "-npm"];
pub const EXTENSION_FLAG: &[&str] = &["--extension", "-e"];

/// Value following the first token equal to any alias, ignoring case.
/// A flag in last position has no value and counts as absent.
pub fn arg_value<'a>(args: &'a [String], aliases: &[&str]) -> Option<&'a str> {
    args.windows(2)
        .find(|pair| aliases.iter().any(|alias| pair[0].eq_ignore_ascii_case(alias)))
        .map(|pair| pair[1].as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Script(String),
    NpmRun(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupArgs {
    pub entry: Entry,
    pub min_version: Version,
    pub port: String,
    pub filename: Option<String>,
    pub auth_token: Option<String>,
}

impl SetupArgs {
    /// Validates the run args. Nothing is spawned or fetched before this passes.
    pub fn parse(args: &[String]) -> Result<Self> {
        let npm_run = arg_value(args, NPM_RUN_FLAG);
        let script = arg_value(args, EXTENSION_FLAG);
        let entry = match (npm_run, script) {
            (Some(name), _) => Entry::NpmRun(name.to_string()),
            (None, Some(path)) => Entry::Script(path.to_string()),
            (None, None) => return Err(SetupError::MissingEntry.into()),
        };
        let min_version = arg_value(args, MIN_VERSION_FLAG).ok_or(SetupError::MissingMinVersion)?;
        let port = arg_value(args, PORT_FLAG).ok_or(SetupError::MissingPort)?;
        let min_version = Version::parse(min_version)
            .with_context(|| SetupError::InvalidMinVersion(min_version.to_string()))?;

        Ok(Self {
            entry,
            min_version,
            port: port.to_string(),
            filename: arg_value(args, FILE_FLAG).map(str::to_string),
            auth_token: arg_value(args, AUTH_TOKEN_FLAG).map(str::to_string),
        })
    }
}
