use anyhow::{bail, Context, Result};
use std::{fmt, path::Path, str::FromStr};
use tracing::{info, warn};

use crate::process::{self, ProcessRunner};

/// Dot-separated numeric version, most significant component first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(Vec<u64>);

/// How versions of different depth are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Only the shared prefix is compared; "16" satisfies "16.4.0".
    Prefix,
    /// Missing components count as zero; "16" does not satisfy "16.4.0".
    Padded,
}

impl Version {
    /// Parses "18.2.0", "v18.2.0" or " 16 ". Any non-digit prefix is dropped.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw
            .trim()
            .trim_start_matches(|c: char| !c.is_ascii_digit());
        if trimmed.is_empty() {
            bail!("no version number in {raw:?}");
        }
        let components = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .with_context(|| format!("invalid version component {part:?} in {raw:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(components))
    }

    #[cfg(test)]
    pub fn components(&self) -> &[u64] {
        &self.0
    }

    pub fn satisfies(&self, min: &Version, policy: VersionPolicy) -> bool {
        match policy {
            VersionPolicy::Prefix => is_newer_or_equal(&self.0, &min.0),
            VersionPolicy::Padded => {
                let depth = self.0.len().max(min.0.len());
                let pad = |v: &[u64]| {
                    let mut out = v.to_vec();
                    out.resize(depth, 0);
                    out
                };
                is_newer_or_equal(&pad(&self.0), &pad(&min.0))
            }
        }
    }
}

/// The first differing component decides. Running out of components on
/// either side counts as equal, so a shorter version matching the prefix of
/// the minimum is accepted.
pub fn is_newer_or_equal(actual: &[u64], min: &[u64]) -> bool {
    for (a, m) in actual.iter().zip(min) {
        if a > m {
            return true;
        }
        if a < m {
            return false;
        }
    }
    true
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Runs `<runtime> --version` and reports whether it meets `min`.
///
/// Any failure is "not satisfied": the program cannot start, it prints
/// anything on stderr, or its first stdout line is not a version.
pub fn runtime_satisfies(
    processes: &mut dyn ProcessRunner,
    root: &Path,
    runtime: &str,
    min: &Version,
    policy: VersionPolicy,
) -> bool {
    let mut cmd = process::command(runtime, root);
    cmd.arg("--version");
    let output = match processes.output(&mut cmd) {
        Ok(output) => output,
        Err(err) => {
            warn!(runtime, error = %err, "runtime could not be started");
            return false;
        }
    };

    if !output.stderr.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(runtime, stderr = %stderr.trim_end(), "runtime reported an error");
        return false;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or_default();
    match Version::parse(first_line) {
        Ok(installed) => {
            let satisfied = installed.satisfies(min, policy);
            info!(%installed, required = %min, satisfied, "runtime version checked");
            satisfied
        }
        Err(err) => {
            warn!(runtime, error = %err, "runtime version unreadable");
            false
        }
    }
}
