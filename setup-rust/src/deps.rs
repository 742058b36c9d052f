use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::{error::SetupError, paths, process::{self, ProcessRunner}};

/// Runs `<package manager> install` when the root has a `package.json`.
/// Returns whether an install ran. The install's own exit code is only logged.
pub fn install_dependencies(
    processes: &mut dyn ProcessRunner,
    root: &Path,
    package_manager: &str,
) -> Result<bool> {
    let manifest = paths::manifest_file(root);
    if !manifest.exists() {
        info!("no package.json, skipping dependency install");
        return Ok(false);
    }

    let mut cmd = process::command(package_manager, root);
    cmd.arg("install");
    let status = processes
        .wait(&mut cmd)
        .with_context(|| format!("run {}", process::format_command(&cmd)))
        .context(SetupError::DependencyInstallFailed)?;
    if !status.success() {
        warn!(status = %process::exit_code(status), "dependency install exited with an error");
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fakes::{Call, FakeProcesses};
    use std::fs;

    #[test]
    fn skips_without_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let mut processes = FakeProcesses::without_runtime();
        let ran = install_dependencies(&mut processes, tmp.path(), "npm").unwrap();
        assert!(!ran);
        assert!(processes.calls.is_empty());
    }

    #[test]
    fn installs_with_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(paths::manifest_file(tmp.path()), "{}").unwrap();
        let mut processes = FakeProcesses::without_runtime();

        let ran = install_dependencies(&mut processes, tmp.path(), "npm.cmd").unwrap();

        assert!(ran);
        assert_eq!(
            processes.calls,
            vec![Call::Wait(vec!["npm.cmd".to_string(), "install".to_string()])]
        );
        assert_eq!(processes.dirs, vec![Some(tmp.path().to_path_buf())]);
    }

    #[test]
    fn launch_failure_is_dependency_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(paths::manifest_file(tmp.path()), "{}").unwrap();
        let err = install_dependencies(
            &mut process::SystemProcesses,
            tmp.path(),
            "node-setup-definitely-missing-npm",
        )
        .unwrap_err();
        assert_eq!(
            crate::error::setup_error(&err),
            Some(SetupError::DependencyInstallFailed)
        );
    }
}
