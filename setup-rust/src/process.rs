use std::{
    ffi::OsStr,
    io,
    path::Path,
    process::{Command, ExitStatus, Output, Stdio},
};
use tracing::{debug, info};

/// Process seam used by every pipeline step.
///
/// `output` and `wait` block until the child exits; `detach` returns as soon
/// as the child is spawned and is only used for the extension itself.
pub trait ProcessRunner {
    fn output(&mut self, cmd: &mut Command) -> io::Result<Output>;
    fn wait(&mut self, cmd: &mut Command) -> io::Result<ExitStatus>;
    fn detach(&mut self, cmd: &mut Command) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct SystemProcesses;

impl ProcessRunner for SystemProcesses {
    fn output(&mut self, cmd: &mut Command) -> io::Result<Output> {
        debug!("> {}", format_command(cmd));
        let output = cmd.output()?;
        debug!(
            status = %exit_code(output.status),
            stdout = %String::from_utf8_lossy(&output.stdout).trim_end(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
            "command finished"
        );
        Ok(output)
    }

    fn wait(&mut self, cmd: &mut Command) -> io::Result<ExitStatus> {
        info!("> {}", format_command(cmd));
        let status = cmd.status()?;
        info!(status = %exit_code(status), "command finished");
        Ok(status)
    }

    fn detach(&mut self, cmd: &mut Command) -> io::Result<()> {
        info!("> {} (detached)", format_command(cmd));
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        let child = cmd.spawn()?;
        info!(pid = child.id(), "extension started");
        Ok(())
    }
}

/// Command rooted in the extension directory with stdin closed.
pub fn command(program: impl AsRef<OsStr>, root: &Path) -> Command {
    let mut c = Command::new(program);
    c.current_dir(root).stdin(Stdio::null());
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        c.creation_flags(CREATE_NO_WINDOW);
    }
    c
}

pub fn format_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args = cmd
        .get_args()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {args}")
    }
}

pub fn exit_code(status: ExitStatus) -> String {
    status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_runs_in_root() {
        let tmp = tempfile::tempdir().unwrap();
        let cmd = command("node", tmp.path());
        assert_eq!(cmd.get_current_dir(), Some(tmp.path()));
        assert_eq!(cmd.get_program(), "node");
    }

    #[test]
    fn format_command_joins_args() {
        let mut cmd = Command::new("npm");
        assert_eq!(format_command(&cmd), "npm");
        cmd.arg("run").arg("start");
        assert_eq!(format_command(&cmd), "npm run start");
    }

    #[test]
    fn output_reports_missing_program() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cmd = command("node-setup-definitely-missing-binary", tmp.path());
        let err = SystemProcesses.output(&mut cmd).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
