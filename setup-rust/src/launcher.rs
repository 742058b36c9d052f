use anyhow::{Context, Result};
use std::{path::Path, process::Command};

use crate::{
    args::{Entry, SetupArgs},
    config::Config,
    error::SetupError,
    process::{self, ProcessRunner},
};

/// npm swallows one `--` per nested script, so the port is pushed past four.
const NPM_PASSTHROUGH: [&str; 4] = ["--"; 4];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn build(args: &SetupArgs, config: &Config) -> Self {
        let (program, mut argv) = match &args.entry {
            Entry::NpmRun(name) => {
                let mut argv = vec!["run".to_string(), name.clone()];
                argv.extend(NPM_PASSTHROUGH.iter().map(|s| s.to_string()));
                (config.package_manager.clone(), argv)
            }
            Entry::Script(script) => (config.runtime.clone(), vec![script.clone()]),
        };
        argv.push("-p".to_string());
        argv.push(args.port.clone());
        if let Some(file) = &args.filename {
            argv.push("-f".to_string());
            argv.push(file.clone());
        }
        if let Some(token) = &args.auth_token {
            argv.push("-c".to_string());
            argv.push(token.clone());
        }
        Self {
            program,
            args: argv,
        }
    }

    #[cfg(test)]
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    pub fn to_command(&self, root: &Path) -> Command {
        let mut cmd = process::command(&self.program, root);
        cmd.args(&self.args);
        cmd
    }
}

/// Starts the extension without waiting for it.
pub fn launch(processes: &mut dyn ProcessRunner, root: &Path, command: &LaunchCommand) -> Result<()> {
    let mut cmd = command.to_command(root);
    processes
        .detach(&mut cmd)
        .with_context(|| format!("spawn {}", process::format_command(&cmd)))
        .context(SetupError::LaunchFailed)
}
