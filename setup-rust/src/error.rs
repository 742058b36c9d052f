use thiserror::Error;

/// User-facing failures of the setup pipeline.
///
/// The display text is what ends up in the error dialog; the underlying cause,
/// when there is one, is attached as anyhow context so that `error.txt` keeps
/// the whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("Node.js extension file or npm run must be defined in the run args (-e script.js OR -npm start)")]
    MissingEntry,
    #[error("Minimum Node.js version has to be defined in the run args (-v 15.0.0)")]
    MissingMinVersion,
    #[error("Extension port must be defined in the run args (-p 9092)")]
    MissingPort,
    #[error("Invalid minimum Node.js version: {0}")]
    InvalidMinVersion(String),
    #[error("Node.js installation rejected, extension won't be able to run!")]
    InstallRejected,
    #[error("Setup cancelled, extension will most likely not launch!")]
    SetupCancelled,
    #[error("Error while requesting Node.js installation")]
    InstallRequestFailed,
    #[error("Unsupported Operating System")]
    UnsupportedOs,
    #[error("Error while installing Node.js")]
    InstallFailed,
    #[error("Error while installing modules, extension might not work!")]
    DependencyInstallFailed,
    #[error("Error while launching extension")]
    LaunchFailed,
}

/// Returns the setup failure an error chain was tagged with, if any.
#[cfg(test)]
pub fn setup_error(err: &anyhow::Error) -> Option<SetupError> {
    err.downcast_ref::<SetupError>().cloned()
}
