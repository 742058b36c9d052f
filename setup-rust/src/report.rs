use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use tracing::{error, warn};

use crate::{paths, ui::{Dialog, Prompt}};

pub const ERROR_TITLE: &str = "Error while setting up Node.js extension!";

/// Top-level failure handler: log, write `error.txt`, then show one dialog.
pub fn report(root: &Path, app_name: &str, err: &anyhow::Error, prompt: &dyn Prompt) {
    error!("setup failed: {err:#}");
    if let Err(write_err) = write_error_file(root, err) {
        warn!("could not write error file: {write_err:#}");
    }
    if let Err(ui_err) = prompt.error(error_dialog(app_name, err)) {
        warn!("could not show error dialog: {ui_err:#}");
    }
}

/// Writes the error chain (and backtrace, when captured) to `error.txt`.
pub fn write_error_file(root: &Path, err: &anyhow::Error) -> Result<PathBuf> {
    let path = paths::error_file(root);
    fs::write(&path, format!("{err:?}\n")).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub fn error_dialog(app_name: &str, err: &anyhow::Error) -> Dialog {
    Dialog::new(ERROR_TITLE, format!("Error in setup of {app_name}"), err.to_string())
}
