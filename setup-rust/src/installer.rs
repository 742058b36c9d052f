use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{info, warn};

use crate::{
    config::Config,
    download,
    error::SetupError,
    host::Host,
    paths,
    platform::{self, HostOs},
    process,
    ui::Dialog,
    version::Version,
};

const DIALOG_TITLE: &str = "Install/Update Node.js";

/// A Node.js release package and where its checksum list lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerPackage {
    pub file_name: String,
    pub url: String,
    pub shasums_url: String,
}

pub fn package_for(
    os: HostOs,
    arch: &str,
    dist_base_url: &str,
    version: &Version,
) -> Result<InstallerPackage> {
    let file_name = match os {
        HostOs::Windows => format!("node-v{version}-{}.msi", platform::node_arch(arch)?),
        HostOs::MacOs => format!("node-v{version}.pkg"),
        HostOs::Linux | HostOs::Unsupported => {
            bail!("no installer package for {os:?}")
        }
    };
    let release = format!("{}/v{version}", dist_base_url.trim_end_matches('/'));
    Ok(InstallerPackage {
        url: format!("{release}/{file_name}"),
        shasums_url: format!("{release}/SHASUMS256.txt"),
        file_name,
    })
}

/// Gets Node.js onto the machine, or asks the user to.
///
/// Windows and macOS download the official package into the scratch
/// directory and install it unattended. Linux only asks the user to update
/// through their package manager and carries on once they click OK.
pub fn install_runtime(
    host: &mut Host<'_>,
    root: &Path,
    config: &Config,
    version: &Version,
) -> Result<()> {
    info!(os = ?host.os, %version, "Node.js missing or outdated");
    match host.os {
        HostOs::Windows | HostOs::MacOs => {
            confirm_install(host)?;
            unattended_install(host, root, config, version).context(SetupError::InstallFailed)
        }
        HostOs::Linux => request_manual_install(host, config, version),
        HostOs::Unsupported => Err(SetupError::UnsupportedOs.into()),
    }
}

fn confirm_install(host: &Host<'_>) -> Result<()> {
    let dialog = Dialog::new(
        DIALOG_TITLE,
        "Node.js not found or newer version required",
        "Do you want to install/update Node.js?\nExtension will be launched once installation is completed",
    );
    let accepted = host
        .prompt
        .confirm(dialog)
        .context(SetupError::InstallRequestFailed)?;
    if !accepted {
        return Err(SetupError::InstallRejected.into());
    }
    Ok(())
}

fn request_manual_install(host: &Host<'_>, config: &Config, version: &Version) -> Result<()> {
    let dialog = Dialog::new(
        DIALOG_TITLE,
        format!("{} requires Node.js to be installed/updated!", config.app_name),
        format!(
            "Use your local package manager to update Node.js to a version of {version} or higher, afterwards click OK\n\
             (If you click OK before installing/updating, the extension will not run this time)"
        ),
    );
    let accepted = host
        .prompt
        .confirm(dialog)
        .context(SetupError::InstallRequestFailed)?;
    if !accepted {
        return Err(SetupError::SetupCancelled.into());
    }
    info!("user confirmed a manual Node.js install");
    Ok(())
}

fn unattended_install(
    host: &mut Host<'_>,
    root: &Path,
    config: &Config,
    version: &Version,
) -> Result<()> {
    let package = package_for(host.os, host.arch, &config.dist_base_url, version)?;
    let installer = fetch_package(host, root, config, &package)?;
    let mut cmd = installer_command(host.os, root, &installer)?;
    let status = host
        .processes
        .wait(&mut cmd)
        .with_context(|| format!("run {}", process::format_command(&cmd)))?;
    if !status.success() {
        warn!(status = %process::exit_code(status), "Node.js installer exited with an error");
    }
    Ok(())
}

fn installer_command(os: HostOs, root: &Path, installer: &Path) -> Result<Command> {
    let cmd = match os {
        HostOs::Windows => {
            let mut cmd = process::command("msiexec", root);
            cmd.arg("/i").arg(installer).arg("/quiet").arg("/norestart");
            cmd
        }
        HostOs::MacOs => {
            let mut cmd = process::command("installer", root);
            cmd.arg("-pkg")
                .arg(installer)
                .arg("-target")
                .arg("CurrentUserHomeDirectory");
            cmd
        }
        HostOs::Linux | HostOs::Unsupported => bail!("no unattended installer for {os:?}"),
    };
    Ok(cmd)
}

/// Downloads `package` into the scratch directory, checking its digest when enabled.
fn fetch_package(
    host: &Host<'_>,
    root: &Path,
    config: &Config,
    package: &InstallerPackage,
) -> Result<PathBuf> {
    let cache = paths::cache_dir(root);
    fs::create_dir_all(&cache).with_context(|| format!("create {}", cache.display()))?;
    let dest = cache.join(&package.file_name);

    info!(url = %package.url, "downloading Node.js installer");
    host.downloader
        .download(&package.url, &dest)
        .with_context(|| format!("download {}", package.url))?;

    if config.verify_checksum {
        let shasums = host
            .downloader
            .fetch_text(&package.shasums_url)
            .with_context(|| format!("download {}", package.shasums_url))?;
        let expected = download::expected_digest(&shasums, &package.file_name)
            .with_context(|| format!("{} not listed in SHASUMS256.txt", package.file_name))?;
        download::verify_sha256(&dest, &expected)?;
        info!(file = %package.file_name, "installer checksum verified");
    }

    Ok(dest)
}
