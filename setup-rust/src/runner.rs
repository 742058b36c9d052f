use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::{
    args::SetupArgs,
    cache,
    config::Config,
    deps,
    download::HttpDownloader,
    host::Host,
    installer,
    launcher::{self, LaunchCommand},
    platform::HostOs,
    process::SystemProcesses,
    ui::Prompt,
    version,
};

pub fn run(root: &Path, config: &Config, args: &[String], prompt: &dyn Prompt) -> Result<()> {
    let downloader = HttpDownloader::new();
    let mut processes = SystemProcesses;
    let mut host = Host {
        os: HostOs::current(),
        arch: std::env::consts::ARCH,
        processes: &mut processes,
        downloader: &downloader,
        prompt,
    };
    run_with_host(root, config, args, &mut host)
}

/// parse -> ensure runtime -> install deps -> launch -> clean cache.
/// The first failure stops the run; the scratch directory is only cleared
/// once the extension has been started.
pub fn run_with_host(
    root: &Path,
    config: &Config,
    args: &[String],
    host: &mut Host<'_>,
) -> Result<()> {
    let args = SetupArgs::parse(args)?;
    info!(root = %root.display(), entry = ?args.entry, min_version = %args.min_version, "starting setup");

    let satisfied = version::runtime_satisfies(
        host.processes,
        root,
        &config.runtime,
        &args.min_version,
        config.version_policy(),
    );
    if !satisfied {
        installer::install_runtime(host, root, config, &args.min_version)?;
    }

    deps::install_dependencies(host.processes, root, &config.package_manager)?;

    let command = LaunchCommand::build(&args, config);
    launcher::launch(host.processes, root, &command)?;

    cache::clear(root)?;
    info!("setup finished");
    Ok(())
}
