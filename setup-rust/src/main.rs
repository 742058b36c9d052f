#![cfg_attr(windows, windows_subsystem = "windows")]

mod args;
mod cache;
mod config;
mod deps;
mod download;
mod error;
mod host;
mod installer;
mod launcher;
mod logging;
mod paths;
mod platform;
mod process;
mod report;
mod runner;
mod ui;
mod version;

use anyhow::{anyhow, Context, Result};
use std::thread;

fn main() -> Result<()> {
    let root = paths::root_dir()?;
    let config = config::Config::load(&root);
    let log_filter = config
        .as_ref()
        .map(|cfg| cfg.log_filter.clone())
        .unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.to_string());
    let _log_guard = logging::init(&root, &log_filter);
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Dialogs are served from the main thread; the setup runs beside it.
    let (ui, ui_loop) = ui::channel();
    let setup = thread::Builder::new()
        .name("setup".to_string())
        .spawn(move || {
            let app_name = config
                .as_ref()
                .map(|cfg| cfg.app_name.clone())
                .unwrap_or_else(|_| paths::app_name(&root));
            let result = config.and_then(|cfg| runner::run(&root, &cfg, &args, &ui));
            if let Err(err) = result {
                report::report(&root, &app_name, &err, &ui);
            }
        })
        .context("spawn setup thread")?;

    ui_loop.serve(&ui::NativeDialogs);
    setup.join().map_err(|_| anyhow!("setup thread panicked"))?;
    Ok(())
}
