use crate::{download::Downloader, platform::HostOs, process::ProcessRunner, ui::Prompt};

/// Everything the pipeline touches outside of its own root directory.
pub struct Host<'a> {
    pub os: HostOs,
    pub arch: &'a str,
    pub processes: &'a mut dyn ProcessRunner,
    pub downloader: &'a dyn Downloader,
    pub prompt: &'a dyn Prompt,
}
