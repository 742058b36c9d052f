use anyhow::{bail, Result};

/// Operating system families the installer knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
    Unsupported,
}

impl HostOs {
    pub fn current() -> Self {
        Self::from_target(std::env::consts::OS)
    }

    pub fn from_target(os: &str) -> Self {
        match os {
            "windows" => HostOs::Windows,
            "macos" => HostOs::MacOs,
            "linux" | "aix" => HostOs::Linux,
            _ => HostOs::Unsupported,
        }
    }

    pub fn runtime_program(self) -> &'static str {
        match self {
            HostOs::Windows => "node.exe",
            _ => "node",
        }
    }

    pub fn package_manager_program(self) -> &'static str {
        match self {
            HostOs::Windows => "npm.cmd",
            _ => "npm",
        }
    }
}

/// Maps a Rust target arch onto the arch suffix used by Node.js release assets.
pub fn node_arch(arch: &str) -> Result<&'static str> {
    match arch {
        "x86_64" => Ok("x64"),
        "x86" => Ok("x86"),
        "aarch64" => Ok("arm64"),
        other => bail!("unsupported architecture: {other}"),
    }
}
