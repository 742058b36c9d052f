use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "NODE_SETUP_ROOT";

const CACHE_DIR_NAME: &str = "setupCache";
const ERROR_FILE_NAME: &str = "error.txt";
const MANIFEST_FILE_NAME: &str = "package.json";
const CONFIG_FILE_NAME: &str = "node-setup.toml";

pub fn self_path() -> Result<PathBuf> {
    std::env::current_exe().context("current_exe")
}

/// Directory the extension is installed in. Every child process runs here.
pub fn root_dir() -> Result<PathBuf> {
    if let Ok(dev_root) = std::env::var(ROOT_ENV) {
        return Ok(PathBuf::from(dev_root));
    }
    let exe = self_path()?;
    Ok(exe.parent().context("exe has no parent")?.to_path_buf())
}

pub fn cache_dir(root: &Path) -> PathBuf {
    root.join(CACHE_DIR_NAME)
}

pub fn error_file(root: &Path) -> PathBuf {
    root.join(ERROR_FILE_NAME)
}

pub fn manifest_file(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE_NAME)
}

pub fn config_file(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Name of the extension as shown to the user. Extensions ship their files
/// one level below the application directory, so the root's parent names it.
pub fn app_name(root: &Path) -> String {
    root.parent()
        .and_then(Path::file_name)
        .or_else(|| root.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Node.js extension".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn root_dir_prefers_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let prior = std::env::var(ROOT_ENV).ok();

        let tmp = tempfile::tempdir().unwrap();
        std::env::set_var(ROOT_ENV, tmp.path());
        let root = root_dir().unwrap();
        assert_eq!(root, tmp.path());

        if let Some(v) = prior {
            std::env::set_var(ROOT_ENV, v);
        } else {
            std::env::remove_var(ROOT_ENV);
        }
    }

    #[test]
    fn root_dir_defaults_to_exe_dir() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let prior = std::env::var(ROOT_ENV).ok();
        std::env::remove_var(ROOT_ENV);

        let root = root_dir().unwrap();
        let exe = self_path().unwrap();
        assert_eq!(Some(root.as_path()), exe.parent());

        if let Some(v) = prior {
            std::env::set_var(ROOT_ENV, v);
        }
    }

    #[test]
    fn files_are_rooted() {
        let root = PathBuf::from("/opt/extensions/MyExt");
        assert_eq!(cache_dir(&root), root.join("setupCache"));
        assert_eq!(error_file(&root), root.join("error.txt"));
        assert_eq!(manifest_file(&root), root.join("package.json"));
        assert_eq!(config_file(&root), root.join("node-setup.toml"));
    }

    #[test]
    fn app_name_is_parent_dir_name() {
        assert_eq!(
            app_name(Path::new("/opt/G-Earth/Extensions/ChatLogger/bin")),
            "ChatLogger"
        );
        assert_eq!(app_name(Path::new("/opt/extensions/MyExt")), "extensions");
    }

    #[test]
    fn app_name_falls_back_near_fs_root() {
        assert_eq!(app_name(Path::new("/MyExt")), "MyExt");
        assert_eq!(app_name(Path::new("/")), "Node.js extension");
    }
}
