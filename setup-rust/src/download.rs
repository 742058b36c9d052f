use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::{
    cell::OnceCell,
    fs::File,
    io::{self, Read},
    path::Path,
    time::Duration,
};

/// Network seam for fetching installer packages and their checksum lists.
pub trait Downloader {
    /// Streams `url` into `dest`, replacing it once the body is complete.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
    fn fetch_text(&self, url: &str) -> Result<String>;
}

/// The client is built on the first request; runs that never download never
/// touch the TLS stack.
#[derive(Default)]
pub struct HttpDownloader {
    client: OnceCell<reqwest::blocking::Client>,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("node-setup/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()
            .context("build http client")?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let mut resp = self
            .client()?
            .get(url)
            .send()
            .with_context(|| format!("http GET {url}"))?
            .error_for_status()
            .context("http error")?;
        let parent = dest.parent().context("download target has no parent")?;
        let mut file = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(parent)
            .context("create temp download file")?;
        io::copy(&mut resp, &mut file).context("write download")?;
        file.persist(dest)
            .with_context(|| format!("persist {}", dest.display()))?;
        Ok(())
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        self.client()?
            .get(url)
            .send()
            .with_context(|| format!("http GET {url}"))?
            .error_for_status()
            .context("http error")?
            .text()
            .context("read response body")
    }
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Looks up `file_name` in a `SHASUMS256.txt` listing ("<hex>  <name>" lines).
pub fn expected_digest(shasums: &str, file_name: &str) -> Option<String> {
    shasums.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let digest = parts.next()?;
        let name = parts.next()?.trim_start_matches('*');
        (name == file_name).then(|| digest.to_ascii_lowercase())
    })
}

pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_file(path)?;
    if actual != expected.trim().to_ascii_lowercase() {
        bail!(
            "sha256 mismatch for {}: expected {expected}, got {actual}",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SHASUMS: &str = "\
1111111111111111111111111111111111111111111111111111111111111111  node-v18.0.0-x64.msi
2222222222222222222222222222222222222222222222222222222222222222  node-v18.0.0.pkg
3333333333333333333333333333333333333333333333333333333333333333 *node-v18.0.0-arm64.msi
";

    #[test]
    fn expected_digest_finds_listed_file() {
        assert_eq!(
            expected_digest(SHASUMS, "node-v18.0.0.pkg").as_deref(),
            Some("2222222222222222222222222222222222222222222222222222222222222222")
        );
        assert_eq!(
            expected_digest(SHASUMS, "node-v18.0.0-arm64.msi").as_deref(),
            Some("3333333333333333333333333333333333333333333333333333333333333333")
        );
        assert_eq!(expected_digest(SHASUMS, "node-v18.0.0-x86.msi"), None);
    }

    #[test]
    fn http_client_is_built_on_first_request() {
        let downloader = HttpDownloader::new();
        assert!(downloader.client.get().is_none());

        let first = downloader.client().unwrap();
        assert!(std::ptr::eq(first, downloader.client().unwrap()));
    }

    #[test]
    fn sha256_file_matches_known_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.bin");
        fs::write(&path, b"").unwrap();
        assert_eq!(
            sha256_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn verify_sha256_rejects_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("node.msi");
        fs::write(&path, b"installer").unwrap();

        let good = hex::encode(Sha256::digest(b"installer"));
        verify_sha256(&path, &good.to_uppercase()).unwrap();

        let err = verify_sha256(&path, &"0".repeat(64)).unwrap_err();
        assert!(err.to_string().contains("sha256 mismatch"));
    }
}
