use crate::core::manifest::ReleaseDescriptor;
use crate::core::target::Target;
use crate::core::template;
use crate::error::{GhReleaseError, Result};
use crate::utils::fs;
use anyhow::Context;
use flate2::read::GzDecoder;
use log::{debug, info};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tar::Archive;
use zip::ZipArchive;

const USER_AGENT: &str = concat!("ghrelease-installer/", env!("CARGO_PKG_VERSION"));

pub fn release_asset_url(owner: &str, repo: &str, version: &str, asset_name: &str) -> String {
    format!("https://github.com/{owner}/{repo}/releases/download/{version}/{asset_name}")
}

/// A fully expanded asset name and the URL it is downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocation {
    pub version: String,
    pub asset_name: String,
    pub url: String,
}

impl AssetLocation {
    pub fn resolve(descriptor: &ReleaseDescriptor, target: &Target) -> Self {
        let asset_name = template::resolve_for_target(
            &descriptor.asset_name_template,
            &descriptor.version,
            target,
        );
        let url = release_asset_url(
            &descriptor.owner,
            &descriptor.repo,
            &descriptor.version,
            &asset_name,
        );

        Self {
            version: descriptor.version.clone(),
            asset_name,
            url,
        }
    }
}

/// Something that can GET a URL.
///
/// On a 2xx response the body is returned as a reader; otherwise the error
/// carries the status text (or the transport failure description).
pub trait Transport {
    fn get(&self, url: &str) -> std::result::Result<Box<dyn Read>, String>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> std::result::Result<Box<dyn Read>, String> {
        let response = self.client.get(url).send().map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string()));
        }

        debug!("GET {url} -> {status}");
        Ok(Box::new(response))
    }
}

pub struct Downloader {
    transport: Box<dyn Transport>,
    temp_dir: PathBuf,
}

impl Downloader {
    pub fn new(transport: Box<dyn Transport>, temp_dir: PathBuf) -> Self {
        Self {
            transport,
            temp_dir,
        }
    }

    pub fn with_http(temp_dir: PathBuf) -> Result<Self> {
        Ok(Self::new(Box::new(HttpTransport::new()?), temp_dir))
    }

    /// Download the asset into the temp directory and return the file path.
    ///
    /// The body is copied to disk as it arrives.
    pub fn fetch(&self, location: &AssetLocation) -> Result<PathBuf> {
        info!("Downloading {}", location.url);

        let download_error = |status: String| GhReleaseError::Download {
            version: location.version.clone(),
            url: location.url.clone(),
            status,
        };

        let mut body = self.transport.get(&location.url).map_err(download_error)?;

        fs::ensure_dir_exists(&self.temp_dir)?;
        let file_name = Path::new(&location.asset_name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&location.asset_name));
        let archive_path = self.temp_dir.join(file_name);

        let mut file = File::create(&archive_path)?;
        let written = io::copy(&mut body, &mut file).map_err(|e| download_error(e.to_string()))?;

        debug!("Wrote {written} bytes to {}", archive_path.display());
        Ok(archive_path)
    }

    /// Unpack `archive_path` into `destination`, keeping entry paths relative
    /// to the archive root. Existing files are overwritten.
    pub fn extract_archive(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        info!(
            "Extracting {} to {}",
            archive_path.display(),
            destination.display()
        );

        let file_name = archive_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        let result = if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
            extract_tar_gz(archive_path, destination)
        } else {
            extract_zip(archive_path, destination)
        };

        result.map_err(|e| GhReleaseError::extraction(archive_path, format!("{e:#}")))
    }
}

fn extract_tar_gz(archive_path: &Path, destination: &Path) -> anyhow::Result<()> {
    let file = File::open(archive_path)?;
    std::fs::create_dir_all(destination)
        .with_context(|| format!("cannot create {}", destination.display()))?;

    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_overwrite(true);
    archive.unpack(destination)?;
    Ok(())
}

fn extract_zip(archive_path: &Path, destination: &Path) -> anyhow::Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    std::fs::create_dir_all(destination)
        .with_context(|| format!("cannot create {}", destination.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => {
                debug!("Skipping unsafe zip entry {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)
                .with_context(|| format!("cannot write {}", outpath.display()))?;
            io::copy(&mut entry, &mut outfile)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    struct StaticTransport(std::result::Result<Vec<u8>, String>);

    impl Transport for StaticTransport {
        fn get(&self, _url: &str) -> std::result::Result<Box<dyn Read>, String> {
            match &self.0 {
                Ok(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
                Err(status) => Err(status.clone()),
            }
        }
    }

    fn descriptor() -> ReleaseDescriptor {
        ReleaseDescriptor {
            owner: "acme".to_string(),
            repo: "tool".to_string(),
            version: "1.2.0".to_string(),
            asset_name_template: "tool-${version}-${platform}-${arch}.zip".to_string(),
            supported_architectures: BTreeSet::from(["x64".to_string()]),
            supported_platforms: BTreeSet::from(["linux".to_string()]),
        }
    }

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_asset_location() {
        let target = Target::new("linux", "x64").unwrap();
        let location = AssetLocation::resolve(&descriptor(), &target);
        assert_eq!(location.asset_name, "tool-1.2.0-linux-x64.zip");
        assert_eq!(
            location.url,
            "https://github.com/acme/tool/releases/download/1.2.0/tool-1.2.0-linux-x64.zip"
        );
    }

    #[test]
    fn test_fetch_writes_body_to_temp_dir() {
        let temp = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(
            Box::new(StaticTransport(Ok(b"archive bytes".to_vec()))),
            temp.path().to_path_buf(),
        );
        let location = AssetLocation::resolve(&descriptor(), &Target::new("linux", "x64").unwrap());

        let path = downloader.fetch(&location).unwrap();
        assert_eq!(path, temp.path().join("tool-1.2.0-linux-x64.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), b"archive bytes");
    }

    #[test]
    fn test_fetch_failure_carries_status_text() {
        let temp = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(
            Box::new(StaticTransport(Err("Not Found".to_string()))),
            temp.path().to_path_buf(),
        );
        let location = AssetLocation::resolve(&descriptor(), &Target::new("linux", "x64").unwrap());

        let err = downloader.fetch(&location).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Download);
        assert!(err.to_string().ends_with("Not Found"));
        assert!(!temp.path().join(&location.asset_name).exists());
    }

    #[test]
    fn test_extract_zip_preserves_relative_paths() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("bundle.zip");
        std::fs::write(
            &archive,
            zip_bytes(&[("bin/tool", "#!/bin/sh\n"), ("README.md", "hello")]),
        )
        .unwrap();

        let destination = temp.path().join("assets");
        let downloader = Downloader::new(
            Box::new(StaticTransport(Ok(Vec::new()))),
            temp.path().to_path_buf(),
        );
        downloader.extract_archive(&archive, &destination).unwrap();

        assert_eq!(
            std::fs::read_to_string(destination.join("bin").join("tool")).unwrap(),
            "#!/bin/sh\n"
        );
        assert_eq!(
            std::fs::read_to_string(destination.join("README.md")).unwrap(),
            "hello"
        );

        // a second extraction overwrites in place
        downloader.extract_archive(&archive, &destination).unwrap();
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("bundle.tar.gz");

        let encoder = flate2::write::GzEncoder::new(
            File::create(&archive).unwrap(),
            flate2::Compression::default(),
        );
        let mut builder = tar::Builder::new(encoder);
        let data = b"payload";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "lib/data.bin", &data[..])
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        let destination = temp.path().join("out");
        let downloader = Downloader::new(
            Box::new(StaticTransport(Ok(Vec::new()))),
            temp.path().to_path_buf(),
        );
        downloader.extract_archive(&archive, &destination).unwrap();
        assert_eq!(
            std::fs::read(destination.join("lib").join("data.bin")).unwrap(),
            b"payload"
        );
    }

    #[test]
    fn test_corrupt_zip_is_extraction_error() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("broken.zip");
        std::fs::write(&archive, b"PK\x03\x04 definitely not a zip").unwrap();

        let destination = temp.path().join("assets");
        let downloader = Downloader::new(
            Box::new(StaticTransport(Ok(Vec::new()))),
            temp.path().to_path_buf(),
        );
        let err = downloader
            .extract_archive(&archive, &destination)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert!(!destination.exists());
    }

    #[test]
    fn test_truncated_zip_is_extraction_error() {
        let temp = tempfile::tempdir().unwrap();
        let bytes = zip_bytes(&[("bin/tool", "some binary content"), ("README.md", "hello")]);
        let archive = temp.path().join("truncated.zip");
        std::fs::write(&archive, &bytes[..bytes.len() / 2]).unwrap();

        let downloader = Downloader::new(
            Box::new(StaticTransport(Ok(Vec::new()))),
            temp.path().to_path_buf(),
        );
        let err = downloader
            .extract_archive(&archive, &temp.path().join("assets"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
    }

    #[test]
    fn test_unwritable_destination_is_extraction_error() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("bundle.zip");
        std::fs::write(&archive, zip_bytes(&[("tool", "x")])).unwrap();

        // destination already exists as a regular file
        let destination = temp.path().join("assets");
        std::fs::write(&destination, b"occupied").unwrap();

        let downloader = Downloader::new(
            Box::new(StaticTransport(Ok(Vec::new()))),
            temp.path().to_path_buf(),
        );
        let err = downloader
            .extract_archive(&archive, &destination)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
    }

    #[test]
    fn test_uncreatable_temp_dir_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let downloader = Downloader::new(
            Box::new(StaticTransport(Ok(b"archive bytes".to_vec()))),
            blocker.join("tmp"),
        );
        let location = AssetLocation::resolve(&descriptor(), &Target::new("linux", "x64").unwrap());

        let err = downloader.fetch(&location).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
