use crate::core::download::{AssetLocation, Downloader};
use crate::core::manifest::ReleaseDescriptor;
use crate::core::target::Target;
use crate::error::GhReleaseError;
use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const ASSETS_DIR: &str = "assets";

/// Where a prepare run is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Resolving,
    Downloading,
    Extracting,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Resolving => "resolving",
            Stage::Downloading => "downloading",
            Stage::Extracting => "extracting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
#[error("{source}")]
pub struct PrepareError {
    /// The stage that was running when the failure happened
    pub stage: Stage,
    #[source]
    pub source: GhReleaseError,
}

#[derive(Debug, Clone, Default)]
pub struct PrepareOptions {
    /// Package root holding `package.json`; extraction goes to `<dir>/assets`
    pub package_dir: PathBuf,
    pub platform: Option<String>,
    pub arch: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PrepareReport {
    pub target: Target,
    pub location: AssetLocation,
    pub archive_path: PathBuf,
    pub extract_dir: PathBuf,
}

/// Validate, resolve, download and extract, one stage after another.
pub struct Prepare {
    options: PrepareOptions,
    downloader: Downloader,
    stage: Stage,
}

impl Prepare {
    pub fn new(options: PrepareOptions, downloader: Downloader) -> Self {
        Self {
            options,
            downloader,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn run(&mut self) -> Result<PrepareReport, PrepareError> {
        match self.run_stages() {
            Ok(report) => {
                self.enter(Stage::Done);
                Ok(report)
            }
            Err(source) => {
                let stage = self.stage;
                self.enter(Stage::Failed);
                Err(PrepareError { stage, source })
            }
        }
    }

    fn run_stages(&mut self) -> crate::error::Result<PrepareReport> {
        self.enter(Stage::Validating);
        let descriptor = ReleaseDescriptor::load(&self.options.package_dir)?;

        self.enter(Stage::Resolving);
        let target = Target::host_or(self.options.platform.as_deref(), self.options.arch.as_deref())?;
        if !descriptor.supports(&target) {
            warn!("{target} is not listed in the package's declared os/cpu values");
        }
        info!("Preparing {target}");
        let location = AssetLocation::resolve(&descriptor, &target);

        self.enter(Stage::Downloading);
        let archive_path = self.downloader.fetch(&location)?;

        self.enter(Stage::Extracting);
        let extract_dir = self.options.package_dir.join(ASSETS_DIR);
        self.downloader.extract_archive(&archive_path, &extract_dir)?;

        Ok(PrepareReport {
            target,
            location,
            archive_path,
            extract_dir,
        })
    }

    fn enter(&mut self, stage: Stage) {
        debug!("{} -> {}", self.stage, stage);
        self.stage = stage;
    }
}

/// Run the full pipeline over HTTP.
pub fn prepare(options: PrepareOptions, temp_dir: PathBuf) -> Result<PrepareReport, PrepareError> {
    let downloader = Downloader::with_http(temp_dir).map_err(|source| PrepareError {
        stage: Stage::Idle,
        source,
    })?;
    Prepare::new(options, downloader).run()
}
