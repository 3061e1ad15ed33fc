use std::path::{Path, PathBuf};

use crate::{
    errors::Result,
    models::{BuildArgs, BuildTarget, HeadInfo},
};

/// Describes which images exist and what they need on disk.
pub trait BuildFrontend {
    /// Files that must exist, relative to the repository root, before any
    /// build is started. Checked in the returned order.
    fn required_assets(&self) -> Vec<PathBuf>;

    /// Targets in the order they have to be built.
    fn targets(&self, root: &Path, args: &BuildArgs) -> Result<Vec<BuildTarget>>;

    /// Example commands for running a built image.
    fn usage(&self, program: &str, target: &BuildTarget) -> Vec<String>;
}

pub trait ImageBackend {
    fn program(&self) -> &str;

    /// Builds one image and returns the exit code of the build engine.
    fn build_image(&mut self, target: &BuildTarget) -> Result<i32>;
}

pub trait VersionControl {
    /// Branch and abbreviated commit of `HEAD`, read in one go.
    fn head_info(&self) -> Result<HeadInfo>;
}
