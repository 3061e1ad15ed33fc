use log::info;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::errors::{BuildError, Result};

/// Checks that every asset exists below `root` as a readable file.
///
/// Stops at the first missing asset. Returns the absolute paths otherwise.
pub fn verify_assets<P: AsRef<Path>>(root: &Path, assets: &[P]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::with_capacity(assets.len());

    for asset in assets {
        let path = root.join(asset);

        let is_readable_file = path.is_file() && File::open(&path).is_ok();
        if !is_readable_file {
            return Err(BuildError::MissingAsset { path });
        }

        info!("found asset {:?}", path);
        found.push(path);
    }

    Ok(found)
}
