use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};

/// Copies `asset` into `dir` unless a non-empty copy is already there.
///
/// Returns the path of the local copy.
pub fn asset_file_path<P: AsRef<Path>, D: AsRef<Path>>(asset: P, dir: D) -> Result<PathBuf> {
    let asset = asset.as_ref();
    let name = asset.file_name().ok_or_else(|| {
        Error::InvalidConfig(format!("asset path {} has no file name", asset.display()))
    })?;
    let target = dir.as_ref().join(name);

    if let Ok(metadata) = fs::metadata(&target) {
        if metadata.len() > 0 {
            return Ok(target);
        }
    }

    fs::create_dir_all(dir.as_ref())?;
    let mut reader = File::open(asset)?;
    let mut writer = BufWriter::new(File::create(&target)?);
    let copied = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;

    info!("copied {} ({} bytes) to {}", asset.display(), copied, target.display());
    Ok(target)
}
