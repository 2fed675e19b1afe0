// Asset file access

use super::AssetError;
use image::RgbaImage;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Resolves asset names against a root directory
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

fn ensure_exists(path: &Path) -> Result<(), AssetError> {
    if path.exists() {
        Ok(())
    } else {
        Err(AssetError::NotFound(path.to_string_lossy().to_string()))
    }
}

pub(crate) fn open_file(path: &Path) -> Result<File, AssetError> {
    ensure_exists(path)?;
    Ok(File::open(path)?)
}

pub(crate) fn read_text(path: &Path) -> Result<String, AssetError> {
    ensure_exists(path)?;
    Ok(std::fs::read_to_string(path)?)
}

pub(crate) fn read_image(path: &Path) -> Result<RgbaImage, AssetError> {
    ensure_exists(path)?;
    let image = image::open(path).map_err(|source| AssetError::Image {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    Ok(image.to_rgba8())
}
