//! Image decoding collaborator.

use crate::model::{Pixmap, is_null_pixmap};
use image::ImageError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Image loading errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Image is empty: {}", .0.display())]
    Empty(PathBuf),
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Result type for image loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Supplies decoded pixel data for a file path.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> LoadResult<Pixmap>;
}

/// Decodes images from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &Path) -> LoadResult<Pixmap> {
        let image = image::open(path)
            .map_err(|e| match e {
                ImageError::IoError(io) => LoadError::Io(io),
                other => LoadError::Decode(other.to_string()),
            })?
            .to_rgba8();
        if is_null_pixmap(&image) {
            return Err(LoadError::Empty(path.to_path_buf()));
        }
        Ok(image)
    }
}

/// In-memory loader for testing and ephemeral use.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageLoader {
    images: HashMap<PathBuf, Pixmap>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the image returned for `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, image: Pixmap) {
        self.images.insert(path.into(), image);
    }

    /// Builder-style variant of [`MemoryImageLoader::insert`].
    pub fn with_image(mut self, path: impl Into<PathBuf>, image: Pixmap) -> Self {
        self.insert(path, image);
        self
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, path: &Path) -> LoadResult<Pixmap> {
        let image = self
            .images
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.to_path_buf()))?;
        if is_null_pixmap(&image) {
            return Err(LoadError::Empty(path.to_path_buf()));
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_loader_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        Pixmap::from_pixel(7, 3, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let image = FsImageLoader.load(&path).unwrap();
        assert_eq!(image.dimensions(), (7, 3));
        assert_eq!(image.get_pixel(6, 2), &image::Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_fs_loader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsImageLoader.load(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_fs_loader_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(FsImageLoader.load(&path), Err(LoadError::Decode(_))));
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryImageLoader::new()
            .with_image("/a.png", Pixmap::new(2, 2))
            .with_image("/empty.png", Pixmap::new(0, 0));

        assert!(loader.load(Path::new("/a.png")).is_ok());
        assert!(matches!(loader.load(Path::new("/b.png")), Err(LoadError::NotFound(_))));
        assert!(matches!(loader.load(Path::new("/empty.png")), Err(LoadError::Empty(_))));
    }
}
