//! Drag-and-drop payloads.

use crate::model::{Pixmap, is_null_pixmap};
use std::path::{Path, PathBuf};
use url::Url;

/// Content delivered by a drop or paste: decoded pixel data and/or file URLs.
#[derive(Debug, Clone, Default)]
pub struct DropData {
    pub images: Vec<Pixmap>,
    pub urls: Vec<Url>,
}

impl DropData {
    pub fn from_images(images: Vec<Pixmap>) -> Self {
        Self {
            images,
            urls: Vec::new(),
        }
    }

    pub fn from_urls(urls: Vec<Url>) -> Self {
        Self {
            images: Vec::new(),
            urls,
        }
    }

    /// Build a payload from absolute local paths. Relative paths are skipped.
    pub fn from_paths<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        let urls = paths
            .into_iter()
            .filter_map(|p| Url::from_file_path(p.as_ref()).ok())
            .collect();
        Self::from_urls(urls)
    }

    /// Non-null images of the payload.
    pub fn pixmaps(&self) -> impl Iterator<Item = &Pixmap> {
        self.images.iter().filter(|p| !is_null_pixmap(p))
    }

    pub fn has_image(&self) -> bool {
        self.pixmaps().next().is_some()
    }

    /// Paths of the `file://` URLs; other schemes are ignored.
    pub fn local_file_paths(&self) -> Vec<PathBuf> {
        self.urls
            .iter()
            .filter(|url| url.scheme() == "file")
            .filter_map(|url| url.to_file_path().ok())
            .collect()
    }

    /// Whether the payload holds nothing this core can use.
    pub fn is_empty(&self) -> bool {
        !self.has_image() && self.local_file_paths().is_empty()
    }
}
