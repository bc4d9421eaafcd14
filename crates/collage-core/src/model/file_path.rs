//! Image model backed by a file on disk.

use super::{ItemAttributes, ModelId, ModelTrait, Pixmap, fit_pixmap, pixmap_size};
use crate::fitter::SizeFitter;
use kurbo::Size;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An image sourced from a file path.
///
/// The image is decoded by the caller (see [`crate::loader::ImageLoader`]);
/// the model keeps the path it came from and, when it replaced a template,
/// the template's fitter so later content follows the same footprint.
#[derive(Debug, Clone)]
pub struct FilePathModel {
    pub(crate) id: ModelId,
    attributes: ItemAttributes,
    path: PathBuf,
    image: Pixmap,
    fitter: Option<SizeFitter>,
}

impl FilePathModel {
    /// Create a model for `path` showing `image`, rescaled through `fitter` if given.
    pub fn new(path: impl Into<PathBuf>, image: Pixmap, fitter: Option<SizeFitter>) -> Self {
        let image = match &fitter {
            Some(fitter) => fit_pixmap(image, fitter),
            None => image,
        };
        Self {
            id: Uuid::new_v4(),
            attributes: ItemAttributes::default(),
            path: path.into(),
            image,
            fitter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fitter(&self) -> Option<&SizeFitter> {
        self.fitter.as_ref()
    }

    pub fn image(&self) -> &Pixmap {
        &self.image
    }

    /// Replace the file and its decoded image in place.
    pub fn set_file_path(&mut self, path: impl Into<PathBuf>, image: Pixmap) {
        self.path = path.into();
        self.image = match &self.fitter {
            Some(fitter) => fit_pixmap(image, fitter),
            None => image,
        };
    }
}

impl ModelTrait for FilePathModel {
    fn id(&self) -> ModelId {
        self.id
    }

    fn attributes(&self) -> &ItemAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ItemAttributes {
        &mut self.attributes
    }

    fn size(&self) -> Size {
        pixmap_size(&self.image)
    }

    fn content(&self) -> Option<&Pixmap> {
        Some(&self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitter::FitMode;

    #[test]
    fn test_size_follows_image() {
        let model = FilePathModel::new("/shots/a.png", Pixmap::new(120, 80), None);
        assert_eq!(model.size(), Size::new(120.0, 80.0));
        assert_eq!(model.path(), Path::new("/shots/a.png"));
    }

    #[test]
    fn test_set_file_path_keeps_fitter() {
        let fitter = SizeFitter::new(Size::new(100.0, 100.0), FitMode::Fit);
        let mut model = FilePathModel::new("/shots/a.png", Pixmap::new(200, 100), Some(fitter));
        assert_eq!(model.size(), Size::new(100.0, 50.0));

        model.set_file_path("/shots/b.png", Pixmap::new(50, 400));
        assert_eq!(model.path(), Path::new("/shots/b.png"));
        assert_eq!(model.size(), Size::new(13.0, 100.0));
    }
}
