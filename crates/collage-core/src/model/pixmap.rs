//! Image model backed by in-memory pixel data.

use super::{ItemAttributes, ModelId, ModelTrait, Pixmap, pixmap_size};
use kurbo::Size;
use uuid::Uuid;

/// An image sourced directly from pixel data (clipboard, drag and drop).
#[derive(Debug, Clone)]
pub struct PixmapModel {
    pub(crate) id: ModelId,
    attributes: ItemAttributes,
    pixmap: Pixmap,
}

impl PixmapModel {
    pub fn new(pixmap: Pixmap) -> Self {
        Self {
            id: Uuid::new_v4(),
            attributes: ItemAttributes::default(),
            pixmap,
        }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Replace the pixel data in place.
    pub fn set_pixmap(&mut self, pixmap: Pixmap) {
        self.pixmap = pixmap;
    }
}

impl ModelTrait for PixmapModel {
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
        pixmap_size(&self.pixmap)
    }

    fn content(&self) -> Option<&Pixmap> {
        Some(&self.pixmap)
    }
}
