//! Empty placeholder awaiting an image.

use super::{ItemAttributes, ModelId, ModelTrait, Pixmap};
use crate::fitter::{FitMode, SizeFitter};
use kurbo::Size;
use uuid::Uuid;

/// Footprint of templates created from the toolbar.
pub const DEFAULT_TEMPLATE_SIZE: Size = Size::new(400.0, 400.0);

/// A placeholder with a fixed footprint. Content dropped onto it is
/// rescaled through its fitter.
#[derive(Debug, Clone)]
pub struct TemplateModel {
    pub(crate) id: ModelId,
    attributes: ItemAttributes,
    size: Size,
    fitter: SizeFitter,
}

impl TemplateModel {
    /// Create a template whose content is fitted into `size`.
    pub fn new(size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            attributes: ItemAttributes::default(),
            size,
            fitter: SizeFitter::new(size, FitMode::Fit),
        }
    }

    /// Use a custom fit policy for content dropped onto this template.
    pub fn with_fitter(mut self, fitter: SizeFitter) -> Self {
        self.fitter = fitter;
        self
    }

    pub fn fitter(&self) -> &SizeFitter {
        &self.fitter
    }
}

impl ModelTrait for TemplateModel {
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
        self.size
    }

    fn content(&self) -> Option<&Pixmap> {
        None
    }
}
