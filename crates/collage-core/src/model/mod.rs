//! Placed-item models: the document entities arranged on the canvas.

mod defaults;
mod file_path;
mod pixmap;
mod template;

pub use defaults::DefaultModel;
pub use file_path::FilePathModel;
pub use pixmap::PixmapModel;
pub use template::{DEFAULT_TEMPLATE_SIZE, TemplateModel};

use crate::fitter::SizeFitter;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// In-memory pixel data.
pub type Pixmap = RgbaImage;

/// Unique identifier for placed-item models.
pub type ModelId = Uuid;

/// Largest allowed distance value.
pub const MAX_DISTANCE: i32 = 400;

/// Reflection offset range, in percent of the item height.
pub const REFLECTION_OFFSET_RANGE: (i32, i32) = (1, 100);

/// Reflection opacity range, in percent.
pub const REFLECTION_OPACITY_RANGE: (i32, i32) = (0, 100);

/// Size of a pixmap in pixels.
pub fn pixmap_size(pixmap: &Pixmap) -> Size {
    Size::new(pixmap.width() as f64, pixmap.height() as f64)
}

/// Whether a pixmap holds no pixels at all.
pub fn is_null_pixmap(pixmap: &Pixmap) -> bool {
    pixmap.width() == 0 || pixmap.height() == 0
}

/// Top-left position that keeps the center of an item fixed while its size
/// changes from `old_size` to `new_size`.
pub fn recenter(position: Point, old_size: Size, new_size: Size) -> Point {
    Point::new(
        position.x + old_size.width / 2.0 - new_size.width / 2.0,
        position.y + old_size.height / 2.0 - new_size.height / 2.0,
    )
}

/// Top-left position that puts the center of an item of `size` at `center`.
pub fn centered_at(center: Point, size: Size) -> Point {
    Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0)
}

/// Rescale `pixmap` through `fitter`, or return it unchanged when no resize is needed.
pub fn fit_pixmap(pixmap: Pixmap, fitter: &SizeFitter) -> Pixmap {
    match fitter.fit(pixmap_size(&pixmap)) {
        Some(fitted) => imageops::resize(
            &pixmap,
            fitted.width as u32,
            fitted.height as u32,
            FilterType::Triangle,
        ),
        None => pixmap,
    }
}

/// Attributes shared by every placed-item variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAttributes {
    /// Top-left corner in scene coordinates.
    pub position: Point,
    rotation: i32,
    distance: i32,
    reflection_enabled: bool,
    reflection_offset: i32,
    reflection_opacity: i32,
}

impl Default for ItemAttributes {
    fn default() -> Self {
        let defaults = DefaultModel::default();
        Self {
            position: Point::ZERO,
            rotation: defaults.rotation,
            distance: defaults.distance,
            reflection_enabled: defaults.reflection_enabled,
            reflection_offset: defaults.reflection_offset,
            reflection_opacity: defaults.reflection_opacity,
        }
    }
}

impl ItemAttributes {
    /// Rotation in degrees, within `0..360`.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, angle: i32) {
        self.rotation = angle.rem_euclid(360);
    }

    pub fn rotate(&mut self, angle: i32) {
        self.set_rotation(self.rotation.saturating_add(angle));
    }

    /// Distance (depth), within `0..=MAX_DISTANCE`.
    pub fn distance(&self) -> i32 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: i32) {
        self.distance = distance.clamp(0, MAX_DISTANCE);
    }

    pub fn add_distance(&mut self, delta: i32) {
        self.set_distance(self.distance.saturating_add(delta));
    }

    pub fn is_reflection_enabled(&self) -> bool {
        self.reflection_enabled
    }

    pub fn set_reflection_enabled(&mut self, enabled: bool) {
        self.reflection_enabled = enabled;
    }

    pub fn reflection_offset(&self) -> i32 {
        self.reflection_offset
    }

    pub fn set_reflection_offset(&mut self, offset: i32) {
        let (min, max) = REFLECTION_OFFSET_RANGE;
        self.reflection_offset = offset.clamp(min, max);
    }

    pub fn add_reflection_offset(&mut self, delta: i32) {
        self.set_reflection_offset(self.reflection_offset.saturating_add(delta));
    }

    pub fn reflection_opacity(&self) -> i32 {
        self.reflection_opacity
    }

    pub fn set_reflection_opacity(&mut self, opacity: i32) {
        let (min, max) = REFLECTION_OPACITY_RANGE;
        self.reflection_opacity = opacity.clamp(min, max);
    }

    pub fn add_reflection_opacity(&mut self, delta: i32) {
        self.set_reflection_opacity(self.reflection_opacity.saturating_add(delta));
    }

    /// Move the item by the given offset.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.position.x += dx;
        self.position.y += dy;
    }
}

/// Common trait for all placed-item variants.
pub trait ModelTrait {
    /// Get the unique identifier.
    fn id(&self) -> ModelId;

    /// Get the shared attributes.
    fn attributes(&self) -> &ItemAttributes;

    /// Get mutable shared attributes.
    fn attributes_mut(&mut self) -> &mut ItemAttributes;

    /// Intrinsic size of the item.
    fn size(&self) -> Size;

    /// Pixel content to paint, if the item holds any.
    fn content(&self) -> Option<&Pixmap>;
}

/// Variant tag of a [`PlacedModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    FilePath,
    Pixmap,
    Template,
}

/// A placed item on the canvas. Exactly one variant is active per instance;
/// changing variant means replacing the instance (see [`convert`]).
#[derive(Debug, Clone)]
pub enum PlacedModel {
    FilePath(FilePathModel),
    Pixmap(PixmapModel),
    Template(TemplateModel),
}

impl PlacedModel {
    pub fn id(&self) -> ModelId {
        match self {
            PlacedModel::FilePath(m) => m.id(),
            PlacedModel::Pixmap(m) => m.id(),
            PlacedModel::Template(m) => m.id(),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            PlacedModel::FilePath(_) => ModelKind::FilePath,
            PlacedModel::Pixmap(_) => ModelKind::Pixmap,
            PlacedModel::Template(_) => ModelKind::Template,
        }
    }

    pub fn attributes(&self) -> &ItemAttributes {
        match self {
            PlacedModel::FilePath(m) => m.attributes(),
            PlacedModel::Pixmap(m) => m.attributes(),
            PlacedModel::Template(m) => m.attributes(),
        }
    }

    pub fn attributes_mut(&mut self) -> &mut ItemAttributes {
        match self {
            PlacedModel::FilePath(m) => m.attributes_mut(),
            PlacedModel::Pixmap(m) => m.attributes_mut(),
            PlacedModel::Template(m) => m.attributes_mut(),
        }
    }

    pub fn size(&self) -> Size {
        match self {
            PlacedModel::FilePath(m) => m.size(),
            PlacedModel::Pixmap(m) => m.size(),
            PlacedModel::Template(m) => m.size(),
        }
    }

    pub fn content(&self) -> Option<&Pixmap> {
        match self {
            PlacedModel::FilePath(m) => m.content(),
            PlacedModel::Pixmap(m) => m.content(),
            PlacedModel::Template(m) => m.content(),
        }
    }

    /// Top-left corner in scene coordinates.
    pub fn position(&self) -> Point {
        self.attributes().position
    }

    /// Bounding box in scene coordinates (rotation ignored).
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// Geometric center of the bounding box.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn is_template(&self) -> bool {
        matches!(self, PlacedModel::Template(_))
    }

    pub fn as_template(&self) -> Option<&TemplateModel> {
        match self {
            PlacedModel::Template(t) => Some(t),
            _ => None,
        }
    }
}

impl From<FilePathModel> for PlacedModel {
    fn from(model: FilePathModel) -> Self {
        PlacedModel::FilePath(model)
    }
}

impl From<PixmapModel> for PlacedModel {
    fn from(model: PixmapModel) -> Self {
        PlacedModel::Pixmap(model)
    }
}

impl From<TemplateModel> for PlacedModel {
    fn from(model: TemplateModel) -> Self {
        PlacedModel::Template(model)
    }
}

/// Image content that replaces a model's content.
#[derive(Debug, Clone)]
pub enum NewContent {
    /// Decoded pixel data.
    Pixmap(Pixmap),
    /// A file reference together with its decoded image.
    FilePath { path: PathBuf, image: Pixmap },
}

/// Build the replacement for `old` holding `content`.
///
/// The result is a new instance with a fresh id. Rotation, distance and the
/// reflection settings are copied, and the position is chosen so the center
/// of the old bounding box is preserved. Templates pass their fitter on, so
/// the content is rescaled to the template's footprint.
pub fn convert(old: &PlacedModel, content: NewContent) -> PlacedModel {
    let fitter = old.as_template().map(|t| *t.fitter());
    let mut replacement: PlacedModel = match content {
        NewContent::Pixmap(pixmap) => {
            let pixmap = match &fitter {
                Some(fitter) => fit_pixmap(pixmap, fitter),
                None => pixmap,
            };
            PixmapModel::new(pixmap).into()
        }
        NewContent::FilePath { path, image } => FilePathModel::new(path, image, fitter).into(),
    };

    let position = recenter(old.position(), old.size(), replacement.size());
    let attributes = replacement.attributes_mut();
    *attributes = old.attributes().clone();
    attributes.position = position;
    replacement
}
