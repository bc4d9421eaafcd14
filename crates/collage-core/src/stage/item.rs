//! Visual item: the on-canvas representation of one placed-item model.

use crate::model::{ModelId, Pixmap, PlacedModel};
use crate::reflection::Reflection;
use kurbo::{Affine, Point, Rect, Size};
use std::rc::Rc;
use uuid::Uuid;

/// Unique identifier for visual items.
pub type ItemId = Uuid;

/// Pixmap transformation quality used when painting an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformationMode {
    /// Nearest-neighbour sampling.
    Fast,
    /// Bilinear filtering.
    #[default]
    Smooth,
}

/// Interactive representation of a placed-item model.
///
/// Holds a non-owning back-reference to its model (by ID) and a shared
/// handle to the controller's reflection helper. Geometry is mirrored from
/// the model by [`VisualItem::sync_from`].
#[derive(Debug)]
pub struct VisualItem {
    id: ItemId,
    model: ModelId,
    reflection: Rc<Reflection>,
    position: Point,
    size: Size,
    rotation: i32,
    z: i32,
    transformation: TransformationMode,
}

impl VisualItem {
    /// Create an item bound to `model`, placed at the model's position.
    pub fn new(model: &PlacedModel, reflection: Rc<Reflection>) -> Self {
        let mut item = Self {
            id: Uuid::new_v4(),
            model: model.id(),
            reflection,
            position: Point::ZERO,
            size: Size::ZERO,
            rotation: 0,
            z: 0,
            transformation: TransformationMode::default(),
        };
        item.sync_from(model);
        item
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The model this item represents.
    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Stacking order; higher values paint in front.
    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn set_z(&mut self, z: i32) {
        self.z = z;
    }

    pub fn transformation(&self) -> TransformationMode {
        self.transformation
    }

    pub fn set_transformation(&mut self, mode: TransformationMode) {
        self.transformation = mode;
    }

    /// Mirror the model's geometry.
    pub fn sync_from(&mut self, model: &PlacedModel) {
        debug_assert_eq!(model.id(), self.model, "item synced from a foreign model");
        let attributes = model.attributes();
        self.position = attributes.position;
        self.size = model.size();
        self.rotation = attributes.rotation();
    }

    /// Unrotated bounding box in scene coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Rotation about the item's center.
    pub fn transform(&self) -> Affine {
        Affine::rotate_about(f64::from(self.rotation).to_radians(), self.bounds().center())
    }

    /// Check if a point (in scene coordinates) hits the rotated item.
    pub fn hit_test(&self, point: Point) -> bool {
        let local = self.transform().inverse() * point;
        self.bounds().contains(local)
    }

    /// Pixels to paint for this item: the model's content, with the
    /// reflection appended when enabled. Templates have nothing to paint.
    pub fn render(&self, model: &PlacedModel) -> Option<Pixmap> {
        let content = model.content()?;
        let attributes = model.attributes();
        if attributes.is_reflection_enabled() {
            Some(self.reflection.reflect(
                content,
                attributes.reflection_offset(),
                attributes.reflection_opacity(),
            ))
        } else {
            Some(content.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PixmapModel, TemplateModel};

    fn model_at(position: Point, width: u32, height: u32) -> PlacedModel {
        let mut model: PlacedModel = PixmapModel::new(Pixmap::new(width, height)).into();
        model.attributes_mut().position = position;
        model
    }

    #[test]
    fn test_item_follows_model() {
        let mut model = model_at(Point::new(5.0, 6.0), 40, 20);
        let mut item = VisualItem::new(&model, Rc::new(Reflection::new()));
        assert_eq!(item.model(), model.id());
        assert_eq!(item.position(), Point::new(5.0, 6.0));
        assert_eq!(item.size(), Size::new(40.0, 20.0));

        model.attributes_mut().translate(10.0, 0.0);
        model.attributes_mut().set_rotation(90);
        item.sync_from(&model);
        assert_eq!(item.position(), Point::new(15.0, 6.0));
        assert_eq!(item.rotation(), 90);
    }

    #[test]
    fn test_hit_test_respects_rotation() {
        let mut model = model_at(Point::new(0.0, 0.0), 100, 20);
        let mut item = VisualItem::new(&model, Rc::new(Reflection::new()));
        assert!(item.hit_test(Point::new(90.0, 10.0)));
        assert!(!item.hit_test(Point::new(50.0, 40.0)));

        // Rotated a quarter turn about (50, 10): now tall and narrow
        model.attributes_mut().set_rotation(90);
        item.sync_from(&model);
        assert!(!item.hit_test(Point::new(90.0, 10.0)));
        assert!(item.hit_test(Point::new(50.0, 40.0)));
    }

    #[test]
    fn test_render_with_reflection() {
        let mut model = model_at(Point::ZERO, 4, 4);
        let item = VisualItem::new(&model, Rc::new(Reflection::new()));
        assert_eq!(item.render(&model).unwrap().dimensions(), (4, 8));

        model.attributes_mut().set_reflection_enabled(false);
        assert_eq!(item.render(&model).unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn test_template_renders_nothing() {
        let model: PlacedModel = TemplateModel::new(Size::new(10.0, 10.0)).into();
        let item = VisualItem::new(&model, Rc::new(Reflection::new()));
        assert!(item.render(&model).is_none());
        assert_eq!(item.size(), Size::new(10.0, 10.0));
    }
}
