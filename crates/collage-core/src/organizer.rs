//! Priority order in which templates receive dropped content.

use crate::model::{ModelId, PlacedModel};
use crate::scene::Scene;

/// Orders the template placeholders of a scene.
///
/// The order must be deterministic and independent of insertion order.
pub trait TemplateOrdering {
    fn ordered_templates(&self, scene: &Scene) -> Vec<ModelId>;
}

/// Orders templates in reading order: rows top to bottom, then left to right
/// within a row.
///
/// A template joins the current row when its center lies within the
/// vertical extent of the row's first template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateOrganizer;

impl TemplateOrganizer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateOrdering for TemplateOrganizer {
    fn ordered_templates(&self, scene: &Scene) -> Vec<ModelId> {
        let mut templates: Vec<&PlacedModel> = scene.templates().collect();
        templates.sort_by(|a, b| {
            let (a, b) = (a.center(), b.center());
            a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
        });

        let mut rows: Vec<Vec<&PlacedModel>> = Vec::new();
        for template in templates {
            let center_y = template.center().y;
            let same_row = rows.last().is_some_and(|row| {
                let first = row[0].bounds();
                center_y >= first.y0 && center_y <= first.y1
            });
            match rows.last_mut() {
                Some(row) if same_row => row.push(template),
                _ => rows.push(vec![template]),
            }
        }

        rows.into_iter()
            .flat_map(|mut row| {
                row.sort_by(|a, b| a.center().x.total_cmp(&b.center().x));
                row
            })
            .map(PlacedModel::id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Pixmap, PixmapModel, TemplateModel};
    use kurbo::{Point, Size};

    fn template_at(scene: &mut Scene, x: f64, y: f64) -> ModelId {
        let mut template: PlacedModel = TemplateModel::new(Size::new(100.0, 100.0)).into();
        template.attributes_mut().position = Point::new(x, y);
        scene.add_model(template)
    }

    #[test]
    fn test_reading_order() {
        let mut scene = Scene::new();
        // Inserted out of order; second row slightly ragged
        let bottom_right = template_at(&mut scene, 200.0, 210.0);
        let top_right = template_at(&mut scene, 200.0, 0.0);
        let bottom_left = template_at(&mut scene, 0.0, 190.0);
        let top_left = template_at(&mut scene, 0.0, 20.0);

        let order = TemplateOrganizer.ordered_templates(&scene);
        assert_eq!(order, vec![top_left, top_right, bottom_left, bottom_right]);
    }

    #[test]
    fn test_non_templates_excluded() {
        let mut scene = Scene::new();
        scene.add_model(PixmapModel::new(Pixmap::new(5, 5)));
        let template = template_at(&mut scene, 0.0, 0.0);
        assert_eq!(TemplateOrganizer.ordered_templates(&scene), vec![template]);
    }

    #[test]
    fn test_empty_scene() {
        assert!(TemplateOrganizer.ordered_templates(&Scene::new()).is_empty());
    }
}
