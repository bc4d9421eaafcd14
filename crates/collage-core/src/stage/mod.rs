//! Visual container: the live collection of visual items.
//!
//! The stage owns the visual items, their selection state, the background
//! brush and the view render hints. User gestures are not acted on here;
//! they are turned into [`StageEvent`] intents for the controller.

mod drop;
mod item;
mod selection;

pub use drop::DropData;
pub use item::{ItemId, TransformationMode, VisualItem};
pub use selection::{ItemState, SelectionManager};

use crate::model::Pixmap;
use kurbo::{Point, Vec2};
use peniko::Color;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;

/// Intent emitted by the stage in response to user interaction.
#[derive(Debug, Clone)]
pub enum StageEvent {
    /// Local files were dropped onto empty canvas.
    FilePathsDropped { paths: Vec<PathBuf>, center: Point },
    /// Pixel data was dropped onto empty canvas.
    PixmapsDropped { pixmaps: Vec<Pixmap>, center: Point },
    /// Content was dropped onto an item.
    DroppedOnItem { item: ItemId, data: DropData },
    /// Move the selection.
    Translate { dx: f64, dy: f64 },
    /// Rotate the selection by whole degrees.
    Rotate(i32),
    /// Change the distance of the selection.
    AddDistance(i32),
}

/// Fill used for the canvas background.
#[derive(Debug, Clone)]
pub enum Brush {
    /// Solid color fill.
    Solid(Color),
    /// Tiled pattern fill.
    Pattern(Rc<Pixmap>),
}

/// View-level painting hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderHints {
    pub antialiasing: bool,
    pub smooth_pixmap_transform: bool,
}

impl RenderHints {
    /// Hints for interactive, cheap redraws.
    pub const FAST: Self = Self {
        antialiasing: false,
        smooth_pixmap_transform: false,
    };

    /// Hints for full-quality redraws.
    pub const SMOOTH: Self = Self {
        antialiasing: true,
        smooth_pixmap_transform: true,
    };
}

impl Default for RenderHints {
    fn default() -> Self {
        Self::SMOOTH
    }
}

/// The visual container.
#[derive(Debug, Default)]
pub struct Stage {
    items: HashMap<ItemId, VisualItem>,
    /// Insertion order of items.
    order: Vec<ItemId>,
    selection: SelectionManager,
    background: Option<Brush>,
    render_hints: RenderHints,
    events: VecDeque<StageEvent>,
}

impl Stage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item.
    pub fn add_item(&mut self, item: VisualItem) -> ItemId {
        let id = item.id();
        if self.items.insert(id, item).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Remove an item, returning it.
    pub fn remove_item(&mut self, id: ItemId) -> Option<VisualItem> {
        let item = self.items.remove(&id)?;
        self.order.retain(|&item_id| item_id != id);
        self.selection.remove(id);
        Some(item)
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
        self.selection.clear();
    }

    pub fn item(&self, id: ItemId) -> Option<&VisualItem> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut VisualItem> {
        self.items.get_mut(&id)
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &VisualItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Mutable access to every item, in no particular order.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut VisualItem> {
        self.items.values_mut()
    }

    /// IDs of all items in insertion order.
    pub fn item_ids(&self) -> &[ItemId] {
        &self.order
    }

    /// Items front to back (descending z, insertion order among equals).
    pub fn items_by_depth(&self) -> Vec<&VisualItem> {
        let mut items: Vec<_> = self.items().collect();
        items.sort_by(|a, b| b.z().cmp(&a.z()));
        items
    }

    /// Find items at a point, front to back.
    pub fn items_at(&self, point: Point) -> Vec<ItemId> {
        self.items_by_depth()
            .into_iter()
            .filter(|item| item.hit_test(point))
            .map(VisualItem::id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selection.is_selected(id)
    }

    pub fn item_state(&self, id: ItemId) -> ItemState {
        self.selection.state(id)
    }

    /// Select or deselect an item. Unknown IDs are ignored.
    pub fn set_selected(&mut self, id: ItemId, selected: bool) {
        if !self.items.contains_key(&id) {
            return;
        }
        if selected {
            self.selection.add_to_selection(id);
        } else {
            self.selection.deselect(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    /// Selected items in insertion order.
    pub fn selected_items(&self) -> Vec<ItemId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| self.selection.is_selected(id))
            .collect()
    }

    /// Pointer press: select the topmost item under `point`.
    ///
    /// Without `extend` the previous selection is replaced; clicking empty
    /// canvas clears it.
    pub fn select_at(&mut self, point: Point, extend: bool) -> Option<ItemId> {
        let hit = self.items_at(point).first().copied();
        if !extend {
            self.clear_selection();
        }
        if let Some(id) = hit {
            self.selection.add_to_selection(id);
        }
        hit
    }

    /// Pointer move: update the hovered item.
    pub fn hover(&mut self, point: Point) -> Option<ItemId> {
        let hit = self.items_at(point).first().copied();
        self.selection.set_hovered(hit);
        hit
    }

    pub fn background_brush(&self) -> Option<&Brush> {
        self.background.as_ref()
    }

    pub fn set_background_brush(&mut self, brush: Brush) {
        self.background = Some(brush);
    }

    pub fn render_hints(&self) -> RenderHints {
        self.render_hints
    }

    pub fn set_render_hints(&mut self, hints: RenderHints) {
        self.render_hints = hints;
    }

    /// Drop or paste `data` at `position`.
    ///
    /// A drop onto an item targets that item. Otherwise pixel data wins
    /// over file URLs; non-local URLs are ignored and an unusable payload
    /// emits nothing.
    pub fn drop_data(&mut self, data: DropData, position: Point) {
        if data.is_empty() {
            log::debug!("ignoring empty drop at {:?}", position);
            return;
        }
        if let Some(&item) = self.items_at(position).first() {
            self.emit(StageEvent::DroppedOnItem { item, data });
            return;
        }
        if data.has_image() {
            let pixmaps = data.pixmaps().cloned().collect();
            self.emit(StageEvent::PixmapsDropped {
                pixmaps,
                center: position,
            });
        } else {
            self.emit(StageEvent::FilePathsDropped {
                paths: data.local_file_paths(),
                center: position,
            });
        }
    }

    /// Pointer drag of the selection by `delta`.
    pub fn drag_selection(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO || self.selection.selected().is_empty() {
            return;
        }
        self.emit(StageEvent::Translate {
            dx: delta.x,
            dy: delta.y,
        });
    }

    /// Arrow-key nudge of the selection.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.drag_selection(Vec2::new(dx, dy));
    }

    /// Mouse wheel over the canvas: changes distance, or rotation while the
    /// rotate modifier is held.
    pub fn wheel(&mut self, steps: i32, rotate: bool) {
        if steps == 0 {
            return;
        }
        if rotate {
            self.emit(StageEvent::Rotate(steps));
        } else {
            self.emit(StageEvent::AddDistance(steps));
        }
    }

    /// Take the oldest pending intent.
    pub fn pop_event(&mut self) -> Option<StageEvent> {
        self.events.pop_front()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    fn emit(&mut self, event: StageEvent) {
        self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PixmapModel, PlacedModel};
    use crate::reflection::Reflection;
    use url::Url;

    fn item_at(x: f64, y: f64, z: i32) -> VisualItem {
        let mut model: PlacedModel = PixmapModel::new(Pixmap::new(100, 100)).into();
        model.attributes_mut().position = Point::new(x, y);
        let mut item = VisualItem::new(&model, Rc::new(Reflection::new()));
        item.set_z(z);
        item
    }

    #[test]
    fn test_add_remove_items() {
        let mut stage = Stage::new();
        let id = stage.add_item(item_at(0.0, 0.0, 0));
        stage.set_selected(id, true);
        assert_eq!(stage.len(), 1);
        assert_eq!(stage.selected_items(), vec![id]);

        assert!(stage.remove_item(id).is_some());
        assert!(stage.is_empty());
        assert!(stage.selected_items().is_empty());
        assert!(stage.remove_item(id).is_none());
    }

    #[test]
    fn test_items_at_front_to_back() {
        let mut stage = Stage::new();
        let back = stage.add_item(item_at(0.0, 0.0, 0));
        let front = stage.add_item(item_at(50.0, 50.0, 1));

        assert_eq!(stage.items_at(Point::new(75.0, 75.0)), vec![front, back]);
        assert_eq!(stage.items_at(Point::new(25.0, 25.0)), vec![back]);
        assert!(stage.items_at(Point::new(500.0, 500.0)).is_empty());
    }

    #[test]
    fn test_select_at() {
        let mut stage = Stage::new();
        let a = stage.add_item(item_at(0.0, 0.0, 0));
        let b = stage.add_item(item_at(200.0, 0.0, 0));

        assert_eq!(stage.select_at(Point::new(10.0, 10.0), false), Some(a));
        assert_eq!(stage.select_at(Point::new(210.0, 10.0), true), Some(b));
        assert_eq!(stage.selected_items(), vec![a, b]);

        assert_eq!(stage.select_at(Point::new(500.0, 500.0), false), None);
        assert!(stage.selected_items().is_empty());
    }

    #[test]
    fn test_hover_and_item_state() {
        let mut stage = Stage::new();
        let a = stage.add_item(item_at(0.0, 0.0, 0));
        let b = stage.add_item(item_at(200.0, 0.0, 0));

        assert_eq!(stage.hover(Point::new(10.0, 10.0)), Some(a));
        assert_eq!(stage.item_state(a), ItemState::Hovered);

        stage.set_selected(b, true);
        assert_eq!(stage.hover(Point::new(210.0, 10.0)), Some(b));
        assert_eq!(stage.item_state(a), ItemState::Normal);
        assert_eq!(stage.item_state(b), ItemState::Selected);

        assert_eq!(stage.hover(Point::new(500.0, 500.0)), None);
        stage.remove_item(b);
        assert_eq!(stage.item_state(b), ItemState::Normal);
    }

    #[test]
    fn test_drop_on_empty_canvas() {
        let mut stage = Stage::new();
        stage.drop_data(DropData::from_paths(["/shots/a.png"]), Point::new(5.0, 5.0));
        match stage.pop_event() {
            Some(StageEvent::FilePathsDropped { paths, center }) => {
                assert_eq!(paths, vec![PathBuf::from("/shots/a.png")]);
                assert_eq!(center, Point::new(5.0, 5.0));
            }
            other => panic!("unexpected event {other:?}"),
        }

        let data = DropData {
            images: vec![Pixmap::new(3, 3)],
            urls: vec![Url::parse("file:///shots/a.png").unwrap()],
        };
        stage.drop_data(data, Point::ZERO);
        assert!(matches!(
            stage.pop_event(),
            Some(StageEvent::PixmapsDropped { pixmaps, .. }) if pixmaps.len() == 1
        ));
    }

    #[test]
    fn test_drop_on_item() {
        let mut stage = Stage::new();
        let id = stage.add_item(item_at(0.0, 0.0, 0));
        stage.drop_data(DropData::from_images(vec![Pixmap::new(3, 3)]), Point::new(50.0, 50.0));
        assert!(matches!(
            stage.pop_event(),
            Some(StageEvent::DroppedOnItem { item, .. }) if item == id
        ));
    }

    #[test]
    fn test_empty_drop_emits_nothing() {
        let mut stage = Stage::new();
        stage.drop_data(DropData::default(), Point::ZERO);
        stage.drop_data(
            DropData::from_urls(vec![Url::parse("https://example.com/a.png").unwrap()]),
            Point::ZERO,
        );
        assert!(!stage.has_pending_events());
    }

    #[test]
    fn test_gesture_intents() {
        let mut stage = Stage::new();
        let id = stage.add_item(item_at(0.0, 0.0, 0));

        // Nothing selected: dragging is a no-op
        stage.drag_selection(Vec2::new(3.0, 4.0));
        assert!(!stage.has_pending_events());

        stage.set_selected(id, true);
        stage.nudge(0.0, -1.0);
        stage.wheel(2, false);
        stage.wheel(-15, true);
        stage.wheel(0, true);

        assert!(matches!(stage.pop_event(), Some(StageEvent::Translate { dx, dy }) if dx == 0.0 && dy == -1.0));
        assert!(matches!(stage.pop_event(), Some(StageEvent::AddDistance(2))));
        assert!(matches!(stage.pop_event(), Some(StageEvent::Rotate(-15))));
        assert!(stage.pop_event().is_none());
    }
}
