//! Scene document: the placed-item models and scene-level attributes.

use crate::model::{ModelId, PlacedModel};
use kurbo::Rect;
use peniko::Color;
use std::collections::{HashMap, VecDeque};

/// Change notification emitted by the [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// A model was inserted.
    ModelAdded(ModelId),
    /// A model was removed; it is no longer reachable through the scene.
    ModelRemoved(ModelId),
    /// Attributes or content of a model changed.
    ModelChanged(ModelId),
    /// The distance of at least one model changed.
    DistanceChanged,
    /// Background flag or color changed.
    BackgroundChanged,
}

/// The scene document.
///
/// Holds the placed-item models plus the background settings. Every mutation
/// queues a [`SceneEvent`]; the single subscriber drains them in emission
/// order with [`Scene::pop_event`]. The scene knows nothing about visuals.
#[derive(Debug, Clone)]
pub struct Scene {
    models: HashMap<ModelId, PlacedModel>,
    /// Insertion order. Display order is derived from distance, not from this.
    order: Vec<ModelId>,
    background_enabled: bool,
    background_color: Color,
    events: VecDeque<SceneEvent>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene with the background disabled.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
            order: Vec::new(),
            background_enabled: false,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            events: VecDeque::new(),
        }
    }

    /// Add a model to the scene.
    ///
    /// A model whose ID is already present replaces the stored one and is
    /// reported as [`SceneEvent::ModelChanged`], not as an addition.
    pub fn add_model(&mut self, model: impl Into<PlacedModel>) -> ModelId {
        let model = model.into();
        let id = model.id();
        let distance = model.attributes().distance();
        match self.models.insert(id, model) {
            None => {
                self.order.push(id);
                self.emit(SceneEvent::ModelAdded(id));
            }
            Some(old) => {
                self.emit(SceneEvent::ModelChanged(id));
                if old.attributes().distance() != distance {
                    self.emit(SceneEvent::DistanceChanged);
                }
            }
        }
        id
    }

    /// Remove a model from the scene.
    ///
    /// If the model's addition has not been delivered yet, the pending
    /// notifications for it are dropped instead of emitting a removal.
    pub fn remove_model(&mut self, id: ModelId) -> Option<PlacedModel> {
        let model = self.models.remove(&id)?;
        self.order.retain(|&model_id| model_id != id);

        let pending_add = self.events.contains(&SceneEvent::ModelAdded(id));
        if pending_add {
            self.events.retain(|event| {
                !matches!(event, SceneEvent::ModelAdded(e) | SceneEvent::ModelChanged(e) if *e == id)
            });
        } else {
            self.emit(SceneEvent::ModelRemoved(id));
        }
        Some(model)
    }

    /// Apply `f` to a model's attributes or content.
    ///
    /// Emits [`SceneEvent::ModelChanged`], and [`SceneEvent::DistanceChanged`]
    /// when the distance moved. Returns `false` if no such model exists.
    ///
    /// # Panics
    ///
    /// Panics if `f` swaps the model for a different instance or variant;
    /// replacing a model goes through remove + add.
    pub fn modify<F>(&mut self, id: ModelId, f: F) -> bool
    where
        F: FnOnce(&mut PlacedModel),
    {
        let Some(model) = self.models.get_mut(&id) else {
            return false;
        };
        let kind = model.kind();
        let distance = model.attributes().distance();

        f(model);

        assert!(
            model.id() == id && model.kind() == kind,
            "model {id} changed identity inside Scene::modify"
        );
        let distance_changed = model.attributes().distance() != distance;

        self.emit(SceneEvent::ModelChanged(id));
        if distance_changed {
            self.emit(SceneEvent::DistanceChanged);
        }
        true
    }

    /// Get a model by ID.
    pub fn model(&self, id: ModelId) -> Option<&PlacedModel> {
        self.models.get(&id)
    }

    /// Whether a model with this ID is part of the scene.
    pub fn contains(&self, id: ModelId) -> bool {
        self.models.contains_key(&id)
    }

    /// Get models in insertion order.
    pub fn models(&self) -> impl Iterator<Item = &PlacedModel> {
        self.order.iter().filter_map(|id| self.models.get(id))
    }

    /// IDs of all models in insertion order.
    pub fn model_ids(&self) -> &[ModelId] {
        &self.order
    }

    /// Template placeholders in insertion order.
    pub fn templates(&self) -> impl Iterator<Item = &PlacedModel> {
        self.models().filter(|m| m.is_template())
    }

    /// Whether the scene holds at least one template placeholder.
    pub fn has_templates(&self) -> bool {
        self.models.values().any(PlacedModel::is_template)
    }

    /// Get the bounding box of all models.
    pub fn bounds(&self) -> Option<Rect> {
        self.models
            .values()
            .map(PlacedModel::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Get the number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_background_enabled(&self) -> bool {
        self.background_enabled
    }

    pub fn set_background_enabled(&mut self, enabled: bool) {
        if self.background_enabled != enabled {
            self.background_enabled = enabled;
            self.emit(SceneEvent::BackgroundChanged);
        }
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color) {
        if self.background_color.to_rgba8() != color.to_rgba8() {
            self.background_color = color;
            self.emit(SceneEvent::BackgroundChanged);
        }
    }

    /// Take the oldest pending notification.
    pub fn pop_event(&mut self) -> Option<SceneEvent> {
        self.events.pop_front()
    }

    /// Whether notifications are waiting to be delivered.
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Drop all pending notifications.
    pub fn discard_events(&mut self) {
        self.events.clear();
    }

    fn emit(&mut self, event: SceneEvent) {
        log::trace!("scene event {:?}", event);
        self.events.push_back(event);
    }
}
