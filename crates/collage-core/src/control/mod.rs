//! Scene controller: keeps the stage in sync with the scene.
//!
//! [`SceneControl`] is the only writer of visual items. It turns user intents
//! into scene mutations, then drains the scene's notifications and mirrors
//! them onto the stage, so that every model has exactly one visual item.

mod quality;

pub use quality::{QualityTimer, RenderQuality};

use crate::clock::{Clock, Instant, SystemClock};
use crate::config::{ConfigError, ControlConfig};
use crate::loader::{FsImageLoader, ImageLoader};
use crate::model::{
    self, DefaultModel, FilePathModel, ItemAttributes, ModelId, ModelKind, ModelTrait, NewContent,
    Pixmap, PixmapModel, PlacedModel, TemplateModel, centered_at, is_null_pixmap, pixmap_size,
    recenter,
};
use crate::organizer::{TemplateOrdering, TemplateOrganizer};
use crate::paint;
use crate::reflection::Reflection;
use crate::scene::{Scene, SceneEvent};
use crate::stage::{Brush, DropData, ItemId, Stage, StageEvent, VisualItem};
use kurbo::Point;
use peniko::Color;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Synchronization core between a [`Scene`] and a [`Stage`].
///
/// Both are owned by the application shell and borrowed for the
/// controller's lifetime. Every public operation that mutates the scene
/// delivers the resulting notifications before it returns. The shell calls
/// [`SceneControl::pump`] from its event loop to process stage intents and
/// the quality restore timer.
pub struct SceneControl<'a, C: Clock = SystemClock> {
    scene: &'a mut Scene,
    stage: &'a mut Stage,
    reflection: Rc<Reflection>,
    defaults: DefaultModel,
    organizer: Box<dyn TemplateOrdering>,
    loader: Box<dyn ImageLoader>,
    config: ControlConfig,
    quality: RenderQuality,
    quality_timer: QualityTimer,
    clock: C,
    /// Built on first use, then shared by every checkerboard background.
    checkerboard: Option<Brush>,
    items: HashMap<ModelId, ItemId>,
    dispatching: bool,
}

impl<'a> SceneControl<'a> {
    /// Create a controller on the system clock that decodes images from
    /// the local filesystem.
    pub fn new(scene: &'a mut Scene, stage: &'a mut Stage) -> Self {
        Self::with_clock(scene, stage, SystemClock)
    }
}

impl<'a, C: Clock> SceneControl<'a, C> {
    /// Create a controller driven by `clock`.
    ///
    /// The stage is rebuilt from the scene's current contents.
    pub fn with_clock(scene: &'a mut Scene, stage: &'a mut Stage, clock: C) -> Self {
        let config = ControlConfig::default();
        let mut control = Self {
            scene,
            stage,
            reflection: Rc::new(Reflection::new()),
            defaults: DefaultModel::default(),
            organizer: Box::new(TemplateOrganizer::new()),
            loader: Box::new(FsImageLoader),
            quality: RenderQuality::High,
            quality_timer: QualityTimer::new(config.quality_delay()),
            config,
            clock,
            checkerboard: None,
            items: HashMap::new(),
            dispatching: false,
        };
        control.update_scene();
        control
    }

    /// Use `config` after validating it.
    pub fn with_config(mut self, config: ControlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.quality_timer.set_interval(config.quality_delay());
        self.config = config;
        Ok(self)
    }

    /// Replace the image decoder used for file paths.
    pub fn with_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Replace the policy that decides which template receives dropped content first.
    pub fn with_template_ordering(mut self, ordering: impl TemplateOrdering + 'static) -> Self {
        self.organizer = Box::new(ordering);
        self
    }

    pub fn with_default_model(mut self, defaults: DefaultModel) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn scene(&self) -> &Scene {
        &*self.scene
    }

    /// Direct scene access for the shell. Notifications caused through it
    /// are delivered on the next [`SceneControl::pump`].
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    pub fn stage(&self) -> &Stage {
        &*self.stage
    }

    /// Stage access for routing user input and selection changes.
    pub fn stage_mut(&mut self) -> &mut Stage {
        self.stage
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Attribute values given to newly created items.
    pub fn default_model(&self) -> &DefaultModel {
        &self.defaults
    }

    pub fn default_model_mut(&mut self) -> &mut DefaultModel {
        &mut self.defaults
    }

    pub fn render_quality(&self) -> RenderQuality {
        self.quality
    }

    /// When the pending quality restore is due, if one is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.quality_timer.deadline()
    }

    /// The visual item showing `model`.
    pub fn item_for(&self, model: ModelId) -> Option<ItemId> {
        self.items.get(&model).copied()
    }

    /// Rebuild every visual item and the background from the scene.
    pub fn update_scene(&mut self) {
        log::info!("rebuilding stage for {} models", self.scene.len());
        // The rebuild covers whatever these would have reported
        self.scene.discard_events();
        self.stage.clear();
        self.items.clear();

        self.handle_background_changed();
        let ids = self.scene.model_ids().to_vec();
        for id in ids {
            self.handle_model_added(id);
        }
    }

    /// Models behind the currently selected items, in stage order.
    pub fn selected_models(&self) -> Vec<ModelId> {
        self.stage
            .selected_items()
            .into_iter()
            .filter_map(|item| self.stage.item(item))
            .map(VisualItem::model)
            .collect()
    }

    /// Add a pixmap centered at `center`. Null pixmaps are ignored.
    pub fn add_image(&mut self, pixmap: Pixmap, center: Point) -> Option<ModelId> {
        self.add_images([pixmap], center).pop()
    }

    /// Add pixmaps, the first centered at `center` and each following one
    /// shifted by the cascade step.
    pub fn add_images(
        &mut self,
        pixmaps: impl IntoIterator<Item = Pixmap>,
        center: Point,
    ) -> Vec<ModelId> {
        let mut center = center;
        let mut added = Vec::new();
        for pixmap in pixmaps {
            if is_null_pixmap(&pixmap) {
                log::debug!("skipping null pixmap");
                continue;
            }
            added.push(self.place(PixmapModel::new(pixmap).into(), center));
            center += self.config.cascade_step;
        }
        added
    }

    /// Add the image at `path` centered at `center`. Unreadable files are skipped.
    pub fn add_image_path(&mut self, path: impl AsRef<Path>, center: Point) -> Option<ModelId> {
        self.add_image_paths([path], center).pop()
    }

    /// Add images from files, cascading like [`SceneControl::add_images`].
    pub fn add_image_paths<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
        center: Point,
    ) -> Vec<ModelId> {
        let mut center = center;
        let mut added = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let Some(image) = self.load_image(path) else {
                continue;
            };
            let model = FilePathModel::new(path, image, None);
            added.push(self.place(model.into(), center));
            center += self.config.cascade_step;
        }
        added
    }

    /// Add an empty template placeholder centered at `center`.
    pub fn add_template(&mut self, center: Point) -> ModelId {
        let template = TemplateModel::new(self.config.template_size);
        self.place(template.into(), center)
    }

    /// Remove every selected model.
    ///
    /// Quality drops to Low for the duration, even when nothing is selected.
    pub fn remove_all(&mut self) {
        self.degrade_quality();
        for id in self.selected_models() {
            self.scene.remove_model(id);
        }
        self.flush();
    }

    pub fn select_all(&mut self) {
        let ids = self.stage.item_ids().to_vec();
        for id in ids {
            self.stage.set_selected(id, true);
        }
    }

    /// Move the selection. Only diagonal moves degrade render quality.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if dx != 0.0 && dy != 0.0 {
            self.degrade_quality();
        }
        self.modify_selection(|attributes| attributes.translate(dx, dy));
    }

    pub fn set_rotation(&mut self, angle: i32) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.set_rotation(angle));
    }

    pub fn rotate(&mut self, angle: i32) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.rotate(angle));
    }

    pub fn set_distance(&mut self, distance: i32) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.set_distance(distance));
    }

    pub fn add_distance(&mut self, delta: i32) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.add_distance(delta));
    }

    pub fn set_reflection_enabled(&mut self, enabled: bool) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.set_reflection_enabled(enabled));
    }

    pub fn set_reflection_offset(&mut self, offset: i32) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.set_reflection_offset(offset));
    }

    pub fn add_reflection_offset(&mut self, delta: i32) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.add_reflection_offset(delta));
    }

    pub fn set_reflection_opacity(&mut self, opacity: i32) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.set_reflection_opacity(opacity));
    }

    pub fn add_reflection_opacity(&mut self, delta: i32) {
        self.degrade_quality();
        self.modify_selection(|attributes| attributes.add_reflection_opacity(delta));
    }

    pub fn set_background_enabled(&mut self, enabled: bool) {
        self.scene.set_background_enabled(enabled);
        self.flush();
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.scene.set_background_color(color);
        self.flush();
    }

    pub fn set_background_red(&mut self, red: u8) {
        let c = self.scene.background_color().to_rgba8();
        self.set_background_color(Color::from_rgba8(red, c.g, c.b, c.a));
    }

    pub fn set_background_green(&mut self, green: u8) {
        let c = self.scene.background_color().to_rgba8();
        self.set_background_color(Color::from_rgba8(c.r, green, c.b, c.a));
    }

    pub fn set_background_blue(&mut self, blue: u8) {
        let c = self.scene.background_color().to_rgba8();
        self.set_background_color(Color::from_rgba8(c.r, c.g, blue, c.a));
    }

    /// Put dropped or pasted content into `target`.
    ///
    /// Pixel data takes precedence over file URLs. Returns the model now
    /// holding the content, which differs from `target` when the model had
    /// to change variant.
    pub fn update_model(&mut self, data: DropData, target: ModelId) -> Option<ModelId> {
        let paths = data.local_file_paths();
        if let Some(pixmap) = data.images.into_iter().find(|p| !is_null_pixmap(p)) {
            return self.update_pixmap_model(pixmap, target);
        }
        match paths.first() {
            Some(path) => self.update_file_path_model(path, target),
            None => {
                log::debug!("nothing usable to put into model {}", target);
                None
            }
        }
    }

    /// Show `pixmap` in `target`, keeping the item's center in place.
    pub fn update_pixmap_model(&mut self, pixmap: Pixmap, target: ModelId) -> Option<ModelId> {
        if is_null_pixmap(&pixmap) {
            log::debug!("ignoring null pixmap for model {}", target);
            return None;
        }
        let kind = self.scene.model(target)?.kind();
        if kind != ModelKind::Pixmap {
            return self.replace_model(target, NewContent::Pixmap(pixmap));
        }

        let new_size = pixmap_size(&pixmap);
        self.scene.modify(target, |model| {
            if let PlacedModel::Pixmap(m) = model {
                let old_size = m.size();
                m.set_pixmap(pixmap);
                let attributes = m.attributes_mut();
                attributes.position = recenter(attributes.position, old_size, new_size);
            }
        });
        self.flush();
        Some(target)
    }

    /// Show the image at `path` in `target`, keeping the item's center in place.
    pub fn update_file_path_model(&mut self, path: &Path, target: ModelId) -> Option<ModelId> {
        let kind = self.scene.model(target)?.kind();
        let image = self.load_image(path)?;
        if kind != ModelKind::FilePath {
            let content = NewContent::FilePath {
                path: path.to_path_buf(),
                image,
            };
            return self.replace_model(target, content);
        }

        self.scene.modify(target, |model| {
            if let PlacedModel::FilePath(m) = model {
                let old_size = m.size();
                m.set_file_path(path, image);
                let new_size = m.size();
                let attributes = m.attributes_mut();
                attributes.position = recenter(attributes.position, old_size, new_size);
            }
        });
        self.flush();
        Some(target)
    }

    /// Process everything that is due: stage intents, scene notifications
    /// and the quality timer. Returns `true` if High quality was restored.
    pub fn pump(&mut self) -> bool {
        self.process_stage_events();
        self.flush();
        self.tick()
    }

    /// Fire the quality restore timer if its deadline has passed.
    pub fn tick(&mut self) -> bool {
        if !self.quality_timer.poll(self.clock.now()) {
            return false;
        }
        log::debug!("restoring high render quality");
        self.set_render_quality(RenderQuality::High);
        true
    }

    /// Act on the intents queued by the stage.
    pub fn process_stage_events(&mut self) {
        while let Some(event) = self.stage.pop_event() {
            match event {
                StageEvent::FilePathsDropped { paths, center } => {
                    self.handle_file_paths_dropped(paths, center)
                }
                StageEvent::PixmapsDropped { pixmaps, center } => {
                    self.handle_pixmaps_dropped(pixmaps, center)
                }
                StageEvent::DroppedOnItem { item, data } => {
                    match self.stage.item(item).map(VisualItem::model) {
                        Some(model) => {
                            self.update_model(data, model);
                        }
                        None => log::debug!("drop target {} is gone", item),
                    }
                }
                StageEvent::Translate { dx, dy } => self.translate(dx, dy),
                StageEvent::Rotate(angle) => self.rotate(angle),
                StageEvent::AddDistance(delta) => self.add_distance(delta),
            }
        }
    }

    fn place(&mut self, mut model: PlacedModel, center: Point) -> ModelId {
        let size = model.size();
        let attributes = model.attributes_mut();
        self.defaults.apply_to(attributes);
        attributes.position = centered_at(center, size);
        let id = self.scene.add_model(model);
        self.flush();
        id
    }

    fn load_image(&self, path: &Path) -> Option<Pixmap> {
        match self.loader.load(path) {
            Ok(image) if !is_null_pixmap(&image) => Some(image),
            Ok(_) => {
                log::warn!("skipping empty image {}", path.display());
                None
            }
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                None
            }
        }
    }

    fn modify_selection(&mut self, mut f: impl FnMut(&mut ItemAttributes)) {
        for id in self.selected_models() {
            self.scene.modify(id, |model| f(model.attributes_mut()));
        }
        self.flush();
    }

    /// Swap `target` for a model of another variant holding `content`.
    fn replace_model(&mut self, target: ModelId, content: NewContent) -> Option<ModelId> {
        let replacement = model::convert(self.scene.model(target)?, content);
        let id = replacement.id();
        log::debug!(
            "replacing model {} with {:?} model {}",
            target,
            replacement.kind(),
            id
        );
        self.scene.remove_model(target);
        self.scene.add_model(replacement);
        self.flush();
        Some(id)
    }

    fn degrade_quality(&mut self) {
        self.set_render_quality(RenderQuality::Low);
        self.quality_timer.start(self.clock.now());
    }

    fn set_render_quality(&mut self, quality: RenderQuality) {
        if self.quality == quality {
            return;
        }
        self.quality = quality;
        let mode = quality.transformation();
        for item in self.stage.items_mut() {
            item.set_transformation(mode);
        }
        self.stage.set_render_hints(quality.render_hints());
    }

    /// Deliver pending scene notifications.
    fn flush(&mut self) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;
        while let Some(event) = self.scene.pop_event() {
            log::debug!("dispatching {:?}", event);
            match event {
                SceneEvent::ModelAdded(id) => self.handle_model_added(id),
                SceneEvent::ModelRemoved(id) => self.handle_model_removed(id),
                SceneEvent::ModelChanged(id) => self.handle_model_changed(id),
                SceneEvent::DistanceChanged => self.handle_distance_changed(),
                SceneEvent::BackgroundChanged => self.handle_background_changed(),
            }
        }
        self.dispatching = false;

        debug_assert_eq!(
            self.items.len(),
            self.scene.len(),
            "visual items out of sync with models"
        );
        debug_assert_eq!(self.stage.len(), self.items.len(), "stage holds unmapped items");
    }

    fn handle_model_added(&mut self, id: ModelId) {
        let Some(model) = self.scene.model(id) else {
            log::debug!("model {} left before it was shown", id);
            return;
        };
        let mut item = VisualItem::new(model, Rc::clone(&self.reflection));
        item.set_transformation(self.quality.transformation());
        self.stage.clear_selection();
        let item_id = self.stage.add_item(item);
        self.stage.set_selected(item_id, true);
        self.items.insert(id, item_id);
        log::debug!("created item {} for model {}", item_id, id);

        self.handle_distance_changed();
    }

    fn handle_model_removed(&mut self, id: ModelId) {
        let Some(item_id) = self.items.remove(&id) else {
            panic!("no visual item for removed model {id}");
        };
        let removed = self.stage.remove_item(item_id);
        assert!(removed.is_some(), "visual item {item_id} missing from stage");
        log::debug!("removed item {} for model {}", item_id, id);
    }

    fn handle_model_changed(&mut self, id: ModelId) {
        let Some(model) = self.scene.model(id) else {
            return;
        };
        if let Some(item) = self.items.get(&id).and_then(|&item| self.stage.item_mut(item)) {
            item.sync_from(model);
        }
    }

    /// Reassign z: stable sort by descending distance, then 0, 1, 2, ...
    /// The largest distance gets the lowest z and paints behind the rest.
    fn handle_distance_changed(&mut self) {
        let scene = &*self.scene;
        let mut depths: Vec<(ItemId, i32)> = self
            .stage
            .items()
            .map(|item| {
                let distance = scene
                    .model(item.model())
                    .map_or(0, |m| m.attributes().distance());
                (item.id(), distance)
            })
            .collect();
        depths.sort_by(|a, b| b.1.cmp(&a.1));

        for (z, (item_id, _)) in depths.into_iter().enumerate() {
            if let Some(item) = self.stage.item_mut(item_id) {
                item.set_z(z as i32);
            }
        }
    }

    fn handle_background_changed(&mut self) {
        let brush = if self.scene.is_background_enabled() {
            Brush::Solid(self.scene.background_color())
        } else {
            self.checkerboard
                .get_or_insert_with(|| Brush::Pattern(Rc::new(paint::create_checker_pattern())))
                .clone()
        };
        self.stage.set_background_brush(brush);
    }

    fn handle_file_paths_dropped(&mut self, paths: Vec<PathBuf>, center: Point) {
        if !self.scene.has_templates() {
            self.add_image_paths(paths, center);
            return;
        }
        let templates = self.organizer.ordered_templates(&*self.scene);
        log_discarded(paths.len(), templates.len());
        for (template, path) in templates.into_iter().zip(paths) {
            self.update_file_path_model(&path, template);
        }
    }

    fn handle_pixmaps_dropped(&mut self, pixmaps: Vec<Pixmap>, center: Point) {
        if !self.scene.has_templates() {
            self.add_images(pixmaps, center);
            return;
        }
        let templates = self.organizer.ordered_templates(&*self.scene);
        log_discarded(pixmaps.len(), templates.len());
        for (template, pixmap) in templates.into_iter().zip(pixmaps) {
            self.update_pixmap_model(pixmap, template);
        }
    }
}

fn log_discarded(dropped: usize, templates: usize) {
    if dropped > templates {
        log::debug!(
            "{} dropped images exceed the templates, discarding",
            dropped - templates
        );
    }
}

impl<C: Clock> fmt::Debug for SceneControl<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneControl")
            .field("models", &self.scene.len())
            .field("items", &self.items.len())
            .field("quality", &self.quality)
            .field("quality_timer", &self.quality_timer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
