//! Collage Core Library
//!
//! Scene model, visual stage and the controller that keeps the two in sync
//! for the Collage screenshot composer.

pub mod clock;
pub mod config;
pub mod control;
pub mod fitter;
pub mod loader;
pub mod model;
pub mod organizer;
pub mod paint;
pub mod reflection;
pub mod scene;
pub mod stage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ControlConfig};
pub use control::{QualityTimer, RenderQuality, SceneControl};
pub use fitter::{FitMode, SizeFitter};
pub use loader::{FsImageLoader, ImageLoader, LoadError, MemoryImageLoader};
pub use model::{DefaultModel, ItemAttributes, ModelId, ModelKind, Pixmap, PlacedModel, convert};
pub use organizer::{TemplateOrdering, TemplateOrganizer};
pub use reflection::Reflection;
pub use scene::{Scene, SceneEvent};
pub use stage::{Brush, DropData, ItemId, RenderHints, Stage, StageEvent, VisualItem};
