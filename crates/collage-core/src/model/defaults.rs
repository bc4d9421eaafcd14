//! Default attribute values for newly created items.

use super::ItemAttributes;
use serde::{Deserialize, Serialize};

/// Prototype holding the "current default" attributes.
///
/// UI controls mutate it directly; the controller reads it whenever it
/// creates an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultModel {
    pub distance: i32,
    pub rotation: i32,
    pub reflection_enabled: bool,
    pub reflection_offset: i32,
    pub reflection_opacity: i32,
}

impl Default for DefaultModel {
    fn default() -> Self {
        Self {
            distance: 0,
            rotation: 0,
            reflection_enabled: true,
            reflection_offset: 25,
            reflection_opacity: 50,
        }
    }
}

impl DefaultModel {
    /// Copy the defaults onto `attributes`. Position is left untouched.
    pub fn apply_to(&self, attributes: &mut ItemAttributes) {
        attributes.set_distance(self.distance);
        attributes.set_rotation(self.rotation);
        attributes.set_reflection_enabled(self.reflection_enabled);
        attributes.set_reflection_offset(self.reflection_offset);
        attributes.set_reflection_opacity(self.reflection_opacity);
    }
}
