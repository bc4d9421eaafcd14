//! Selection and hover bookkeeping for visual items.

use super::item::ItemId;
use std::collections::{HashMap, HashSet};

/// The UI state of a visual item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemState {
    /// Normal display state - no interaction.
    #[default]
    Normal,
    /// Pointer is hovering over the item.
    Hovered,
    /// Item is selected.
    Selected,
}

/// Tracks which items are selected or hovered.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    states: HashMap<ItemId, ItemState>,
    selected: HashSet<ItemId>,
    hovered: Option<ItemId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of an item.
    pub fn state(&self, id: ItemId) -> ItemState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    fn set_state(&mut self, id: ItemId, state: ItemState) {
        if state == ItemState::Selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
        self.states.insert(id, state);
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> &HashSet<ItemId> {
        &self.selected
    }

    pub fn hovered(&self) -> Option<ItemId> {
        self.hovered
    }

    /// Set the hovered item. Selected items keep their selected state.
    pub fn set_hovered(&mut self, id: Option<ItemId>) {
        if let Some(old_id) = self.hovered {
            if Some(old_id) != id && self.state(old_id) == ItemState::Hovered {
                self.states.insert(old_id, ItemState::Normal);
            }
        }
        if let Some(new_id) = id {
            if self.state(new_id) == ItemState::Normal {
                self.states.insert(new_id, ItemState::Hovered);
            }
        }
        self.hovered = id;
    }

    pub fn add_to_selection(&mut self, id: ItemId) {
        self.set_state(id, ItemState::Selected);
    }

    pub fn deselect(&mut self, id: ItemId) {
        if self.selected.contains(&id) {
            let state = if self.hovered == Some(id) {
                ItemState::Hovered
            } else {
                ItemState::Normal
            };
            self.set_state(id, state);
        }
    }

    pub fn clear_selection(&mut self) {
        let selected: Vec<_> = self.selected.iter().copied().collect();
        for id in selected {
            self.deselect(id);
        }
    }

    /// Forget a removed item.
    pub fn remove(&mut self, id: ItemId) {
        self.states.remove(&id);
        self.selected.remove(&id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }

    /// Forget every item.
    pub fn clear(&mut self) {
        self.states.clear();
        self.selected.clear();
        self.hovered = None;
    }
}
