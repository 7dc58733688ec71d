use shared::ObjectId;

use super::registry::MassRegistry;

/// Single-object selection state
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<ObjectId>,
    /// Version counter for selection changes (for view invalidation)
    pub version: u64,
}

impl SelectionState {
    /// Raw selected id, which may be stale after a registry clear
    pub fn raw(&self) -> Option<&ObjectId> {
        self.selected.as_ref()
    }

    /// Selected id, treating an id missing from `registry` as no selection
    pub fn current<'a>(&'a self, registry: &MassRegistry) -> Option<&'a ObjectId> {
        self.selected.as_ref().filter(|id| registry.contains(id))
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Select a single object (replaces previous selection)
    pub fn select(&mut self, id: ObjectId) {
        if self.selected.as_ref() != Some(&id) {
            self.selected = Some(id);
            self.version += 1;
        }
    }

    /// Clear selection
    pub fn clear(&mut self) {
        if self.selected.take().is_some() {
            self.version += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}
