//! Bidirectional mass id ↔ visual handle index.

use std::collections::HashMap;

use shared::ObjectId;

use crate::adapter::VisualHandle;

#[derive(Debug, Default)]
pub struct VisualIndex {
    by_id: HashMap<ObjectId, VisualHandle>,
    by_handle: HashMap<VisualHandle, ObjectId>,
}

impl VisualIndex {
    pub fn insert(&mut self, id: ObjectId, handle: VisualHandle) {
        if let Some(old) = self.by_id.insert(id.clone(), handle) {
            self.by_handle.remove(&old);
        }
        if let Some(old_id) = self.by_handle.insert(handle, id) {
            self.by_id.remove(&old_id);
        }
    }

    pub fn handle_of(&self, id: &str) -> Option<VisualHandle> {
        self.by_id.get(id).copied()
    }

    pub fn id_of(&self, handle: VisualHandle) -> Option<&ObjectId> {
        self.by_handle.get(&handle)
    }

    /// All registered handles, for pick candidate lists
    pub fn handles(&self) -> Vec<VisualHandle> {
        let mut handles: Vec<_> = self.by_handle.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Empty the index, returning every handle it held
    pub fn drain(&mut self) -> Vec<VisualHandle> {
        self.by_id.clear();
        let mut handles: Vec<_> = self.by_handle.drain().map(|(h, _)| h).collect();
        handles.sort();
        handles
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
