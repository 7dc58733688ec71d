//! Read-only manifest view of the registry.

use serde::Serialize;
use shared::ObjectId;

use crate::event::InteractionMode;
use crate::state::registry::{Mass, MassRegistry};
use crate::state::selection::SelectionState;

/// Get shortened ID (first `len` characters)
pub fn short_id(id: &str, len: usize) -> &str {
    match id.char_indices().nth(len) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// One manifest row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub id: ObjectId,
    /// Reference shown under the program label
    pub reference: String,
    pub program: String,
    pub selected: bool,
}

impl ManifestEntry {
    fn new(mass: &Mass, selected: bool) -> Self {
        Self {
            id: mass.id.clone(),
            reference: short_id(&mass.id, 12).to_uppercase(),
            program: mass.program.clone(),
            selected,
        }
    }
}

/// Snapshot handed to the view layer after every mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
    pub selected: Option<ObjectId>,
    pub mode: InteractionMode,
    pub ghost_mode: bool,
}

impl Manifest {
    pub fn build(
        registry: &MassRegistry,
        selection: &SelectionState,
        mode: InteractionMode,
        ghost_mode: bool,
    ) -> Self {
        let selected = selection.current(registry).cloned();
        let entries = registry
            .all()
            .iter()
            .map(|m| ManifestEntry::new(m, selected.as_deref() == Some(m.id.as_str())))
            .collect();
        Self {
            entries,
            selected,
            mode,
            ghost_mode,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
