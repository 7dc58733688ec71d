//! Discrete input messages delivered to the interaction controller.

use serde::{Deserialize, Serialize};
use shared::{MassParams, ObjectId};

use crate::adapter::ScreenPoint;
use crate::state::registry::Mass;

/// Top-level interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Picking selects and attaches the transform gizmo
    #[default]
    Workstation,
    /// Picking opens the blueprint view
    Inspector,
}

impl InteractionMode {
    pub fn label(&self) -> &'static str {
        match self {
            InteractionMode::Workstation => "Workstation",
            InteractionMode::Inspector => "Inspector",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(ScreenPoint),
    /// Gizmo grabbed by the user
    DragStart,
    /// Gizmo moved the selected mass to a new footprint position
    DragMove { x: f64, z: f64 },
    DragEnd,
    SetMode(InteractionMode),
    ToggleGhost,
    AddMass(MassParams),
    /// Click on a manifest row
    SelectFromManifest(ObjectId),
    CloseBlueprint,
    /// Generator answered with a layout payload
    LayoutGenerated(serde_json::Value),
}

/// What an event changed, for the view layer
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerOutput {
    None,
    Selected(ObjectId),
    Deselected,
    OpenBlueprint(Mass),
    BlueprintClosed,
    Added(Mass),
    LayoutReplaced(usize),
    GhostMode(bool),
    ModeChanged(InteractionMode),
    DragStarted(ObjectId),
    Moved { id: ObjectId, x: f64, z: f64 },
    DragEnded,
}
