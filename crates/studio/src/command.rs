//! JSON command protocol for the headless studio shell.
//!
//! One command per line in, one [`CommandResponse`] per line out.

use serde::{Deserialize, Serialize};
use shared::MassParams;

use crate::event::{ControllerOutput, InputEvent, InteractionMode};
use crate::harness::HeadlessStudio;
use crate::state::generation::GenerationOutcome;

/// A command the shell can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum StudioCommand {
    /// Add a mass; missing fields take the defaults
    AddMass {
        #[serde(default)]
        params: MassParams,
    },
    /// Press the pointer at a screen point
    PointerDown { x: f32, y: f32 },
    /// Switch between workstation and inspector
    SetMode { mode: InteractionMode },
    ToggleGhost,
    /// Replace the scene with a layout payload
    IngestLayout { layout: serde_json::Value },
    /// Ask the generator service for a layout
    Generate { prompt: String },
    /// Apply a finished generation, if any
    Poll,
    /// Select a mass as if clicked in the manifest
    Select { id: String },
    ClearSelection,
    DragStart,
    DragMove { x: f64, z: f64 },
    DragEnd,
    CloseBlueprint,
    /// List the manifest
    Inspect,
    /// Blueprint of a mass (defaults to the open one or the selection)
    Blueprint {
        #[serde(default)]
        id: Option<String>,
    },
    ExportBlueprint {
        #[serde(default)]
        id: Option<String>,
    },
    /// Export all masses as JSON
    ExportScene,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn output_json(output: &ControllerOutput) -> serde_json::Value {
    match output {
        ControllerOutput::None => serde_json::json!({ "event": "none" }),
        ControllerOutput::Selected(id) => serde_json::json!({ "event": "selected", "id": id }),
        ControllerOutput::Deselected => serde_json::json!({ "event": "deselected" }),
        ControllerOutput::OpenBlueprint(mass) => {
            serde_json::json!({ "event": "open_blueprint", "mass": mass })
        }
        ControllerOutput::BlueprintClosed => serde_json::json!({ "event": "blueprint_closed" }),
        ControllerOutput::Added(mass) => serde_json::json!({ "event": "added", "mass": mass }),
        ControllerOutput::LayoutReplaced(count) => {
            serde_json::json!({ "event": "layout_replaced", "count": count })
        }
        ControllerOutput::GhostMode(on) => serde_json::json!({ "event": "ghost_mode", "on": on }),
        ControllerOutput::ModeChanged(mode) => {
            serde_json::json!({ "event": "mode_changed", "mode": mode })
        }
        ControllerOutput::DragStarted(id) => {
            serde_json::json!({ "event": "drag_started", "id": id })
        }
        ControllerOutput::Moved { id, x, z } => {
            serde_json::json!({ "event": "moved", "id": id, "x": x, "z": z })
        }
        ControllerOutput::DragEnded => serde_json::json!({ "event": "drag_ended" }),
    }
}

fn dispatch(studio: &mut HeadlessStudio, event: InputEvent) -> CommandResponse {
    match studio.dispatch(event) {
        Ok(output) => CommandResponse::ok_with_data(output_json(&output)),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

fn outcome_json(outcome: Option<GenerationOutcome>, busy: bool) -> CommandResponse {
    match outcome {
        Some(GenerationOutcome::Applied(count)) => {
            CommandResponse::ok_with_data(serde_json::json!({ "applied": count }))
        }
        Some(GenerationOutcome::Failed(reason)) => CommandResponse::err(reason),
        None => CommandResponse::ok_with_data(serde_json::json!({ "pending": busy })),
    }
}

/// Execute a single command on the studio.
pub fn execute_command(studio: &mut HeadlessStudio, cmd: StudioCommand) -> CommandResponse {
    match cmd {
        StudioCommand::AddMass { params } => dispatch(studio, InputEvent::AddMass(params)),

        StudioCommand::PointerDown { x, y } => {
            let output = studio.pointer_down(x, y);
            CommandResponse::ok_with_data(output_json(&output))
        }

        StudioCommand::SetMode { mode } => dispatch(studio, InputEvent::SetMode(mode)),

        StudioCommand::ToggleGhost => dispatch(studio, InputEvent::ToggleGhost),

        StudioCommand::IngestLayout { layout } => {
            let response = dispatch(studio, InputEvent::LayoutGenerated(layout));
            if let Some(error) = &response.error {
                studio.generation.raise_notice(error.clone());
            }
            response
        }

        StudioCommand::Generate { prompt } => match studio.generate(&prompt) {
            Ok(true) => CommandResponse::ok_with_data(serde_json::json!({ "pending": true })),
            Ok(false) => CommandResponse::err("Prompt is empty"),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        StudioCommand::Poll => {
            let outcome = studio.poll_generation();
            outcome_json(outcome, studio.generation.is_busy())
        }

        StudioCommand::Select { id } => dispatch(studio, InputEvent::SelectFromManifest(id)),

        StudioCommand::ClearSelection => {
            studio.controller.deselect();
            CommandResponse::ok()
        }

        StudioCommand::DragStart => dispatch(studio, InputEvent::DragStart),

        StudioCommand::DragMove { x, z } => dispatch(studio, InputEvent::DragMove { x, z }),

        StudioCommand::DragEnd => dispatch(studio, InputEvent::DragEnd),

        StudioCommand::CloseBlueprint => dispatch(studio, InputEvent::CloseBlueprint),

        StudioCommand::Inspect => {
            studio.expire_notice();
            let manifest = studio.manifest();
            CommandResponse::ok_with_data(serde_json::json!({
                "mass_count": manifest.len(),
                "manifest": manifest,
                "notice": studio.generation.notice().map(|n| n.message.clone()),
                "busy": studio.generation.is_busy(),
                "dragging": studio.controller.is_dragging(),
            }))
        }

        StudioCommand::Blueprint { id } => match studio.blueprint(id.as_deref()) {
            Some(bp) => CommandResponse::ok_with_data(serde_json::json!({
                "blueprint": bp,
                "svg": bp.to_svg(),
            })),
            None => CommandResponse::err("No mass to inspect"),
        },

        StudioCommand::ExportBlueprint { id } => match studio.export_blueprint(id.as_deref()) {
            Ok(path) => CommandResponse::ok_with_data(serde_json::json!({
                "path": path.display().to_string(),
            })),
            Err(e) => CommandResponse::err(e),
        },

        StudioCommand::ExportScene => {
            let json = studio.export_scene_json();
            CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(studio: &mut HeadlessStudio, json: &str) -> Result<CommandResponse, String> {
    let cmd: StudioCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(studio, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    studio: &mut HeadlessStudio,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<StudioCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(studio, cmd))
        .collect())
}
