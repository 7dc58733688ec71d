//! Headless studio: controller, headless scene and generation session
//! wired together without a window. Drives the command shell and the
//! integration tests.

use std::path::PathBuf;
use std::time::Duration;

use shared::{MassParams, ObjectId};

use crate::adapter::{HeadlessScene, ScreenPoint};
use crate::blueprint::Blueprint;
use crate::controller::InteractionController;
use crate::error::{GeneratorError, StudioError};
use crate::event::{ControllerOutput, InputEvent, InteractionMode};
use crate::generator::GeneratorClient;
use crate::manifest::Manifest;
use crate::state::generation::{GenerationOutcome, GenerationState};
use crate::state::registry::Mass;
use crate::state::settings::StudioSettings;

pub struct HeadlessStudio {
    pub controller: InteractionController<HeadlessScene>,
    pub generation: GenerationState,
    pub settings: StudioSettings,
    client: Option<GeneratorClient>,
    runtime: Option<tokio::runtime::Runtime>,
}

impl HeadlessStudio {
    /// Studio with default settings (no settings file is read).
    pub fn new() -> Self {
        Self::with_settings(StudioSettings::default())
    }

    pub fn with_settings(settings: StudioSettings) -> Self {
        let scene = HeadlessScene::with_ghost_opacity(settings.display.ghost_opacity);
        Self {
            controller: InteractionController::new(scene),
            generation: GenerationState::default(),
            settings,
            client: None,
            runtime: None,
        }
    }

    pub fn scene(&self) -> Option<&HeadlessScene> {
        self.controller.adapter()
    }

    // ── Scene manipulation ────────────────────────────────────

    pub fn dispatch(&mut self, event: InputEvent) -> Result<ControllerOutput, StudioError> {
        self.controller.dispatch(event)
    }

    /// Add a mass and return it
    pub fn add_mass(&mut self, params: MassParams) -> Result<Mass, StudioError> {
        self.controller.add_mass(params)
    }

    /// Add a box with explicit size at a footprint position, returning its id
    pub fn add_box(
        &mut self,
        w: f64,
        h: f64,
        d: f64,
        x: f64,
        z: f64,
    ) -> Result<ObjectId, StudioError> {
        self.add_mass(MassParams::with_size(w, h, d).at(x, z)).map(|m| m.id)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> ControllerOutput {
        self.controller.handle_pointer_down(ScreenPoint::new(x, y))
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.controller.set_mode(mode);
    }

    pub fn toggle_ghost(&mut self) -> bool {
        self.controller.toggle_ghost_mode()
    }

    /// Replace the scene from layout JSON text. A malformed payload raises a notice.
    pub fn ingest_layout_json(&mut self, json: &str) -> Result<usize, StudioError> {
        let result = serde_json::from_str::<serde_json::Value>(json)
            .map_err(|e| StudioError::MalformedLayout(format!("invalid JSON: {e}")))
            .and_then(|value| self.controller.ingest_generated_layout(&value));
        if let Err(e) = &result {
            tracing::warn!("{e}");
            self.generation.raise_notice(e.to_string());
        }
        result
    }

    // ── Generation ────────────────────────────────────────────

    /// Start a generation request. Returns `Ok(false)` for an empty prompt.
    pub fn generate(&mut self, prompt: &str) -> Result<bool, GeneratorError> {
        if self.generation.is_busy() {
            return Err(GeneratorError::Busy);
        }
        let client = match self.client.take() {
            Some(client) => client,
            None => GeneratorClient::new(&self.settings.generator)?,
        };
        let client = self.client.insert(client);
        let runtime = match self.runtime.take() {
            Some(runtime) => runtime,
            None => tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .map_err(GeneratorError::Runtime)?,
        };
        let runtime = self.runtime.insert(runtime);
        self.generation.submit(runtime.handle(), client, prompt)
    }

    /// Apply a finished generation without blocking
    pub fn poll_generation(&mut self) -> Option<GenerationOutcome> {
        self.generation.poll(&mut self.controller)
    }

    /// Block until the in-flight generation finishes (bounded by the
    /// configured request timeout).
    pub fn wait_generation(&mut self) -> Option<GenerationOutcome> {
        let timeout = Duration::from_secs(self.settings.generator.timeout_secs.max(1) + 1);
        self.generation.poll_blocking(&mut self.controller, timeout)
    }

    // ── Inspection ────────────────────────────────────────────

    /// Drop the notice once it has been up for `display.notice_secs`
    pub fn expire_notice(&mut self) {
        self.generation.expire_notice(self.settings.notice_ttl());
    }

    pub fn manifest(&self) -> Manifest {
        self.controller.snapshot()
    }

    pub fn mass_count(&self) -> usize {
        self.controller.registry().len()
    }

    pub fn visual_count(&self) -> usize {
        self.scene().map_or(0, HeadlessScene::len)
    }

    pub fn selected(&self) -> Option<&ObjectId> {
        self.controller.selected()
    }

    pub fn find(&self, id: &str) -> Option<&Mass> {
        self.controller.registry().find(id)
    }

    /// Blueprint for `id`, or for the open blueprint / selection when `None`
    pub fn blueprint(&self, id: Option<&str>) -> Option<Blueprint> {
        let registry = self.controller.registry();
        let mass = match id {
            Some(id) => registry.find(id),
            None => self
                .controller
                .open_blueprint()
                .or_else(|| self.selected().and_then(|id| registry.find(id))),
        }?;
        Some(Blueprint::of(mass))
    }

    /// Export a blueprint SVG into the configured directory
    pub fn export_blueprint(&mut self, id: Option<&str>) -> Result<PathBuf, String> {
        let blueprint = self
            .blueprint(id)
            .ok_or_else(|| "No mass to export".to_string())?;
        self.generation.raise_notice("Exporting...");
        blueprint
            .export_svg(&self.settings.export_dir())
            .map_err(|e| format!("Export failed: {e}"))
    }

    /// Current masses as pretty JSON
    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(self.controller.registry().all()).unwrap_or_default()
    }

    /// Every registered mass has exactly one live visual and vice versa
    pub fn is_consistent(&self) -> bool {
        let registry = self.controller.registry();
        let Some(scene) = self.scene() else {
            return registry.is_empty();
        };
        registry.len() == scene.len()
            && registry.all().iter().all(|m| {
                self.controller
                    .visual_of(&m.id)
                    .is_some_and(|h| scene.visual(h).is_some())
            })
    }
}

impl Default for HeadlessStudio {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_studio_empty() {
        let s = HeadlessStudio::new();
        assert_eq!(s.mass_count(), 0);
        assert!(s.is_consistent());
    }

    #[test]
    fn test_add_and_pick() {
        let mut s = HeadlessStudio::new();
        let id = s.add_box(20.0, 40.0, 20.0, 100.0, 100.0).unwrap();
        assert_eq!(s.pointer_down(100.0, 100.0), ControllerOutput::Selected(id.clone()));
        assert_eq!(s.selected(), Some(&id));
        assert!(s.is_consistent());
    }

    #[test]
    fn test_ingest_json_malformed_raises_notice() {
        let mut s = HeadlessStudio::new();
        s.add_mass(MassParams::default()).unwrap();
        assert!(s.ingest_layout_json(r#""not an array""#).is_err());
        assert_eq!(s.mass_count(), 1);
        assert!(s.generation.notice().is_some());
    }

    #[test]
    fn test_blueprint_falls_back_to_selection() {
        let mut s = HeadlessStudio::new();
        assert!(s.blueprint(None).is_none());
        let id = s.add_box(10.0, 10.0, 10.0, 0.0, 0.0).unwrap();
        s.pointer_down(0.0, 0.0);
        assert_eq!(s.blueprint(None).map(|b| b.id), Some(id));
    }

    #[test]
    fn test_export_scene_json() {
        let mut s = HeadlessStudio::new();
        s.add_mass(MassParams::default().program("Lobby")).unwrap();
        let json = s.export_scene_json();
        assert!(json.contains("Lobby"));
    }
}
