//! Interaction controller.
//!
//! Owns the mass registry, the id ↔ visual index and the scene adapter, and
//! is the only place any of them is mutated. Every mutation that touches
//! the registry is mirrored onto the adapter in the same call, so at each
//! observation point every mass has exactly one visual and vice versa.

use serde_json::Value;
use shared::{MassParams, ObjectId};

use crate::adapter::{SceneAdapter, ScreenPoint, VisualHandle};
use crate::error::StudioError;
use crate::event::{ControllerOutput, InputEvent, InteractionMode};
use crate::layout::parse_layout;
use crate::manifest::Manifest;
use crate::state::registry::{Mass, MassRegistry};
use crate::state::selection::SelectionState;
use crate::state::visual_index::VisualIndex;

pub struct InteractionController<A: SceneAdapter> {
    adapter: Option<A>,
    registry: MassRegistry,
    visuals: VisualIndex,
    selection: SelectionState,
    mode: InteractionMode,
    ghost_mode: bool,
    /// Gizmo drag in progress
    dragging: bool,
    /// Mass shown in the blueprint view
    blueprint: Option<ObjectId>,
}

impl<A: SceneAdapter> InteractionController<A> {
    pub fn new(adapter: A) -> Self {
        let mut controller = Self::detached();
        controller.adapter = Some(adapter);
        controller
    }

    /// Controller with no adapter yet; scene operations are no-ops until
    /// [`attach_adapter`](Self::attach_adapter) is called.
    pub fn detached() -> Self {
        Self {
            adapter: None,
            registry: MassRegistry::default(),
            visuals: VisualIndex::default(),
            selection: SelectionState::default(),
            mode: InteractionMode::default(),
            ghost_mode: false,
            dragging: false,
            blueprint: None,
        }
    }

    /// Install the adapter and create visuals for masses it has not seen.
    pub fn attach_adapter(&mut self, adapter: A) {
        self.adapter = Some(adapter);
        self.visuals.drain();
        let masses = self.registry.all().to_vec();
        for mass in &masses {
            self.create_visual(mass);
        }
    }

    // ── Read access ──────────────────────────────────────────

    pub fn adapter(&self) -> Option<&A> {
        self.adapter.as_ref()
    }

    pub fn registry(&self) -> &MassRegistry {
        &self.registry
    }

    /// Selected mass id; a stale id reads as no selection
    pub fn selected(&self) -> Option<&ObjectId> {
        self.selection.current(&self.registry)
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn ghost_mode(&self) -> bool {
        self.ghost_mode
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Mass currently open in the blueprint view
    pub fn open_blueprint(&self) -> Option<&Mass> {
        self.blueprint.as_deref().and_then(|id| self.registry.find(id))
    }

    pub fn visual_of(&self, id: &str) -> Option<VisualHandle> {
        self.visuals.handle_of(id)
    }

    pub fn snapshot(&self) -> Manifest {
        Manifest::build(&self.registry, &self.selection, self.mode, self.ghost_mode)
    }

    // ── Operations ───────────────────────────────────────────

    pub fn dispatch(&mut self, event: InputEvent) -> Result<ControllerOutput, StudioError> {
        match event {
            InputEvent::PointerDown(point) => Ok(self.handle_pointer_down(point)),
            InputEvent::DragStart => Ok(self
                .begin_drag()
                .map_or(ControllerOutput::None, ControllerOutput::DragStarted)),
            InputEvent::DragMove { x, z } => Ok(self.drag_to(x, z)),
            InputEvent::DragEnd => Ok(if self.end_drag() {
                ControllerOutput::DragEnded
            } else {
                ControllerOutput::None
            }),
            InputEvent::SetMode(mode) => {
                self.set_mode(mode);
                Ok(ControllerOutput::ModeChanged(mode))
            }
            InputEvent::ToggleGhost => Ok(ControllerOutput::GhostMode(self.toggle_ghost_mode())),
            InputEvent::AddMass(params) => self.add_mass(params).map(ControllerOutput::Added),
            InputEvent::SelectFromManifest(id) => self.select(&id),
            InputEvent::CloseBlueprint => Ok(if self.close_blueprint() {
                ControllerOutput::BlueprintClosed
            } else {
                ControllerOutput::None
            }),
            InputEvent::LayoutGenerated(layout) => self
                .ingest_generated_layout(&layout)
                .map(ControllerOutput::LayoutReplaced),
        }
    }

    /// Add one mass with its visual.
    pub fn add_mass(&mut self, params: MassParams) -> Result<Mass, StudioError> {
        if self.adapter.is_none() {
            tracing::debug!("add_mass ignored: adapter not ready");
            return Err(StudioError::AdapterUnavailable);
        }
        let mass = self.registry.add(params);
        self.create_visual(&mass);
        tracing::debug!(id = %mass.id, program = %mass.program, "mass added");
        Ok(mass)
    }

    /// Resolve a pointer press against registered visuals.
    pub fn handle_pointer_down(&mut self, point: ScreenPoint) -> ControllerOutput {
        if self.dragging {
            return ControllerOutput::None;
        }
        let Some(adapter) = self.adapter.as_ref() else {
            tracing::debug!("pointer ignored: adapter not ready");
            return ControllerOutput::None;
        };

        let candidates = self.visuals.handles();
        let Some(handle) = adapter.pick_topmost(point, &candidates) else {
            self.deselect();
            return ControllerOutput::Deselected;
        };

        let Some(id) = self.visuals.id_of(handle).cloned() else {
            tracing::warn!("{}", StudioError::LookupMiss(handle.to_string()));
            return ControllerOutput::None;
        };
        let Some(mass) = self.registry.find(&id).cloned() else {
            tracing::warn!("{}", StudioError::LookupMiss(id));
            return ControllerOutput::None;
        };

        self.selection.select(id.clone());
        match self.mode {
            InteractionMode::Inspector => {
                self.blueprint = Some(id);
                ControllerOutput::OpenBlueprint(mass)
            }
            InteractionMode::Workstation => {
                if let Some(adapter) = self.adapter.as_mut() {
                    adapter.attach_gizmo(handle);
                }
                ControllerOutput::Selected(id)
            }
        }
    }

    /// Select from the manifest list. Inspector mode opens the blueprint.
    pub fn select(&mut self, id: &str) -> Result<ControllerOutput, StudioError> {
        let mass = self
            .registry
            .find(id)
            .cloned()
            .ok_or_else(|| StudioError::LookupMiss(id.to_string()))?;

        self.selection.select(mass.id.clone());
        match self.mode {
            InteractionMode::Inspector => {
                self.blueprint = Some(mass.id.clone());
                Ok(ControllerOutput::OpenBlueprint(mass))
            }
            InteractionMode::Workstation => {
                if let (Some(adapter), Some(handle)) =
                    (self.adapter.as_mut(), self.visuals.handle_of(&mass.id))
                {
                    adapter.attach_gizmo(handle);
                }
                Ok(ControllerOutput::Selected(mass.id))
            }
        }
    }

    /// Clear selection and detach the gizmo
    pub fn deselect(&mut self) {
        self.selection.clear();
        self.dragging = false;
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.detach_gizmo();
        }
    }

    /// Replace the whole scene with a generated layout.
    ///
    /// The payload is validated in full first; on error nothing changes.
    pub fn ingest_generated_layout(&mut self, layout: &Value) -> Result<usize, StudioError> {
        let entries = parse_layout(layout)?;
        if self.adapter.is_none() {
            return Err(StudioError::AdapterUnavailable);
        }

        self.deselect();
        self.blueprint = None;
        self.clear_scene();

        for params in entries {
            let mass = self.registry.add(params);
            self.create_visual(&mass);
        }
        tracing::info!(count = self.registry.len(), "generated layout ingested");
        Ok(self.registry.len())
    }

    /// Flip ghost mode and re-apply transparency to every existing visual.
    pub fn toggle_ghost_mode(&mut self) -> bool {
        self.ghost_mode = !self.ghost_mode;
        let ghost = self.ghost_mode;
        if let Some(adapter) = self.adapter.as_mut() {
            for handle in self.visuals.handles() {
                adapter.set_transparency(handle, ghost);
            }
        }
        tracing::debug!(ghost, "ghost mode toggled");
        ghost
    }

    /// Switch between workstation and inspector.
    ///
    /// Entering the inspector detaches the gizmo; entering the workstation
    /// closes the blueprint view.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.dragging = false;
        match mode {
            InteractionMode::Inspector => {
                if let Some(adapter) = self.adapter.as_mut() {
                    adapter.detach_gizmo();
                }
            }
            InteractionMode::Workstation => {
                self.blueprint = None;
            }
        }
        tracing::debug!(mode = mode.label(), "mode changed");
    }

    pub fn close_blueprint(&mut self) -> bool {
        self.blueprint.take().is_some()
    }

    /// Start a gizmo drag on the selected mass. Returns its id if a drag began.
    pub fn begin_drag(&mut self) -> Option<ObjectId> {
        if self.mode != InteractionMode::Workstation || self.adapter.is_none() {
            return None;
        }
        let id = self.selected()?.clone();
        self.dragging = true;
        Some(id)
    }

    /// Move the dragged mass's footprint; the visual follows.
    pub fn drag_to(&mut self, x: f64, z: f64) -> ControllerOutput {
        if !self.dragging || !(x.is_finite() && z.is_finite()) {
            return ControllerOutput::None;
        }
        let Some(id) = self.selected().cloned() else {
            self.dragging = false;
            return ControllerOutput::None;
        };
        if !self.registry.set_position(&id, x, z) {
            return ControllerOutput::None;
        }

        let elevation = self.registry.find(&id).map_or(0.0, Mass::elevation);
        let handle = self.visuals.handle_of(&id);
        if let (Some(adapter), Some(handle)) = (self.adapter.as_mut(), handle) {
            adapter.move_visual(handle, x, elevation, z);
        }
        ControllerOutput::Moved { id, x, z }
    }

    /// Finish the drag. Returns false if no drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        std::mem::replace(&mut self.dragging, false)
    }

    // ── Internals ────────────────────────────────────────────

    fn create_visual(&mut self, mass: &Mass) {
        let ghost = self.ghost_mode;
        if let Some(adapter) = self.adapter.as_mut() {
            let handle = adapter.create_visual(mass);
            adapter.set_transparency(handle, ghost);
            self.visuals.insert(mass.id.clone(), handle);
        }
    }

    /// Remove every visual and empty the registry
    fn clear_scene(&mut self) {
        let handles = self.visuals.drain();
        if let Some(adapter) = self.adapter.as_mut() {
            for handle in handles {
                adapter.remove_visual(handle);
            }
        }
        self.registry.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::HeadlessScene;
    use serde_json::json;

    fn controller() -> InteractionController<HeadlessScene> {
        InteractionController::new(HeadlessScene::new())
    }

    fn scene(c: &InteractionController<HeadlessScene>) -> &HeadlessScene {
        c.adapter().unwrap()
    }

    #[test]
    fn test_add_creates_paired_visual() {
        let mut c = controller();
        let mass = c.add_mass(MassParams::default()).unwrap();
        let handle = c.visual_of(&mass.id).unwrap();
        assert!(scene(&c).visual(handle).is_some());
        assert_eq!(scene(&c).len(), 1);
    }

    #[test]
    fn test_pick_selects_and_attaches_gizmo() {
        let mut c = controller();
        let mass = c.add_mass(MassParams::default()).unwrap();
        let out = c.handle_pointer_down(ScreenPoint::new(0.0, 0.0));
        assert_eq!(out, ControllerOutput::Selected(mass.id.clone()));
        assert_eq!(c.selected(), Some(&mass.id));
        assert_eq!(scene(&c).gizmo_target(), c.visual_of(&mass.id));
    }

    #[test]
    fn test_pick_empty_space_clears_selection() {
        let mut c = controller();
        c.add_mass(MassParams::default()).unwrap();
        c.handle_pointer_down(ScreenPoint::new(0.0, 0.0));

        let out = c.handle_pointer_down(ScreenPoint::new(500.0, 500.0));
        assert_eq!(out, ControllerOutput::Deselected);
        assert!(c.selected().is_none());
        assert!(scene(&c).gizmo_target().is_none());
    }

    #[test]
    fn test_inspector_pick_opens_blueprint_without_gizmo() {
        let mut c = controller();
        let mass = c.add_mass(MassParams::default().program("Lobby")).unwrap();
        c.set_mode(InteractionMode::Inspector);

        let out = c.handle_pointer_down(ScreenPoint::new(1.0, 1.0));
        assert_eq!(out, ControllerOutput::OpenBlueprint(mass.clone()));
        assert_eq!(c.open_blueprint().map(|m| m.id.as_str()), Some(mass.id.as_str()));
        assert!(scene(&c).gizmo_target().is_none());
    }

    #[test]
    fn test_pick_ignored_while_dragging() {
        let mut c = controller();
        let mass = c.add_mass(MassParams::default()).unwrap();
        c.handle_pointer_down(ScreenPoint::new(0.0, 0.0));
        assert_eq!(c.begin_drag(), Some(mass.id.clone()));

        let out = c.handle_pointer_down(ScreenPoint::new(900.0, 900.0));
        assert_eq!(out, ControllerOutput::None);
        assert_eq!(c.selected(), Some(&mass.id));

        assert!(c.end_drag());
        assert_eq!(
            c.handle_pointer_down(ScreenPoint::new(900.0, 900.0)),
            ControllerOutput::Deselected
        );
    }

    #[test]
    fn test_drag_updates_registry_and_visual() {
        let mut c = controller();
        let mass = c.add_mass(MassParams::with_size(10.0, 40.0, 10.0)).unwrap();
        c.handle_pointer_down(ScreenPoint::new(0.0, 0.0));
        c.begin_drag().unwrap();

        let out = c.drag_to(100.0, -50.0);
        assert_eq!(out, ControllerOutput::Moved { id: mass.id.clone(), x: 100.0, z: -50.0 });
        c.end_drag();

        let moved = c.registry().find(&mass.id).unwrap();
        assert_eq!((moved.x, moved.z), (100.0, -50.0));
        let handle = c.visual_of(&mass.id).unwrap();
        let center = scene(&c).visual(handle).unwrap().bounds.center();
        assert_eq!(center, glam::Vec3::new(100.0, 20.0, -50.0));
    }

    #[test]
    fn test_drag_without_selection_does_nothing() {
        let mut c = controller();
        c.add_mass(MassParams::default()).unwrap();
        assert!(c.begin_drag().is_none());
        assert_eq!(c.drag_to(5.0, 5.0), ControllerOutput::None);
        assert!(!c.end_drag());
    }

    #[test]
    fn test_ingest_replaces_scene() {
        let mut c = controller();
        for _ in 0..3 {
            c.add_mass(MassParams::default()).unwrap();
        }
        let n = c
            .ingest_generated_layout(&json!([
                { "w": 80, "d": 40, "program": "Lobby" },
                { "w": 60, "d": 60, "program": "Tower" }
            ]))
            .unwrap();
        assert_eq!(n, 2);
        let programs: Vec<_> = c.registry().all().iter().map(|m| m.program.as_str()).collect();
        assert_eq!(programs, ["Lobby", "Tower"]);
        assert_eq!(scene(&c).len(), 2);
    }

    #[test]
    fn test_malformed_layout_leaves_scene_untouched() {
        let mut c = controller();
        let kept = c.add_mass(MassParams::default()).unwrap();
        c.handle_pointer_down(ScreenPoint::new(0.0, 0.0));

        let err = c
            .ingest_generated_layout(&json!([{ "w": 10, "d": 10 }, { "program": "Broken" }]))
            .unwrap_err();
        assert!(matches!(err, StudioError::MalformedLayout(_)));
        assert_eq!(c.registry().len(), 1);
        assert!(c.registry().find(&kept.id).is_some());
        assert_eq!(c.selected(), Some(&kept.id));
        assert_eq!(scene(&c).len(), 1);
    }

    #[test]
    fn test_ingest_clears_selection_and_gizmo() {
        let mut c = controller();
        c.add_mass(MassParams::default()).unwrap();
        c.handle_pointer_down(ScreenPoint::new(0.0, 0.0));
        c.ingest_generated_layout(&json!([{ "w": 10, "d": 10 }])).unwrap();
        assert!(c.selected().is_none());
        assert!(scene(&c).gizmo_target().is_none());
    }

    #[test]
    fn test_ghost_toggle_retouches_existing_visuals() {
        let mut c = controller();
        let a = c.add_mass(MassParams::default()).unwrap();
        let b = c.add_mass(MassParams::default().at(200.0, 0.0)).unwrap();

        assert!(c.toggle_ghost_mode());
        for id in [&a.id, &b.id] {
            assert_eq!(scene(&c).is_ghost(c.visual_of(id).unwrap()), Some(true));
        }

        let late = c.add_mass(MassParams::default()).unwrap();
        assert_eq!(scene(&c).is_ghost(c.visual_of(&late.id).unwrap()), Some(true));

        assert!(!c.toggle_ghost_mode());
        for id in [&a.id, &b.id, &late.id] {
            assert_eq!(scene(&c).is_ghost(c.visual_of(id).unwrap()), Some(false));
        }
    }

    #[test]
    fn test_detached_controller_is_inert() {
        let mut c: InteractionController<HeadlessScene> = InteractionController::detached();
        assert_eq!(c.add_mass(MassParams::default()), Err(StudioError::AdapterUnavailable));
        assert_eq!(c.handle_pointer_down(ScreenPoint::new(0.0, 0.0)), ControllerOutput::None);
        assert_eq!(
            c.ingest_generated_layout(&json!([{ "w": 1, "d": 1 }])),
            Err(StudioError::AdapterUnavailable)
        );
        assert!(c.registry().is_empty());

        c.attach_adapter(HeadlessScene::new());
        assert!(c.add_mass(MassParams::default()).is_ok());
    }

    /// Adapter whose picks always land on a handle it never handed out.
    #[derive(Default)]
    struct StrayPickScene {
        next: u64,
        gizmo: Option<VisualHandle>,
    }

    impl SceneAdapter for StrayPickScene {
        fn create_visual(&mut self, _mass: &Mass) -> VisualHandle {
            self.next += 1;
            VisualHandle(self.next)
        }
        fn remove_visual(&mut self, _handle: VisualHandle) {}
        fn move_visual(&mut self, _handle: VisualHandle, _x: f64, _y: f64, _z: f64) {}
        fn pick_topmost(&self, _point: ScreenPoint, _: &[VisualHandle]) -> Option<VisualHandle> {
            Some(VisualHandle(999))
        }
        fn attach_gizmo(&mut self, handle: VisualHandle) {
            self.gizmo = Some(handle);
        }
        fn detach_gizmo(&mut self) {
            self.gizmo = None;
        }
        fn set_transparency(&mut self, _handle: VisualHandle, _ghost: bool) {}
    }

    #[test]
    fn test_pick_of_unindexed_handle_is_ignored() {
        let mut c = InteractionController::new(StrayPickScene::default());
        let mass = c.add_mass(MassParams::default()).unwrap();
        c.select(&mass.id).unwrap();
        let gizmo = c.adapter().unwrap().gizmo;
        assert_eq!(gizmo, c.visual_of(&mass.id));

        let out = c.handle_pointer_down(ScreenPoint::new(0.0, 0.0));
        assert_eq!(out, ControllerOutput::None);
        assert_eq!(c.selected(), Some(&mass.id));
        assert_eq!(c.adapter().unwrap().gizmo, gizmo);
        assert_eq!(c.registry().len(), 1);
    }

    #[test]
    fn test_manifest_select_unknown_id() {
        let mut c = controller();
        assert_eq!(c.select("ghost"), Err(StudioError::LookupMiss("ghost".into())));
    }

    #[test]
    fn test_workstation_closes_blueprint() {
        let mut c = controller();
        let mass = c.add_mass(MassParams::default()).unwrap();
        c.set_mode(InteractionMode::Inspector);
        c.select(&mass.id).unwrap();
        assert!(c.open_blueprint().is_some());
        c.set_mode(InteractionMode::Workstation);
        assert!(c.open_blueprint().is_none());
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut c = controller();
        let out = c.dispatch(InputEvent::AddMass(MassParams::default())).unwrap();
        assert!(matches!(out, ControllerOutput::Added(_)));
        assert_eq!(
            c.dispatch(InputEvent::ToggleGhost).unwrap(),
            ControllerOutput::GhostMode(true)
        );
        assert_eq!(
            c.dispatch(InputEvent::SetMode(InteractionMode::Inspector)).unwrap(),
            ControllerOutput::ModeChanged(InteractionMode::Inspector)
        );
        assert!(c.dispatch(InputEvent::LayoutGenerated(json!("not an array"))).is_err());
        assert_eq!(c.registry().len(), 1);
    }
}
