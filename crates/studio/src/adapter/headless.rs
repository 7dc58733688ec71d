//! In-process scene adapter with no renderer attached.
//!
//! Keeps one bounding box per visual and records transparency and gizmo
//! state so callers (the command shell, tests) can observe what a real
//! viewport would show. Screen points are read as a plan view: screen `x`
//! is world `x`, screen `y` is world `z`.

use std::collections::BTreeMap;

use glam::Vec3;

use super::picking::{pick_nearest, Aabb, Ray};
use super::{SceneAdapter, ScreenPoint, VisualHandle};
use crate::state::registry::Mass;

const SOLID_OPACITY: f32 = 1.0;
pub const DEFAULT_GHOST_OPACITY: f32 = 0.2;
const PICK_RAY_HEIGHT: f32 = 1.0e5;

/// A box visual as the headless scene sees it
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessVisual {
    pub bounds: Aabb,
    pub ghost: bool,
    pub opacity: f32,
}

pub struct HeadlessScene {
    visuals: BTreeMap<VisualHandle, HeadlessVisual>,
    next_handle: u64,
    gizmo: Option<VisualHandle>,
    ghost_opacity: f32,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::with_ghost_opacity(DEFAULT_GHOST_OPACITY)
    }

    pub fn with_ghost_opacity(ghost_opacity: f32) -> Self {
        Self {
            visuals: BTreeMap::new(),
            next_handle: 1,
            gizmo: None,
            ghost_opacity: ghost_opacity.clamp(0.0, 1.0),
        }
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&HeadlessVisual> {
        self.visuals.get(&handle)
    }

    pub fn handles(&self) -> impl Iterator<Item = VisualHandle> + '_ {
        self.visuals.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Visual the transform gizmo is currently attached to
    pub fn gizmo_target(&self) -> Option<VisualHandle> {
        self.gizmo
    }

    pub fn is_ghost(&self, handle: VisualHandle) -> Option<bool> {
        self.visuals.get(&handle).map(|v| v.ghost)
    }

    pub fn opacity(&self, handle: VisualHandle) -> Option<f32> {
        self.visuals.get(&handle).map(|v| v.opacity)
    }
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneAdapter for HeadlessScene {
    fn create_visual(&mut self, mass: &Mass) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;

        let center = mass.center();
        let bounds = Aabb::from_center_size(
            Vec3::new(center[0] as f32, center[1] as f32, center[2] as f32),
            Vec3::new(mass.width as f32, mass.height as f32, mass.depth as f32),
        );
        self.visuals.insert(
            handle,
            HeadlessVisual {
                bounds,
                ghost: false,
                opacity: SOLID_OPACITY,
            },
        );
        tracing::trace!(%handle, id = %mass.id, "visual created");
        handle
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_none() {
            tracing::debug!(%handle, "remove of unknown visual");
        }
        if self.gizmo == Some(handle) {
            self.gizmo = None;
        }
    }

    fn move_visual(&mut self, handle: VisualHandle, x: f64, y: f64, z: f64) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            let size = visual.bounds.size();
            visual.bounds = Aabb::from_center_size(Vec3::new(x as f32, y as f32, z as f32), size);
        }
    }

    fn pick_topmost(
        &self,
        point: ScreenPoint,
        candidates: &[VisualHandle],
    ) -> Option<VisualHandle> {
        let ray = Ray::downward(point.x, point.y, PICK_RAY_HEIGHT);
        pick_nearest(
            &ray,
            candidates
                .iter()
                .filter_map(|h| self.visuals.get(h).map(|v| (*h, &v.bounds))),
        )
    }

    fn attach_gizmo(&mut self, handle: VisualHandle) {
        if self.visuals.contains_key(&handle) {
            self.gizmo = Some(handle);
        }
    }

    fn detach_gizmo(&mut self) {
        self.gizmo = None;
    }

    fn set_transparency(&mut self, handle: VisualHandle, ghost: bool) {
        let ghost_opacity = self.ghost_opacity;
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.ghost = ghost;
            visual.opacity = if ghost { ghost_opacity } else { SOLID_OPACITY };
        }
    }
}
