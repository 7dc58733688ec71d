//! Scene adapter seam.
//!
//! The 3D engine (meshes, camera, gizmo math) lives behind [`SceneAdapter`].
//! The controller only ever talks to it through opaque [`VisualHandle`]s.

pub mod headless;
pub mod picking;

use std::fmt;

use crate::state::registry::Mass;

pub use headless::HeadlessScene;

/// Opaque handle to a visual object owned by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

impl fmt::Display for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

/// Pointer position in screen space, as delivered by the input layer
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rendering/interaction backend the controller drives.
pub trait SceneAdapter {
    /// Create the box visual for a mass, placed with its base on the ground plane.
    fn create_visual(&mut self, mass: &Mass) -> VisualHandle;

    fn remove_visual(&mut self, handle: VisualHandle);

    /// Move an existing visual so its center sits at `(x, y, z)`.
    fn move_visual(&mut self, handle: VisualHandle, x: f64, y: f64, z: f64);

    /// Topmost visual under `point`, restricted to `candidates`.
    fn pick_topmost(&self, point: ScreenPoint, candidates: &[VisualHandle]) -> Option<VisualHandle>;

    fn attach_gizmo(&mut self, handle: VisualHandle);

    fn detach_gizmo(&mut self);

    fn set_transparency(&mut self, handle: VisualHandle, ghost: bool);
}
