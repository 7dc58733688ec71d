use serde::{Deserialize, Serialize};

/// Unique identifier of a mass in the scene
pub type ObjectId = String;

pub const DEFAULT_WIDTH: f64 = 50.0;
pub const DEFAULT_HEIGHT: f64 = 100.0;
pub const DEFAULT_DEPTH: f64 = 50.0;
pub const DEFAULT_MATERIAL: &str = "default";
pub const DEFAULT_PROGRAM: &str = "Zone";

/// Field set used to create a mass. Every field is optional; missing
/// fields fall back to the registry defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(alias = "w", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(alias = "h", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(alias = "d", skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl MassParams {
    /// Box with explicit dimensions, everything else defaulted
    pub fn with_size(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            depth: Some(depth),
            ..Default::default()
        }
    }

    pub fn at(mut self, x: f64, z: f64) -> Self {
        self.x = Some(x);
        self.z = Some(z);
        self
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }
}

/// One mass as returned by the layout generator.
///
/// Footprint (`width`, `depth`) is mandatory; the generator may omit the
/// height and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "d")]
    pub depth: f64,
    #[serde(default, alias = "h", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl From<LayoutEntry> for MassParams {
    fn from(entry: LayoutEntry) -> Self {
        Self {
            id: entry.id,
            width: Some(entry.width),
            height: entry.height,
            depth: Some(entry.depth),
            x: entry.x,
            z: entry.z,
            material: entry.material,
            program: entry.program,
        }
    }
}

/// Request body for `POST /api/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Response body for `POST /api/generate`.
///
/// `layout` is passed through unvalidated; the studio checks its structure
/// before touching the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub layout: serde_json::Value,
}
