//! Inspector blueprint: a simplified plan drawing of one mass.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use shared::ObjectId;

use crate::manifest::short_id;
use crate::state::registry::Mass;

/// Drawing units per model unit
const PLAN_SCALE: f64 = 2.5;
/// Margin around the outline, in drawing units
const PLAN_PADDING: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blueprint {
    pub id: ObjectId,
    pub program: String,
    pub material: String,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl Blueprint {
    pub fn of(mass: &Mass) -> Self {
        Self {
            id: mass.id.clone(),
            program: mass.program.clone(),
            material: mass.material.clone(),
            width: mass.width,
            depth: mass.depth,
            height: mass.height,
        }
    }

    pub fn short_id(&self) -> &str {
        short_id(&self.id, 8)
    }

    /// Drawing size including padding
    pub fn sheet_size(&self) -> (f64, f64) {
        (
            self.width * PLAN_SCALE + PLAN_PADDING * 2.0,
            self.depth * PLAN_SCALE + PLAN_PADDING * 2.0,
        )
    }

    /// Plan view as an SVG document
    pub fn to_svg(&self) -> String {
        let (sheet_w, sheet_d) = self.sheet_size();
        let outline_w = self.width * PLAN_SCALE;
        let outline_d = self.depth * PLAN_SCALE;
        let pad = PLAN_PADDING;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {sheet_w} {sheet_d}">"#
        );
        let _ = writeln!(svg, r##"  <rect width="100%" height="100%" fill="#f1f5f9" />"##);
        let _ = writeln!(
            svg,
            r##"  <rect x="{pad}" y="{pad}" width="{outline_w}" height="{outline_d}" fill="white" stroke="#0f172a" stroke-width="2" />"##
        );
        let _ = writeln!(
            svg,
            r##"  <g font-family="monospace" font-size="4" font-weight="900" fill="#0f172a">"##
        );
        let _ = writeln!(
            svg,
            r#"    <text x="{pad}" y="{}">{}M SPAN</text>"#,
            pad - 10.0,
            self.width
        );
        let _ = writeln!(
            svg,
            r#"    <text x="{}" y="{}">ID: {}</text>"#,
            pad + 10.0,
            pad + 15.0,
            escape(self.short_id())
        );
        let _ = writeln!(
            svg,
            r#"    <text x="{pad}" y="{}">{}</text>"#,
            sheet_d - 10.0,
            escape(&self.program)
        );
        let _ = writeln!(svg, "  </g>");
        svg.push_str("</svg>\n");
        svg
    }

    /// File name for the export, built from the full id with anything
    /// outside `[A-Za-z0-9_-]` replaced.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            "blueprint.svg".to_string()
        } else {
            format!("{stem}.svg")
        }
    }

    /// Write the plan SVG into `dir`, returning the path.
    pub fn export_svg(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_svg())?;
        tracing::info!("Exported blueprint {}", path.display());
        Ok(path)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
