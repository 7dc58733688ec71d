//! Factory functions for sample layouts and masses used in tests and the
//! command shell's `--demo` start-up scene.

use serde_json::{json, Value};
use shared::MassParams;

/// Two-mass layout in the generator's bare-array form
pub fn lobby_tower_layout() -> Value {
    json!([
        { "w": 80, "d": 40, "program": "Lobby" },
        { "w": 60, "d": 60, "program": "Tower" }
    ])
}

/// Generator-style envelope: a 70:30 podium and slab with explicit placement
pub fn podium_slab_layout() -> Value {
    json!({
        "masses": [
            { "w": 140, "h": 20, "d": 60, "x": 0, "z": 0, "program": "Podium", "material": "concrete" },
            { "w": 60, "h": 180, "d": 26, "x": 30, "z": 10, "program": "Slab", "material": "glass" }
        ]
    })
}

/// `n` default-sized masses spaced along x so none overlap
pub fn row_of_masses(n: usize, spacing: f64) -> Vec<MassParams> {
    (0..n)
        .map(|i| MassParams::default().at(i as f64 * spacing, 0.0).program(format!("Zone {i}")))
        .collect()
}

/// Layout whose last entry lacks a depth
pub fn layout_with_bad_tail(valid: usize) -> Value {
    let mut entries: Vec<Value> = (0..valid)
        .map(|i| json!({ "w": 10 + i, "d": 10, "program": format!("Ok {i}") }))
        .collect();
    entries.push(json!({ "w": 10, "program": "Broken" }));
    Value::Array(entries)
}
