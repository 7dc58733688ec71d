//! Authoritative store of masses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::{
    MassParams, ObjectId, DEFAULT_DEPTH, DEFAULT_HEIGHT, DEFAULT_MATERIAL, DEFAULT_PROGRAM,
    DEFAULT_WIDTH,
};

/// A box-shaped design element resting on the ground plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    pub id: ObjectId,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Footprint placement
    pub x: f64,
    pub z: f64,
    pub material: String,
    pub program: String,
}

impl Mass {
    /// Vertical placement of the box center; keeps the base at y = 0.
    pub fn elevation(&self) -> f64 {
        self.height / 2.0
    }

    /// Box center in world space
    pub fn center(&self) -> [f64; 3] {
        [self.x, self.elevation(), self.z]
    }
}

/// Ordered masses plus an id index for constant-time lookup
#[derive(Debug, Default)]
pub struct MassRegistry {
    masses: Vec<Mass>,
    index: HashMap<ObjectId, usize>,
}

impl MassRegistry {
    /// Create a mass from `params`, append it and return a copy of the record.
    pub fn add(&mut self, params: MassParams) -> Mass {
        let id = match params.id {
            Some(id) if is_safe_id(&id) && !self.index.contains_key(&id) => id,
            Some(id) => {
                tracing::warn!(id = %id, "supplied mass id unusable, assigning a fresh one");
                self.fresh_id()
            }
            None => self.fresh_id(),
        };

        let mass = Mass {
            id,
            width: dimension(params.width, DEFAULT_WIDTH),
            height: dimension(params.height, DEFAULT_HEIGHT),
            depth: dimension(params.depth, DEFAULT_DEPTH),
            x: params.x.filter(|v| v.is_finite()).unwrap_or(0.0),
            z: params.z.filter(|v| v.is_finite()).unwrap_or(0.0),
            material: params.material.unwrap_or_else(|| DEFAULT_MATERIAL.to_string()),
            program: params.program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
        };

        self.index.insert(mass.id.clone(), self.masses.len());
        self.masses.push(mass.clone());
        mass
    }

    /// Remove every mass. Previously issued ids become invalid.
    pub fn clear(&mut self) {
        self.masses.clear();
        self.index.clear();
    }

    pub fn find(&self, id: &str) -> Option<&Mass> {
        self.index.get(id).map(|&i| &self.masses[i])
    }

    /// Ordered snapshot (insertion order)
    pub fn all(&self) -> &[Mass] {
        &self.masses
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Move a mass's footprint. Returns false if the id is unknown.
    pub fn set_position(&mut self, id: &str, x: f64, z: f64) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                let mass = &mut self.masses[i];
                mass.x = x;
                mass.z = z;
                true
            }
            None => false,
        }
    }

    fn fresh_id(&self) -> ObjectId {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Ids end up in file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Positive finite dimension or the default
fn dimension(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            tracing::warn!(value = v, default, "invalid mass dimension replaced by default");
            default
        }
        None => default,
    }
}
