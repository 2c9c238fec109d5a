//! Terrain placement types.
//!
//! The generator never inspects terrain data. It carries an opaque payload
//! from the caller to an external placement oracle and accepts whatever
//! location the oracle returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// World-space position chosen by the placement oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Location {
    /// Level origin; the start checkpoint is always anchored here.
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Opaque terrain description supplied by the caller.
///
/// The payload shape belongs to the terrain subsystem; this core only
/// forwards it through placement queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TerrainData(Value);

impl TerrainData {
    #[must_use]
    pub const fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// Raw payload, for the placement oracle's use.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.0
    }
}

/// Feature category a placement is being requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    SecretArea,
    Checkpoint,
    LevelEnd,
}

/// Placement query forwarded to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub kind: PlacementKind,
    /// Anchor the placement should stay close to, when one exists.
    pub near: Option<Location>,
    /// Minimum clear radius around the feature, in meters.
    pub clearance: f32,
}

impl PlacementRequest {
    #[must_use]
    pub const fn new(kind: PlacementKind, near: Option<Location>, clearance: f32) -> Self {
        Self {
            kind,
            near,
            clearance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_payload_roundtrips() {
        let terrain = TerrainData::new(serde_json::json!({"tiles": [1, 2, 3]}));
        let json = serde_json::to_string(&terrain).unwrap();
        let back: TerrainData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, terrain);
        assert_eq!(back.payload()["tiles"][1], 2);
    }

    #[test]
    fn origin_is_zeroed() {
        assert_eq!(Location::ORIGIN, Location::new(0.0, 0.0, 0.0));
    }
}
