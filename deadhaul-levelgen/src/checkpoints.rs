//! Checkpoint planning along the primary objective chain.
//!
//! Every level is bracketed by a start and an end safe zone. Intermediate
//! checkpoints trail every second primary objective, fortified when the
//! objective ahead of them is hard.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::TerrainOracle;
use crate::constants::{CHECKPOINT_SAFE_DIFFICULTY, CHECKPOINT_STRIDE};
use crate::objective::Objective;
use crate::terrain::{Location, PlacementKind, PlacementRequest, TerrainData};

/// Checkpoint fortification tier, determining services and protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointKind {
    SafeZone,
    Outpost,
    Waypoint,
}

impl CheckpointKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SafeZone => "safe_zone",
            Self::Outpost => "outpost",
            Self::Waypoint => "waypoint",
        }
    }

    /// Services offered at this tier.
    #[must_use]
    pub const fn services(self) -> ServiceSet {
        match self {
            Self::SafeZone => ServiceSet {
                save: true,
                repair: true,
                refuel: true,
                trade: false,
            },
            Self::Outpost => ServiceSet {
                save: true,
                repair: false,
                refuel: false,
                trade: true,
            },
            Self::Waypoint => ServiceSet {
                save: true,
                repair: false,
                refuel: false,
                trade: false,
            },
        }
    }

    /// Whether the zone suppresses zombie spawns.
    #[must_use]
    pub const fn protected(self) -> bool {
        matches!(self, Self::SafeZone)
    }

    /// Zone radius in meters.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::SafeZone => 50.0,
            Self::Outpost => 35.0,
            Self::Waypoint => 20.0,
        }
    }

    const fn display_name(self) -> &'static str {
        match self {
            Self::SafeZone => "Safe Zone",
            Self::Outpost => "Outpost",
            Self::Waypoint => "Waypoint",
        }
    }
}

impl std::fmt::Display for CheckpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Services available at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ServiceSet {
    pub save: bool,
    pub repair: bool,
    pub refuel: bool,
    pub trade: bool,
}

/// Why a checkpoint exists in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointPurpose {
    Start,
    Objective { index: usize },
    End,
}

/// A save/service point placed along the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub kind: CheckpointKind,
    pub name: String,
    pub location: Location,
    pub radius: f32,
    pub protected: bool,
    pub services: ServiceSet,
    pub purpose: CheckpointPurpose,
    /// Flipped by the run-time, never by this core.
    #[serde(default)]
    pub activated: bool,
    /// Flipped by the run-time, never by this core.
    #[serde(default)]
    pub discovered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_slot: Option<String>,
}

fn checkpoint(
    id: String,
    kind: CheckpointKind,
    location: Location,
    purpose: CheckpointPurpose,
) -> Checkpoint {
    Checkpoint {
        id,
        kind,
        name: kind.display_name().to_string(),
        location,
        radius: kind.radius(),
        protected: kind.protected(),
        services: kind.services(),
        purpose,
        activated: false,
        discovered: false,
        last_used: None,
        save_slot: None,
    }
}

/// Lay out checkpoints against the primary objective list.
///
/// The plan always opens with a start safe zone at the level origin and
/// closes with an end safe zone, regardless of objective count.
pub fn plan_checkpoints<O: TerrainOracle, R: Rng>(
    oracle: &O,
    terrain: &TerrainData,
    primary: &[Objective],
    waypoint_ratio: f32,
    level_id: &str,
    rng: &mut R,
) -> Vec<Checkpoint> {
    let mut plan = vec![checkpoint(
        format!("{level_id}-cp-start"),
        CheckpointKind::SafeZone,
        Location::ORIGIN,
        CheckpointPurpose::Start,
    )];

    let mut first_intermediate = true;
    for index in (CHECKPOINT_STRIDE..primary.len()).step_by(CHECKPOINT_STRIDE) {
        let objective = &primary[index];
        let kind = if objective.difficulty > CHECKPOINT_SAFE_DIFFICULTY || first_intermediate {
            CheckpointKind::SafeZone
        } else if rng.gen_range(0.0..1.0f32) < waypoint_ratio {
            CheckpointKind::Waypoint
        } else {
            CheckpointKind::Outpost
        };
        first_intermediate = false;

        let request =
            PlacementRequest::new(PlacementKind::Checkpoint, objective.location, kind.radius());
        let location = oracle
            .find_placement(terrain, &request)
            .or(objective.location)
            .unwrap_or_default();
        plan.push(checkpoint(
            format!("{level_id}-cp-obj-{index}"),
            kind,
            location,
            CheckpointPurpose::Objective { index },
        ));
    }

    let end_request = PlacementRequest::new(
        PlacementKind::LevelEnd,
        None,
        CheckpointKind::SafeZone.radius(),
    );
    let end_location = oracle
        .find_placement(terrain, &end_request)
        .unwrap_or_default();
    plan.push(checkpoint(
        format!("{level_id}-cp-end"),
        CheckpointKind::SafeZone,
        end_location,
        CheckpointPurpose::End,
    ));
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ObjectiveCatalog, ObjectiveKind};
    use crate::objective::{ObjectiveCategory, ObjectiveFactory};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use serde_json::json;

    struct GridOracle;

    impl TerrainOracle for GridOracle {
        fn find_placement(
            &self,
            _terrain: &TerrainData,
            request: &PlacementRequest,
        ) -> Option<Location> {
            Some(match request.kind {
                PlacementKind::LevelEnd => Location::new(1000.0, 0.0, 1000.0),
                _ => request.near.unwrap_or(Location::new(100.0, 0.0, 100.0)),
            })
        }
    }

    fn objectives(count: usize, level: f32) -> Vec<Objective> {
        let catalog = ObjectiveCatalog::default_catalog();
        let factory = ObjectiveFactory::new(&catalog, 0.5, 1.0);
        (0..count)
            .map(|i| {
                factory
                    .create(
                        ObjectiveKind::Elimination,
                        level,
                        ObjectiveCategory::Primary,
                        format!("obj-{i}"),
                    )
                    .unwrap()
            })
            .collect()
    }

    fn purposes(plan: &[Checkpoint]) -> (usize, usize, usize) {
        let starts = plan
            .iter()
            .filter(|c| c.purpose == CheckpointPurpose::Start)
            .count();
        let ends = plan
            .iter()
            .filter(|c| c.purpose == CheckpointPurpose::End)
            .count();
        (starts, ends, plan.len())
    }

    #[test]
    fn plan_is_bracketed_even_with_no_objectives() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let terrain = TerrainData::new(json!({}));
        let plan = plan_checkpoints(&GridOracle, &terrain, &[], 0.7, "lvl", &mut rng);
        let (starts, ends, len) = purposes(&plan);
        assert_eq!((starts, ends, len), (1, 1, 2));
        assert_eq!(plan[0].location, Location::ORIGIN);
        assert!(plan[0].protected);
    }

    #[test]
    fn intermediate_checkpoints_follow_every_second_objective() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let terrain = TerrainData::new(json!({}));
        let plan = plan_checkpoints(&GridOracle, &terrain, &objectives(7, 1.0), 0.7, "lvl", &mut rng);
        let intermediate: Vec<usize> = plan
            .iter()
            .filter_map(|c| match c.purpose {
                CheckpointPurpose::Objective { index } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(intermediate, vec![2, 4, 6]);
        let (starts, ends, len) = purposes(&plan);
        assert_eq!((starts, ends, len), (1, 1, 5));
    }

    #[test]
    fn first_intermediate_is_always_fortified() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let terrain = TerrainData::new(json!({}));
        // Difficulty 0.5 keeps objective difficulty at 0.25, under the
        // fortification threshold, so only the first-intermediate rule fires.
        let plan = plan_checkpoints(&GridOracle, &terrain, &objectives(3, 0.5), 0.7, "lvl", &mut rng);
        let first = plan
            .iter()
            .find(|c| matches!(c.purpose, CheckpointPurpose::Objective { .. }))
            .unwrap();
        assert_eq!(first.kind, CheckpointKind::SafeZone);
    }

    #[test]
    fn hard_objectives_force_safe_zones() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let terrain = TerrainData::new(json!({}));
        // Difficulty 2.5 puts elimination objectives at 1.25 difficulty.
        let plan =
            plan_checkpoints(&GridOracle, &terrain, &objectives(9, 2.5), 0.7, "lvl", &mut rng);
        for cp in plan
            .iter()
            .filter(|c| matches!(c.purpose, CheckpointPurpose::Objective { .. }))
        {
            assert_eq!(cp.kind, CheckpointKind::SafeZone);
        }
    }

    #[test]
    fn waypoints_dominate_the_unfortified_split() {
        let mut rng = ChaCha20Rng::seed_from_u64(123);
        let terrain = TerrainData::new(json!({}));
        let mut waypoints = 0usize;
        let mut outposts = 0usize;
        for _ in 0..120 {
            let plan =
                plan_checkpoints(&GridOracle, &terrain, &objectives(9, 0.5), 0.7, "lvl", &mut rng);
            for cp in &plan {
                match cp.kind {
                    CheckpointKind::Waypoint => waypoints += 1,
                    CheckpointKind::Outpost => outposts += 1,
                    CheckpointKind::SafeZone => {}
                }
            }
        }
        assert!(
            waypoints > outposts,
            "70/30 split should favor waypoints ({waypoints} vs {outposts})"
        );
    }

    #[test]
    fn service_table_matches_fortification_tier() {
        assert_eq!(
            CheckpointKind::SafeZone.services(),
            ServiceSet {
                save: true,
                repair: true,
                refuel: true,
                trade: false
            }
        );
        assert_eq!(
            CheckpointKind::Outpost.services(),
            ServiceSet {
                save: true,
                repair: false,
                refuel: false,
                trade: true
            }
        );
        assert_eq!(
            CheckpointKind::Waypoint.services(),
            ServiceSet {
                save: true,
                repair: false,
                refuel: false,
                trade: false
            }
        );
        assert!(CheckpointKind::SafeZone.protected());
        assert!(!CheckpointKind::Outpost.protected());
        assert!(!CheckpointKind::Waypoint.protected());
    }
}
