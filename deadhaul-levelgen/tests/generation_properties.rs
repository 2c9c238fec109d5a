//! Property-style checks over full generation runs.

use deadhaul_levelgen::{
    CheckpointPurpose, LevelGenerator, Location, PlacementKind, PlacementRequest, ProfileUpdate,
    TerrainData, TerrainOracle,
};

struct GridOracle;

impl TerrainOracle for GridOracle {
    fn find_placement(
        &self,
        _terrain: &TerrainData,
        request: &PlacementRequest,
    ) -> Option<Location> {
        Some(match request.kind {
            PlacementKind::LevelEnd => Location::new(2000.0, 0.0, 2000.0),
            PlacementKind::Checkpoint => request.near.unwrap_or(Location::new(500.0, 0.0, 500.0)),
            PlacementKind::SecretArea => Location::new(-300.0, 0.0, 700.0),
        })
    }
}

struct BarrenOracle;

impl TerrainOracle for BarrenOracle {
    fn find_placement(
        &self,
        _terrain: &TerrainData,
        _request: &PlacementRequest,
    ) -> Option<Location> {
        None
    }
}

fn terrain() -> TerrainData {
    TerrainData::new(serde_json::json!({"biome": "interstate", "size": [4096, 4096]}))
}

#[test]
fn objective_counts_stay_bounded_across_the_difficulty_sweep() {
    for seed in 0..8u64 {
        let mut generator = LevelGenerator::new(GridOracle, seed);
        for step in 0..=10 {
            let difficulty = 0.5 + 0.25 * f64::from(step) as f32;
            let level = generator.generate_level(&ProfileUpdate::default(), &terrain(), difficulty);
            let max = generator.config().max_objectives;
            let count = level.objectives.primary.len();
            assert!(
                (2..=max).contains(&count),
                "difficulty {difficulty}: {count} primary objectives"
            );
            assert_eq!(
                level.objectives.total,
                level.objectives.primary.len() + level.objectives.bonus.len()
            );
        }
    }
}

#[test]
fn every_objective_has_positive_reward_and_progress_target() {
    let mut generator = LevelGenerator::new(GridOracle, 42);
    for step in 0..=10 {
        let difficulty = 0.5 + 0.25 * f64::from(step) as f32;
        let level = generator.generate_level(&ProfileUpdate::default(), &terrain(), difficulty);
        for objective in level
            .objectives
            .primary
            .iter()
            .chain(&level.objectives.bonus)
        {
            assert!(objective.reward > 0, "{} pays nothing", objective.id);
            assert!(objective.max_progress >= 1, "{} has no target", objective.id);
        }
        for secret in &level.secret_areas {
            assert!(secret.reward > 0);
        }
    }
}

#[test]
fn checkpoints_are_always_bracketed_by_start_and_end() {
    for seed in [1u64, 77, 31337] {
        let mut generator = LevelGenerator::new(GridOracle, seed);
        for difficulty in [0.5f32, 1.0, 2.0, 3.0] {
            let level = generator.generate_level(&ProfileUpdate::default(), &terrain(), difficulty);
            let starts = level
                .checkpoints
                .iter()
                .filter(|c| c.purpose == CheckpointPurpose::Start)
                .count();
            let ends = level
                .checkpoints
                .iter()
                .filter(|c| c.purpose == CheckpointPurpose::End)
                .count();
            assert_eq!((starts, ends), (1, 1));
            assert_eq!(level.checkpoints[0].purpose, CheckpointPurpose::Start);
            assert_eq!(
                level.checkpoints.last().unwrap().purpose,
                CheckpointPurpose::End
            );
        }
    }
}

#[test]
fn reward_shares_sum_to_one_hundred_percent() {
    let mut generator = LevelGenerator::new(GridOracle, 7);
    for difficulty in [0.5f32, 1.5, 2.5] {
        let level = generator.generate_level(&ProfileUpdate::default(), &terrain(), difficulty);
        assert!(level.rewards.grand_total > 0);
        let sum = level.rewards.primary.share_pct
            + level.rewards.bonus.share_pct
            + level.rewards.secret.share_pct;
        assert!((sum - 100.0).abs() < 0.01, "shares sum to {sum}");
    }
}

#[test]
fn skill_rating_snapshot_stays_in_unit_range_for_extreme_profiles() {
    let updates = [
        ProfileUpdate::default(),
        ProfileUpdate {
            level: Some(1),
            zombies_killed: Some(u32::MAX),
            distance_traveled: Some(0.5),
            objectives_completed: Some(u32::MAX),
            secrets_found: Some(u32::MAX),
            ..ProfileUpdate::default()
        },
        ProfileUpdate {
            level: Some(10_000),
            objectives_completed: Some(1),
            average_completion_time: Some(f32::MAX),
            ..ProfileUpdate::default()
        },
        ProfileUpdate {
            level: Some(0),
            distance_traveled: Some(-5.0),
            ..ProfileUpdate::default()
        },
    ];
    for (i, update) in updates.iter().enumerate() {
        let mut generator = LevelGenerator::new(GridOracle, 3);
        let level = generator.generate_level(update, &terrain(), 1.0);
        let skill = level.metadata.skill_rating;
        assert!((0.0..=1.0).contains(&skill), "profile {i} rated {skill}");
    }
}

#[test]
fn high_skill_profiles_trigger_aggression_adaptations() {
    let mut generator = LevelGenerator::new(GridOracle, 12);
    // Capped kill efficiency (+0.2) and secrets (+0.1) push the rating to 0.8.
    let update = ProfileUpdate {
        level: Some(1),
        zombies_killed: Some(10_000),
        distance_traveled: Some(1_000.0),
        secrets_found: Some(40),
        ..ProfileUpdate::default()
    };
    let level = generator.generate_level(&update, &terrain(), 2.0);
    assert!(level.metadata.skill_rating > 0.7);
    assert!(level
        .metadata
        .adaptations
        .contains(&deadhaul_levelgen::Adaptation::IncreasedZombieAggression));
    assert!(level
        .metadata
        .adaptations
        .contains(&deadhaul_levelgen::Adaptation::ReducedResourceSpawns));
}

#[test]
fn barren_terrain_degrades_gracefully() {
    let mut generator = LevelGenerator::new(BarrenOracle, 5);
    for _ in 0..6 {
        let level = generator.generate_level(&ProfileUpdate::default(), &terrain(), 1.5);
        assert!(level.secret_areas.is_empty(), "no placements means no secrets");
        assert_eq!(level.checkpoints[0].purpose, CheckpointPurpose::Start);
        assert_eq!(
            level.checkpoints.last().unwrap().purpose,
            CheckpointPurpose::End
        );
        assert!(level.objectives.primary.len() >= 2);
    }
}

#[test]
fn out_of_range_difficulty_is_clamped_not_fatal() {
    let mut generator = LevelGenerator::new(GridOracle, 9);
    for difficulty in [f32::NAN, -10.0, 0.0, 100.0, f32::INFINITY] {
        let level = generator.generate_level(&ProfileUpdate::default(), &terrain(), difficulty);
        assert!(level.difficulty.is_finite());
        assert!(level.objectives.primary.len() >= 2);
    }
}
