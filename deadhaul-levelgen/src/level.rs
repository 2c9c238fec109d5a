//! Assembled level definition and its adaptation metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::checkpoints::Checkpoint;
use crate::constants::{
    ADAPTATION_HARD_DIFFICULTY, ADAPTATION_HIGH_SKILL, ADAPTATION_LOW_SKILL,
    ESTIMATE_SECS_PER_CHECKPOINT,
};
use crate::objective::Objective;
use crate::profile::PlayStyle;
use crate::rewards::RewardDistribution;
use crate::secrets::SecretArea;

/// Tuning knob the run-time applies on top of the generated content.
/// Tags are additive; several may be active at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adaptation {
    IncreasedZombieAggression,
    ReducedResourceSpawns,
    AdditionalHealthPickups,
    ExtendedTimeLimits,
    AdditionalSecretAreas,
    ExplorationBonuses,
    EliteZombieSpawns,
    EnvironmentalHazards,
}

/// Adaptation tag capacity covering the worst case of the rules below.
pub type AdaptationSet = SmallVec<[Adaptation; 4]>;

/// Derive the adaptation tags for a skill rating, play style, and
/// difficulty level.
#[must_use]
pub fn select_adaptations(
    skill_rating: f32,
    play_style: PlayStyle,
    difficulty_level: f32,
) -> AdaptationSet {
    let mut tags = AdaptationSet::new();
    if skill_rating > ADAPTATION_HIGH_SKILL {
        tags.push(Adaptation::IncreasedZombieAggression);
        tags.push(Adaptation::ReducedResourceSpawns);
    }
    if skill_rating < ADAPTATION_LOW_SKILL {
        tags.push(Adaptation::AdditionalHealthPickups);
        tags.push(Adaptation::ExtendedTimeLimits);
    }
    if play_style == PlayStyle::Explorer {
        tags.push(Adaptation::AdditionalSecretAreas);
        tags.push(Adaptation::ExplorationBonuses);
    }
    if difficulty_level > ADAPTATION_HARD_DIFFICULTY {
        tags.push(Adaptation::EliteZombieSpawns);
        tags.push(Adaptation::EnvironmentalHazards);
    }
    tags
}

/// Primary and bonus objectives of one level, with the combined count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSet {
    pub primary: Vec<Objective>,
    pub bonus: Vec<Objective>,
    pub total: usize,
}

impl ObjectiveSet {
    #[must_use]
    pub fn new(primary: Vec<Objective>, bonus: Vec<Objective>) -> Self {
        let total = primary.len() + bonus.len();
        Self {
            primary,
            bonus,
            total,
        }
    }
}

/// Snapshot of the adaptation inputs the level was generated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMetadata {
    pub generated_at: DateTime<Utc>,
    pub skill_rating: f32,
    pub play_style: PlayStyle,
    pub adaptations: AdaptationSet,
}

/// A complete, self-consistent level produced by one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub id: String,
    pub difficulty: f32,
    pub player_level: u32,
    pub objectives: ObjectiveSet,
    pub secret_areas: Vec<SecretArea>,
    pub checkpoints: Vec<Checkpoint>,
    pub rewards: RewardDistribution,
    /// Rough expected play time in seconds.
    pub estimated_duration: u32,
    pub metadata: LevelMetadata,
}

/// Expected play time: every objective's estimate plus transit overhead per
/// checkpoint.
#[must_use]
pub fn estimate_duration(
    primary: &[Objective],
    bonus: &[Objective],
    checkpoints: &[Checkpoint],
) -> u32 {
    let objectives: u32 = primary
        .iter()
        .chain(bonus)
        .map(Objective::estimated_duration)
        .sum();
    let len: u32 = u32::try_from(checkpoints.len()).unwrap_or(u32::MAX);
    objectives.saturating_add(len.saturating_mul(ESTIMATE_SECS_PER_CHECKPOINT))
}

/// Exponential moving average step for the rolling difficulty statistic.
#[must_use]
pub fn ema_step(current: f32, sample: f32, alpha: f32, first_sample: bool) -> f32 {
    if first_sample {
        sample
    } else {
        current + alpha * (sample - current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_skill_triggers_pressure_tags() {
        let tags = select_adaptations(0.8, PlayStyle::Balanced, 1.0);
        assert!(tags.contains(&Adaptation::IncreasedZombieAggression));
        assert!(tags.contains(&Adaptation::ReducedResourceSpawns));
        assert!(!tags.contains(&Adaptation::AdditionalHealthPickups));
    }

    #[test]
    fn low_skill_triggers_assistance_tags() {
        let tags = select_adaptations(0.2, PlayStyle::Balanced, 1.0);
        assert!(tags.contains(&Adaptation::AdditionalHealthPickups));
        assert!(tags.contains(&Adaptation::ExtendedTimeLimits));
    }

    #[test]
    fn tags_stack_rather_than_exclude() {
        let tags = select_adaptations(0.8, PlayStyle::Explorer, 2.5);
        assert!(tags.contains(&Adaptation::IncreasedZombieAggression));
        assert!(tags.contains(&Adaptation::AdditionalSecretAreas));
        assert!(tags.contains(&Adaptation::ExplorationBonuses));
        assert!(tags.contains(&Adaptation::EliteZombieSpawns));
        assert!(tags.contains(&Adaptation::EnvironmentalHazards));
        assert_eq!(tags.len(), 6);
    }

    #[test]
    fn midline_profiles_get_no_tags() {
        let tags = select_adaptations(0.5, PlayStyle::Balanced, 1.0);
        assert!(tags.is_empty());
    }

    #[test]
    fn ema_seeds_on_first_sample() {
        assert!((ema_step(0.0, 2.0, 0.2, true) - 2.0).abs() < f32::EPSILON);
        let stepped = ema_step(2.0, 3.0, 0.2, false);
        assert!((stepped - 2.2).abs() < 1e-6);
    }
}
