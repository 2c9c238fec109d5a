//! Objective instances and the factory that builds them from templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::{
    ObjectiveCatalog, ObjectiveKind, ObjectiveVariant, SupplyKind, TargetKind, VariantParams,
};
use crate::constants::{
    BONUS_DIFFICULTY_FACTOR, BONUS_REWARD_MULT, ESTIMATE_ESCORT_SPEED, ESTIMATE_FALLBACK_SECS,
    ESTIMATE_SCOUT_SPEED, ESTIMATE_SECS_PER_COVERAGE_PCT, ESTIMATE_SECS_PER_ITEM,
    ESTIMATE_SECS_PER_KILL, ESTIMATE_SECS_PER_WAVE, REQUIREMENT_HEALTH_DIFFICULTY,
    REQUIREMENT_MAX_VEHICLE_DAMAGE_PCT, REQUIREMENT_MIN_HEALTH_PCT,
    REQUIREMENT_VEHICLE_DIFFICULTY, TIME_LIMIT_FACTOR_BASE, TIME_LIMIT_FACTOR_FLOOR,
    TIME_LIMIT_FACTOR_SLOPE,
};
use crate::numbers::{floor_f64_to_i64, i64_to_f64, round_f32_to_u32, u32_to_f32};
use crate::terrain::Location;

/// Whether an objective is part of the critical path or side content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveCategory {
    Primary,
    Bonus,
}

/// Run-time objective state. Transitions are owned by the external
/// objective tracker; this core only ever emits `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Failed,
}

/// Gameplay constraint attached to an objective or secret area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// Finish with at least this much health remaining.
    MinHealthPct { pct: u32 },
    /// Finish with at most this much vehicle damage.
    MaxVehicleDamagePct { pct: u32 },
    /// Every escorted survivor must make it through alive.
    ProtectAllTargets,
    /// Guards posted at the entrance must be cleared first.
    ClearGuards { count: u32 },
    /// The entrance is locked behind a keycard found nearby.
    FindKeycard,
}

/// Inline capacity matching the worst case of the requirement rules.
pub type RequirementSet = SmallVec<[Requirement; 3]>;

/// Resolved, strongly-typed objective parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ObjectiveParams {
    Survival {
        #[serde(skip_serializing_if = "Option::is_none")]
        duration: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        waves: Option<u32>,
    },
    Elimination {
        count: u32,
        target: TargetKind,
    },
    Collection {
        amount: u32,
        item: SupplyKind,
    },
    Escort {
        count: u32,
        distance: u32,
    },
    Exploration {
        #[serde(skip_serializing_if = "Option::is_none")]
        distance: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        coverage: Option<u32>,
    },
}

impl ObjectiveParams {
    /// Progress target derived from the parameters, first of: count, amount,
    /// duration, waves, distance, coverage. Never below 1.
    #[must_use]
    pub fn max_progress(&self) -> u32 {
        let raw = match *self {
            Self::Elimination { count, .. } | Self::Escort { count, .. } => count,
            Self::Collection { amount, .. } => amount,
            Self::Survival { duration, waves } => duration.or(waves).unwrap_or(1),
            Self::Exploration { distance, coverage } => distance.or(coverage).unwrap_or(1),
        };
        raw.max(1)
    }

    fn tokens(&self) -> SmallVec<[(&'static str, String); 3]> {
        let mut tokens = SmallVec::new();
        match *self {
            Self::Survival { duration, waves } => {
                if let Some(duration) = duration {
                    tokens.push(("duration", duration.to_string()));
                }
                if let Some(waves) = waves {
                    tokens.push(("waves", waves.to_string()));
                }
            }
            Self::Elimination { count, .. } | Self::Escort { count, .. } => {
                tokens.push(("count", count.to_string()));
                if let Self::Escort { distance, .. } = *self {
                    tokens.push(("distance", distance.to_string()));
                }
            }
            Self::Collection { amount, .. } => {
                tokens.push(("amount", amount.to_string()));
            }
            Self::Exploration { distance, coverage } => {
                if let Some(distance) = distance {
                    tokens.push(("distance", distance.to_string()));
                }
                if let Some(coverage) = coverage {
                    tokens.push(("coverage", coverage.to_string()));
                }
            }
        }
        tokens
    }
}

/// A single generated task with its reward, difficulty, and constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub kind: ObjectiveKind,
    pub category: ObjectiveCategory,
    pub name: String,
    pub desc: String,
    pub difficulty: f32,
    pub reward: i64,
    pub params: ObjectiveParams,
    #[serde(default)]
    pub status: ObjectiveStatus,
    #[serde(default)]
    pub progress: u32,
    pub max_progress: u32,
    /// Seconds allowed; `None` means untimed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    /// Assigned later by the external placement pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub requirements: RequirementSet,
    pub hints: Vec<String>,
    /// Bonus objectives may be skipped without failing the level.
    #[serde(default)]
    pub optional: bool,
    pub created_at: DateTime<Utc>,
}

impl Objective {
    /// Rough play-time estimate in seconds, used for level pacing.
    #[must_use]
    pub fn estimated_duration(&self) -> u32 {
        if let Some(limit) = self.time_limit {
            return limit;
        }
        match self.params {
            ObjectiveParams::Survival { duration, waves } => duration
                .or_else(|| waves.map(|w| w * ESTIMATE_SECS_PER_WAVE))
                .unwrap_or(ESTIMATE_FALLBACK_SECS),
            ObjectiveParams::Elimination { count, .. } => count * ESTIMATE_SECS_PER_KILL,
            ObjectiveParams::Collection { amount, .. } => amount * ESTIMATE_SECS_PER_ITEM,
            ObjectiveParams::Escort { distance, .. } => distance / ESTIMATE_ESCORT_SPEED,
            ObjectiveParams::Exploration { distance, coverage } => distance
                .map(|d| d / ESTIMATE_SCOUT_SPEED)
                .or_else(|| coverage.map(|c| c * ESTIMATE_SECS_PER_COVERAGE_PCT))
                .unwrap_or(ESTIMATE_FALLBACK_SECS),
        }
    }
}

/// Builds concrete objectives from catalog templates.
///
/// Borrowed per generation pass; the skill rating and reward scaling are
/// frozen for the duration of one level.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveFactory<'a> {
    catalog: &'a ObjectiveCatalog,
    skill_rating: f32,
    reward_scaling: f32,
}

impl<'a> ObjectiveFactory<'a> {
    #[must_use]
    pub const fn new(catalog: &'a ObjectiveCatalog, skill_rating: f32, reward_scaling: f32) -> Self {
        Self {
            catalog,
            skill_rating,
            reward_scaling,
        }
    }

    /// Instantiate an objective, or `None` when the kind is not in the
    /// catalog or its template has no variants. Callers skip `None` rather
    /// than failing the level.
    #[must_use]
    pub fn create(
        &self,
        kind: ObjectiveKind,
        difficulty_level: f32,
        category: ObjectiveCategory,
        id: String,
    ) -> Option<Objective> {
        let template = self.catalog.template(kind)?;
        let bonus = category == ObjectiveCategory::Bonus;
        // Bonus objectives run a step easier than the requested level.
        let effective_level = if bonus {
            difficulty_level * BONUS_DIFFICULTY_FACTOR
        } else {
            difficulty_level
        };
        let variant = template.variant_for(effective_level)?;
        let params = resolve_params(&variant.params, effective_level)?;

        let mut reward = scaled_reward(
            template.base_reward,
            self.reward_scaling,
            variant.reward_scaling,
            effective_level,
            self.skill_rating,
        );
        if bonus {
            reward = floor_f64_to_i64(i64_to_f64(reward) * f64::from(BONUS_REWARD_MULT));
        }

        Some(Objective {
            id,
            kind,
            category,
            name: template.name.clone(),
            desc: format_desc(&variant.desc, &params.tokens()),
            difficulty: template.base_difficulty * effective_level,
            reward: reward.max(1),
            max_progress: params.max_progress(),
            params,
            status: ObjectiveStatus::Pending,
            progress: 0,
            time_limit: adjusted_time_limit(variant.time_limit, effective_level),
            location: None,
            requirements: build_requirements(kind, effective_level),
            hints: variant.hints.clone(),
            optional: bonus,
            created_at: Utc::now(),
        })
    }
}

fn resolve_params(tiers: &VariantParams, level: f32) -> Option<ObjectiveParams> {
    match tiers {
        VariantParams::Survival { duration, waves } => Some(ObjectiveParams::Survival {
            duration: duration.as_ref().and_then(|t| t.pick(level)),
            waves: waves.as_ref().and_then(|t| t.pick(level)),
        }),
        VariantParams::Elimination { count, target } => Some(ObjectiveParams::Elimination {
            count: count.pick(level)?,
            target: *target,
        }),
        VariantParams::Collection { amount, item } => Some(ObjectiveParams::Collection {
            amount: amount.pick(level)?,
            item: *item,
        }),
        VariantParams::Escort { count, distance } => Some(ObjectiveParams::Escort {
            count: count.pick(level)?,
            distance: distance.pick(level)?,
        }),
        VariantParams::Exploration { distance, coverage } => Some(ObjectiveParams::Exploration {
            distance: distance.as_ref().and_then(|t| t.pick(level)),
            coverage: coverage.as_ref().and_then(|t| t.pick(level)),
        }),
    }
}

fn scaled_reward(
    base_reward: i64,
    global_scaling: f32,
    variant_scaling: f32,
    level: f32,
    skill_rating: f32,
) -> i64 {
    let difficulty_mult = 1.0 + (f64::from(level) - 1.0) * 0.5;
    let skill_mult = 1.0 + (f64::from(skill_rating) - 0.5) * 0.3;
    let raw = i64_to_f64(base_reward)
        * f64::from(global_scaling)
        * difficulty_mult
        * skill_mult
        * f64::from(variant_scaling);
    floor_f64_to_i64(raw).max(1)
}

fn adjusted_time_limit(base: u32, level: f32) -> Option<u32> {
    if base == 0 {
        return None;
    }
    let factor =
        (TIME_LIMIT_FACTOR_BASE - level * TIME_LIMIT_FACTOR_SLOPE).max(TIME_LIMIT_FACTOR_FLOOR);
    Some(round_f32_to_u32(u32_to_f32(base) * factor).max(1))
}

fn build_requirements(kind: ObjectiveKind, level: f32) -> RequirementSet {
    let mut requirements = RequirementSet::new();
    if level > REQUIREMENT_HEALTH_DIFFICULTY {
        requirements.push(Requirement::MinHealthPct {
            pct: REQUIREMENT_MIN_HEALTH_PCT,
        });
    }
    if level > REQUIREMENT_VEHICLE_DIFFICULTY {
        requirements.push(Requirement::MaxVehicleDamagePct {
            pct: REQUIREMENT_MAX_VEHICLE_DAMAGE_PCT,
        });
    }
    if kind == ObjectiveKind::Escort {
        requirements.push(Requirement::ProtectAllTargets);
    }
    requirements
}

fn format_desc(template: &str, tokens: &[(&'static str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in tokens {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
