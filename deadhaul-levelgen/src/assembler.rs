//! Level assembly pipeline and the public generator facade.
//!
//! One `LevelGenerator` owns a profile copy, a catalog, a configuration,
//! and seeded RNG streams. `generate_level` is a single synchronous pass:
//! profile refresh, type selection, objective instantiation, secret areas,
//! reward aggregation, checkpoint planning, metadata.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TerrainOracle;
use crate::catalog::ObjectiveCatalog;
use crate::constants::{DIFFICULTY_LEVEL_MAX, DIFFICULTY_LEVEL_MIN};
use crate::level::{
    LevelDefinition, LevelMetadata, ObjectiveSet, ema_step, estimate_duration, select_adaptations,
};
use crate::objective::{Objective, ObjectiveCategory, ObjectiveFactory};
use crate::profile::{CompletionReport, PlayerProgressProfile, ProfileUpdate};
use crate::rewards::calculate_distribution;
use crate::rng::RngStreams;
use crate::secrets::generate_secret_area;
use crate::selector::select_objective_kinds;
use crate::terrain::TerrainData;

/// Generation tuning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Hard cap on primary objectives per level.
    #[serde(default = "GeneratorConfig::default_max_objectives")]
    pub max_objectives: usize,
    /// Primary objectives at the lowest difficulty.
    #[serde(default = "GeneratorConfig::default_base_objectives")]
    pub base_objectives: usize,
    #[serde(default = "GeneratorConfig::default_bonus_min")]
    pub bonus_min: usize,
    #[serde(default = "GeneratorConfig::default_bonus_max")]
    pub bonus_max: usize,
    /// Chance that a level carries any secret areas at all.
    #[serde(default = "GeneratorConfig::default_secret_chance")]
    pub secret_chance: f32,
    #[serde(default = "GeneratorConfig::default_secret_draws_min")]
    pub secret_draws_min: usize,
    #[serde(default = "GeneratorConfig::default_secret_draws_max")]
    pub secret_draws_max: usize,
    /// Waypoint share of unfortified intermediate checkpoints.
    #[serde(default = "GeneratorConfig::default_waypoint_ratio")]
    pub waypoint_ratio: f32,
    /// Global reward scaling knob.
    #[serde(default = "GeneratorConfig::default_reward_scaling")]
    pub reward_scaling: f32,
    /// Smoothing factor for the rolling difficulty average.
    #[serde(default = "GeneratorConfig::default_ema_alpha")]
    pub ema_alpha: f32,
}

impl GeneratorConfig {
    const fn default_max_objectives() -> usize {
        6
    }

    const fn default_base_objectives() -> usize {
        2
    }

    const fn default_bonus_min() -> usize {
        1
    }

    const fn default_bonus_max() -> usize {
        2
    }

    const fn default_secret_chance() -> f32 {
        0.6
    }

    const fn default_secret_draws_min() -> usize {
        1
    }

    const fn default_secret_draws_max() -> usize {
        3
    }

    const fn default_waypoint_ratio() -> f32 {
        0.7
    }

    const fn default_reward_scaling() -> f32 {
        1.0
    }

    const fn default_ema_alpha() -> f32 {
        0.2
    }

    /// Validate configuration invariants before sanitization.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorConfigError` when any field violates the documented
    /// bounds.
    pub fn validate(&self) -> Result<(), GeneratorConfigError> {
        if self.base_objectives < 2 {
            return Err(GeneratorConfigError::MinViolation {
                field: "base_objectives",
                min: 2.0,
                value: self.base_objectives as f32,
            });
        }
        if self.base_objectives > self.max_objectives {
            return Err(GeneratorConfigError::ObjectiveBounds {
                base: self.base_objectives,
                max: self.max_objectives,
            });
        }
        if self.bonus_min > self.bonus_max {
            return Err(GeneratorConfigError::DrawBounds {
                field: "bonus",
                min: self.bonus_min,
                max: self.bonus_max,
            });
        }
        if self.secret_draws_min == 0 || self.secret_draws_min > self.secret_draws_max {
            return Err(GeneratorConfigError::DrawBounds {
                field: "secret_draws",
                min: self.secret_draws_min,
                max: self.secret_draws_max,
            });
        }
        for (field, value) in [
            ("secret_chance", self.secret_chance),
            ("waypoint_ratio", self.waypoint_ratio),
            ("ema_alpha", self.ema_alpha),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GeneratorConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        if self.reward_scaling <= 0.0 {
            return Err(GeneratorConfigError::MinViolation {
                field: "reward_scaling",
                min: f32::EPSILON,
                value: self.reward_scaling,
            });
        }
        Ok(())
    }

    /// Clamp non-finite or out-of-range values back into working bounds.
    pub fn sanitize(&mut self) {
        if !self.secret_chance.is_finite() {
            self.secret_chance = Self::default_secret_chance();
        }
        self.secret_chance = self.secret_chance.clamp(0.0, 1.0);
        if !self.waypoint_ratio.is_finite() {
            self.waypoint_ratio = Self::default_waypoint_ratio();
        }
        self.waypoint_ratio = self.waypoint_ratio.clamp(0.0, 1.0);
        if !self.ema_alpha.is_finite() || self.ema_alpha <= 0.0 {
            self.ema_alpha = Self::default_ema_alpha();
        }
        self.ema_alpha = self.ema_alpha.clamp(0.0, 1.0);
        if !self.reward_scaling.is_finite() || self.reward_scaling <= 0.0 {
            self.reward_scaling = Self::default_reward_scaling();
        }
        self.base_objectives = self.base_objectives.max(2);
        self.max_objectives = self.max_objectives.max(self.base_objectives);
        self.bonus_max = self.bonus_max.max(self.bonus_min);
        self.secret_draws_min = self.secret_draws_min.max(1);
        self.secret_draws_max = self.secret_draws_max.max(self.secret_draws_min);
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_objectives: Self::default_max_objectives(),
            base_objectives: Self::default_base_objectives(),
            bonus_min: Self::default_bonus_min(),
            bonus_max: Self::default_bonus_max(),
            secret_chance: Self::default_secret_chance(),
            secret_draws_min: Self::default_secret_draws_min(),
            secret_draws_max: Self::default_secret_draws_max(),
            waypoint_ratio: Self::default_waypoint_ratio(),
            reward_scaling: Self::default_reward_scaling(),
            ema_alpha: Self::default_ema_alpha(),
        }
    }
}

/// Errors raised when generator configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum GeneratorConfigError {
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f32,
        value: f32,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("base objective count {base} exceeds maximum {max}")]
    ObjectiveBounds { base: usize, max: usize },
    #[error("{field} draw bounds invalid (min {min}, max {max})")]
    DrawBounds {
        field: &'static str,
        min: usize,
        max: usize,
    },
}

/// Rolling statistics across a generator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GeneratorStats {
    pub levels_generated: u64,
    pub objectives_generated: u64,
    pub bonus_objectives_generated: u64,
    pub secret_areas_generated: u64,
    pub checkpoints_planned: u64,
    /// Exponential moving average of the requested difficulty level.
    pub difficulty_ema: f32,
    pub progress_reports: u64,
    pub completions_reported: u64,
    /// Total RNG draws across all streams, for reproducibility audits.
    pub rng_draws: u64,
}

/// Adaptive level-content generator.
///
/// Owns exactly one profile copy and one set of RNG streams; concurrent
/// generation from a shared instance must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct LevelGenerator<O: TerrainOracle> {
    oracle: O,
    catalog: ObjectiveCatalog,
    cfg: GeneratorConfig,
    profile: PlayerProgressProfile,
    rng: RngStreams,
    stats: GeneratorStats,
    level_seq: u64,
}

impl<O: TerrainOracle> LevelGenerator<O> {
    /// Create a generator with the built-in catalog and default tuning.
    #[must_use]
    pub fn new(oracle: O, seed: u64) -> Self {
        Self::with_catalog(
            oracle,
            ObjectiveCatalog::default_catalog(),
            GeneratorConfig::default(),
            seed,
        )
    }

    /// Create a generator with an explicit catalog and configuration.
    ///
    /// # Panics
    ///
    /// Panics when the catalog or configuration violates validation rules.
    #[must_use]
    pub fn with_catalog(
        oracle: O,
        catalog: ObjectiveCatalog,
        cfg: GeneratorConfig,
        seed: u64,
    ) -> Self {
        catalog.validate().expect("valid objective catalog");
        cfg.validate().expect("valid generator config");
        let mut cfg = cfg;
        cfg.sanitize();
        Self {
            oracle,
            catalog,
            cfg,
            profile: PlayerProgressProfile::default(),
            rng: RngStreams::from_user_seed(seed),
            stats: GeneratorStats::default(),
            level_seq: 0,
        }
    }

    /// Create a generator from platform-supplied catalog JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_catalog_json(oracle: O, catalog_json: &str, seed: u64) -> anyhow::Result<Self> {
        let catalog = ObjectiveCatalog::from_json(catalog_json)?;
        Ok(Self::with_catalog(
            oracle,
            catalog,
            GeneratorConfig::default(),
            seed,
        ))
    }

    /// Generate a complete level for the given progress, terrain, and
    /// difficulty level.
    pub fn generate_level(
        &mut self,
        update: &ProfileUpdate,
        terrain: &TerrainData,
        difficulty_level: f32,
    ) -> LevelDefinition {
        let difficulty_level = sanitize_difficulty(difficulty_level);
        self.profile.merge_update(update);
        self.level_seq += 1;
        let level_id = format!("level-{:04}", self.level_seq);
        log::debug!(
            "generating {level_id}: difficulty {difficulty_level:.2}, skill {:.2}, style {}",
            self.profile.skill_rating,
            self.profile.play_style
        );

        let factory =
            ObjectiveFactory::new(&self.catalog, self.profile.skill_rating, self.cfg.reward_scaling);
        let primary = self.build_objectives(
            &factory,
            primary_count(&self.cfg, difficulty_level),
            difficulty_level,
            ObjectiveCategory::Primary,
            &level_id,
        );
        let bonus_count = self
            .rng
            .selection()
            .gen_range(self.cfg.bonus_min..=self.cfg.bonus_max);
        let bonus = self.build_objectives(
            &factory,
            bonus_count,
            difficulty_level,
            ObjectiveCategory::Bonus,
            &level_id,
        );

        let secret_areas = self.build_secret_areas(terrain, difficulty_level, &level_id);
        let rewards = calculate_distribution(&primary, &bonus, &secret_areas);
        let checkpoints = crate::checkpoints::plan_checkpoints(
            &self.oracle,
            terrain,
            &primary,
            self.cfg.waypoint_ratio,
            &level_id,
            &mut *self.rng.checkpoints(),
        );
        let estimated_duration = estimate_duration(&primary, &bonus, &checkpoints);

        self.record_generation(&primary, &bonus, &secret_areas, &checkpoints, difficulty_level);

        LevelDefinition {
            id: level_id,
            difficulty: difficulty_level,
            player_level: self.profile.level,
            objectives: ObjectiveSet::new(primary, bonus),
            secret_areas,
            checkpoints,
            rewards,
            estimated_duration,
            metadata: LevelMetadata {
                generated_at: chrono::Utc::now(),
                skill_rating: self.profile.skill_rating,
                play_style: self.profile.play_style,
                adaptations: select_adaptations(
                    self.profile.skill_rating,
                    self.profile.play_style,
                    difficulty_level,
                ),
            },
        }
    }

    fn build_objectives(
        &self,
        factory: &ObjectiveFactory<'_>,
        count: usize,
        difficulty_level: f32,
        category: ObjectiveCategory,
        level_id: &str,
    ) -> Vec<Objective> {
        let kinds = select_objective_kinds(
            self.profile.play_style,
            &self.catalog.kinds(),
            count,
            &mut *self.rng.selection(),
        );
        let tag = match category {
            ObjectiveCategory::Primary => "obj",
            ObjectiveCategory::Bonus => "bonus",
        };
        let mut objectives = Vec::with_capacity(kinds.len());
        for (index, kind) in kinds.into_iter().enumerate() {
            let id = format!("{level_id}-{tag}-{index}");
            match factory.create(kind, difficulty_level, category, id) {
                Some(objective) => objectives.push(objective),
                None => log::debug!("skipping {kind}: not instantiable from this catalog"),
            }
        }
        objectives
    }

    fn build_secret_areas(
        &self,
        terrain: &TerrainData,
        difficulty_level: f32,
        level_id: &str,
    ) -> Vec<crate::secrets::SecretArea> {
        let mut rng = self.rng.secrets();
        if !rng.gen_bool(f64::from(self.cfg.secret_chance)) {
            return Vec::new();
        }
        let draws = rng.gen_range(self.cfg.secret_draws_min..=self.cfg.secret_draws_max);
        let mut areas = Vec::with_capacity(draws);
        for index in 0..draws {
            let id = format!("{level_id}-secret-{index}");
            if let Some(area) = generate_secret_area(
                &self.oracle,
                terrain,
                difficulty_level,
                &self.profile,
                id,
                &mut *rng,
            ) {
                areas.push(area);
            }
        }
        areas
    }

    fn record_generation(
        &mut self,
        primary: &[Objective],
        bonus: &[Objective],
        secrets: &[crate::secrets::SecretArea],
        checkpoints: &[crate::checkpoints::Checkpoint],
        difficulty_level: f32,
    ) {
        let first_sample = self.stats.levels_generated == 0;
        self.stats.levels_generated += 1;
        self.stats.objectives_generated += (primary.len() + bonus.len()) as u64;
        self.stats.bonus_objectives_generated += bonus.len() as u64;
        self.stats.secret_areas_generated += secrets.len() as u64;
        self.stats.checkpoints_planned += checkpoints.len() as u64;
        self.stats.difficulty_ema = ema_step(
            self.stats.difficulty_ema,
            difficulty_level,
            self.cfg.ema_alpha,
            first_sample,
        );
        self.stats.rng_draws = self.rng.total_draws();
    }

    /// The held profile copy, including derived skill and play style.
    #[must_use]
    pub const fn player_progress(&self) -> &PlayerProgressProfile {
        &self.profile
    }

    /// Rolling generation statistics.
    #[must_use]
    pub const fn stats(&self) -> &GeneratorStats {
        &self.stats
    }

    /// The injected objective catalog.
    #[must_use]
    pub const fn catalog(&self) -> &ObjectiveCatalog {
        &self.catalog
    }

    /// The active tuning configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.cfg
    }

    /// Notification hook: the run-time reports objective progress. This core
    /// keeps no objective run-time state; the report only feeds telemetry.
    pub fn update_objective_progress(&mut self, objective_id: &str, progress: u32) {
        log::debug!("progress report for {objective_id}: {progress}");
        self.stats.progress_reports += 1;
    }

    /// Notification hook: the run-time reports a completed objective. The
    /// report is folded into the held profile so the next level adapts.
    pub fn complete_objective(&mut self, objective_id: &str, report: &CompletionReport) {
        log::debug!("completion report for {objective_id}");
        self.stats.completions_reported += 1;
        self.profile.absorb_completion(report);
    }

    /// Deterministically reseed the generator's RNG streams.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = RngStreams::from_user_seed(seed);
    }
}

fn sanitize_difficulty(level: f32) -> f32 {
    if level.is_nan() {
        return 1.0;
    }
    level.clamp(DIFFICULTY_LEVEL_MIN, DIFFICULTY_LEVEL_MAX)
}

/// One extra primary objective per whole difficulty step, capped.
fn primary_count(cfg: &GeneratorConfig, difficulty_level: f32) -> usize {
    let extra = difficulty_level.max(0.0).floor() as usize;
    (cfg.base_objectives + extra).clamp(cfg.base_objectives, cfg.max_objectives)
}
