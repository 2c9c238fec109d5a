//! Tuning constants for the level generation core.

/// Baseline skill rating before any telemetry adjustments.
pub const SKILL_BASELINE: f32 = 0.5;
/// Weight applied to the completion-rate deviation when rating skill.
pub const SKILL_COMPLETION_WEIGHT: f32 = 0.3;
/// Objectives expected per player level when computing the completion rate.
pub const SKILL_OBJECTIVES_PER_LEVEL: f32 = 3.0;
/// Cap on the kill-efficiency contribution to the skill rating.
pub const SKILL_KILL_EFFICIENCY_CAP: f32 = 0.2;
/// Divisor turning kills-per-kilometer into a skill contribution.
pub const SKILL_KILL_EFFICIENCY_DIVISOR: f32 = 10.0;
/// Cap on the exploration contribution to the skill rating.
pub const SKILL_EXPLORATION_CAP: f32 = 0.1;
/// Secrets needed to max out the exploration contribution.
pub const SKILL_EXPLORATION_DIVISOR: f32 = 20.0;

/// Average completion time above which cautious play is assumed (seconds).
pub const STYLE_SLOW_COMPLETION_SECS: f32 = 300.0;
/// Average completion time below which speedrunning is assumed (seconds).
pub const STYLE_FAST_COMPLETION_SECS: f32 = 180.0;
/// Meters of travel weighed against one kill in the aggression heuristic.
pub const STYLE_AGGRESSION_METERS_PER_KILL: f32 = 100.0;

/// Reward multiplier applied to bonus objectives.
pub const BONUS_REWARD_MULT: f32 = 1.5;
/// Fraction of the requested difficulty bonus objectives are generated at.
pub const BONUS_DIFFICULTY_FACTOR: f32 = 0.8;

/// Floor for the time-limit adjustment factor at high difficulty.
pub const TIME_LIMIT_FACTOR_FLOOR: f32 = 0.5;
/// Base of the time-limit adjustment curve.
pub const TIME_LIMIT_FACTOR_BASE: f32 = 1.5;
/// Difficulty coefficient of the time-limit adjustment curve.
pub const TIME_LIMIT_FACTOR_SLOPE: f32 = 0.3;

/// Difficulty above which a health-conservation requirement is attached.
pub const REQUIREMENT_HEALTH_DIFFICULTY: f32 = 1.5;
/// Difficulty above which a vehicle-condition requirement is attached.
pub const REQUIREMENT_VEHICLE_DIFFICULTY: f32 = 2.0;
/// Minimum health percentage demanded by the health requirement.
pub const REQUIREMENT_MIN_HEALTH_PCT: u32 = 50;
/// Maximum vehicle damage percentage tolerated by the vehicle requirement.
pub const REQUIREMENT_MAX_VEHICLE_DAMAGE_PCT: u32 = 20;

/// Objective difficulty above which an intermediate checkpoint is fortified.
pub const CHECKPOINT_SAFE_DIFFICULTY: f32 = 0.7;
/// Primary-objective index stride between intermediate checkpoints.
pub const CHECKPOINT_STRIDE: usize = 2;

/// Margin added to the difficulty level when gating secret area types.
pub const SECRET_ELIGIBILITY_MARGIN: f32 = 0.2;

/// Primary-reward share above which a level counts as objective-driven.
pub const BALANCE_PRIMARY_HEAVY_RATIO: f64 = 0.7;
/// Bonus-reward share above which a level counts as side-content-driven.
pub const BALANCE_BONUS_HEAVY_RATIO: f64 = 0.4;
/// Secret-reward share above which a level counts as exploration-driven.
pub const BALANCE_EXPLORATION_HEAVY_RATIO: f64 = 0.3;

/// Skill rating above which pressure adaptations activate.
pub const ADAPTATION_HIGH_SKILL: f32 = 0.7;
/// Skill rating below which assistance adaptations activate.
pub const ADAPTATION_LOW_SKILL: f32 = 0.3;
/// Difficulty level above which elite-threat adaptations activate.
pub const ADAPTATION_HARD_DIFFICULTY: f32 = 2.0;

/// Lowest difficulty level the generator will run at.
pub const DIFFICULTY_LEVEL_MIN: f32 = 0.1;
/// Highest difficulty level the generator will run at.
pub const DIFFICULTY_LEVEL_MAX: f32 = 5.0;

/// Seconds budgeted per survival wave when estimating duration.
pub const ESTIMATE_SECS_PER_WAVE: u32 = 45;
/// Seconds budgeted per elimination target when estimating duration.
pub const ESTIMATE_SECS_PER_KILL: u32 = 12;
/// Seconds budgeted per collected item when estimating duration.
pub const ESTIMATE_SECS_PER_ITEM: u32 = 30;
/// Assumed escort convoy speed in meters per second.
pub const ESTIMATE_ESCORT_SPEED: u32 = 3;
/// Assumed scouting speed in meters per second.
pub const ESTIMATE_SCOUT_SPEED: u32 = 4;
/// Seconds budgeted per coverage percentage point when estimating duration.
pub const ESTIMATE_SECS_PER_COVERAGE_PCT: u32 = 6;
/// Fallback estimate for objectives with no usable parameters (seconds).
pub const ESTIMATE_FALLBACK_SECS: u32 = 180;
/// Transit overhead budgeted per planned checkpoint (seconds).
pub const ESTIMATE_SECS_PER_CHECKPOINT: u32 = 60;
