//! Player progress profile and behavioral inference.
//!
//! The generator holds one profile per instance and refreshes it from a
//! partial overlay on every generation call. Two derived fields come out of
//! the refresh: a skill rating in `[0, 1]` and an inferred play style.

use serde::{Deserialize, Serialize};

use crate::constants::{
    SKILL_BASELINE, SKILL_COMPLETION_WEIGHT, SKILL_EXPLORATION_CAP, SKILL_EXPLORATION_DIVISOR,
    SKILL_KILL_EFFICIENCY_CAP, SKILL_KILL_EFFICIENCY_DIVISOR, SKILL_OBJECTIVES_PER_LEVEL,
    STYLE_AGGRESSION_METERS_PER_KILL, STYLE_FAST_COMPLETION_SECS, STYLE_SLOW_COMPLETION_SECS,
};
use crate::numbers::u32_to_f32;

/// Behavioral category inferred from accumulated telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayStyle {
    Aggressive,
    Defensive,
    Explorer,
    Speedrun,
    #[default]
    Balanced,
}

impl PlayStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Defensive => "defensive",
            Self::Explorer => "explorer",
            Self::Speedrun => "speedrun",
            Self::Balanced => "balanced",
        }
    }
}

impl std::fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tie-break order for style inference: the first style in this list holding
/// the maximum score wins.
const STYLE_PRIORITY: [PlayStyle; 5] = [
    PlayStyle::Aggressive,
    PlayStyle::Defensive,
    PlayStyle::Explorer,
    PlayStyle::Speedrun,
    PlayStyle::Balanced,
];

/// Accumulated player progress plus the two derived adaptation inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgressProfile {
    pub level: u32,
    pub total_score: i64,
    pub zombies_killed: u32,
    /// Total driving distance in meters.
    pub distance_traveled: f32,
    pub objectives_completed: u32,
    pub secrets_found: u32,
    /// Running average objective completion time in seconds; 0 before the
    /// first completion.
    pub average_completion_time: f32,
    /// Derived; recomputed on every merge.
    pub skill_rating: f32,
    /// Derived; recomputed on every merge.
    pub play_style: PlayStyle,
}

impl Default for PlayerProgressProfile {
    fn default() -> Self {
        Self {
            level: 1,
            total_score: 0,
            zombies_killed: 0,
            distance_traveled: 0.0,
            objectives_completed: 0,
            secrets_found: 0,
            average_completion_time: 0.0,
            skill_rating: SKILL_BASELINE,
            play_style: PlayStyle::Balanced,
        }
    }
}

/// Partial progress overlay merged into the held profile on each generation
/// call. Absent fields leave the current value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfileUpdate {
    pub level: Option<u32>,
    pub total_score: Option<i64>,
    pub zombies_killed: Option<u32>,
    pub distance_traveled: Option<f32>,
    pub objectives_completed: Option<u32>,
    pub secrets_found: Option<u32>,
    pub average_completion_time: Option<f32>,
}

impl ProfileUpdate {
    /// Overlay capturing a full profile snapshot.
    #[must_use]
    pub fn from_profile(profile: &PlayerProgressProfile) -> Self {
        Self {
            level: Some(profile.level),
            total_score: Some(profile.total_score),
            zombies_killed: Some(profile.zombies_killed),
            distance_traveled: Some(profile.distance_traveled),
            objectives_completed: Some(profile.objectives_completed),
            secrets_found: Some(profile.secrets_found),
            average_completion_time: Some(profile.average_completion_time),
        }
    }
}

/// Telemetry reported by the run-time when an objective completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompletionReport {
    /// Wall time the objective took, in seconds.
    pub completion_time: Option<f32>,
    #[serde(default)]
    pub zombies_killed: u32,
    #[serde(default)]
    pub distance_traveled: f32,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub secrets_found: u32,
}

impl PlayerProgressProfile {
    /// Merge a partial overlay, then recompute skill rating and play style.
    pub fn merge_update(&mut self, update: &ProfileUpdate) {
        if let Some(level) = update.level {
            self.level = level.max(1);
        }
        if let Some(score) = update.total_score {
            self.total_score = score;
        }
        if let Some(kills) = update.zombies_killed {
            self.zombies_killed = kills;
        }
        if let Some(distance) = update.distance_traveled {
            self.distance_traveled = distance.max(0.0);
        }
        if let Some(completed) = update.objectives_completed {
            self.objectives_completed = completed;
        }
        if let Some(secrets) = update.secrets_found {
            self.secrets_found = secrets;
        }
        if let Some(avg) = update.average_completion_time {
            self.average_completion_time = avg.max(0.0);
        }
        self.recompute_derived();
    }

    /// Fold a completion report into the running counters, then recompute
    /// the derived fields.
    pub fn absorb_completion(&mut self, report: &CompletionReport) {
        let completed = self.objectives_completed.saturating_add(1);
        if let Some(time) = report.completion_time {
            let prior = self.average_completion_time * u32_to_f32(self.objectives_completed);
            self.average_completion_time = (prior + time.max(0.0)) / u32_to_f32(completed);
        }
        self.objectives_completed = completed;
        self.zombies_killed = self.zombies_killed.saturating_add(report.zombies_killed);
        self.distance_traveled += report.distance_traveled.max(0.0);
        self.total_score = self.total_score.saturating_add(report.score);
        self.secrets_found = self.secrets_found.saturating_add(report.secrets_found);
        self.recompute_derived();
    }

    /// Recompute skill rating and play style from the current counters.
    pub fn recompute_derived(&mut self) {
        self.skill_rating = self.rate_skill();
        self.play_style = self.infer_style();
    }

    fn rate_skill(&self) -> f32 {
        let mut rating = SKILL_BASELINE;
        if self.objectives_completed > 0 {
            let expected = u32_to_f32(self.level.max(1)) * SKILL_OBJECTIVES_PER_LEVEL;
            let completion_rate = u32_to_f32(self.objectives_completed) / expected;
            rating += (completion_rate - 0.5) * SKILL_COMPLETION_WEIGHT;
        }
        if self.distance_traveled > 0.0 {
            let kills_per_km = u32_to_f32(self.zombies_killed) / (self.distance_traveled / 1000.0);
            rating +=
                (kills_per_km / SKILL_KILL_EFFICIENCY_DIVISOR).min(SKILL_KILL_EFFICIENCY_CAP);
        }
        if self.secrets_found > 0 {
            rating +=
                (u32_to_f32(self.secrets_found) / SKILL_EXPLORATION_DIVISOR).min(SKILL_EXPLORATION_CAP);
        }
        rating.clamp(0.0, 1.0)
    }

    fn infer_style(&self) -> PlayStyle {
        let mut scores = [0u32; STYLE_PRIORITY.len()];
        // Index positions follow STYLE_PRIORITY.
        if u32_to_f32(self.zombies_killed)
            > self.distance_traveled / STYLE_AGGRESSION_METERS_PER_KILL
        {
            scores[0] += 2;
        }
        if self.average_completion_time > STYLE_SLOW_COMPLETION_SECS {
            scores[1] += 1;
            scores[2] += 1;
        }
        // A zero average means no completions yet; that is not a speed signal.
        if self.objectives_completed > 0
            && self.average_completion_time < STYLE_FAST_COMPLETION_SECS
        {
            scores[3] += 2;
        }
        if self.secrets_found > self.level {
            scores[2] += 2;
        }
        scores[4] += 1;

        let best = scores.iter().copied().max().unwrap_or(0);
        STYLE_PRIORITY
            .iter()
            .zip(scores)
            .find(|(_, score)| *score == best)
            .map_or(PlayStyle::Balanced, |(style, _)| *style)
    }
}
