//! Reward aggregation and balance classification.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BALANCE_BONUS_HEAVY_RATIO, BALANCE_EXPLORATION_HEAVY_RATIO, BALANCE_PRIMARY_HEAVY_RATIO,
};
use crate::numbers::i64_to_f64;
use crate::objective::Objective;
use crate::secrets::SecretArea;

/// How reward value is split across the three sources of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardBalance {
    PrimaryHeavy,
    BonusHeavy,
    ExplorationHeavy,
    Balanced,
}

/// Totals for one reward source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RewardBucket {
    pub total: i64,
    /// Share of the grand total in percent; 0 when the grand total is 0.
    pub share_pct: f64,
    pub count: usize,
}

impl RewardBucket {
    fn new(total: i64, count: usize, grand_total: i64) -> Self {
        let share_pct = if grand_total > 0 {
            i64_to_f64(total) / i64_to_f64(grand_total) * 100.0
        } else {
            0.0
        };
        Self {
            total,
            share_pct,
            count,
        }
    }
}

/// Aggregated reward picture for a generated level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardDistribution {
    pub primary: RewardBucket,
    pub bonus: RewardBucket,
    pub secret: RewardBucket,
    pub grand_total: i64,
    pub balance: RewardBalance,
}

/// Aggregate rewards from all three sources and classify the balance.
#[must_use]
pub fn calculate_distribution(
    primary: &[Objective],
    bonus: &[Objective],
    secrets: &[SecretArea],
) -> RewardDistribution {
    let primary_total: i64 = primary.iter().map(|o| o.reward).sum();
    let bonus_total: i64 = bonus.iter().map(|o| o.reward).sum();
    let secret_total: i64 = secrets.iter().map(|s| s.reward).sum();
    let grand_total = primary_total + bonus_total + secret_total;
    RewardDistribution {
        primary: RewardBucket::new(primary_total, primary.len(), grand_total),
        bonus: RewardBucket::new(bonus_total, bonus.len(), grand_total),
        secret: RewardBucket::new(secret_total, secrets.len(), grand_total),
        grand_total,
        balance: classify_balance(primary_total, bonus_total, secret_total),
    }
}

/// Classify the balance of reward totals, in priority order: primary-heavy,
/// bonus-heavy, exploration-heavy, balanced. A zero grand total is balanced.
#[must_use]
pub fn classify_balance(primary: i64, bonus: i64, secret: i64) -> RewardBalance {
    let grand_total = primary + bonus + secret;
    if grand_total <= 0 {
        return RewardBalance::Balanced;
    }
    let total = i64_to_f64(grand_total);
    if i64_to_f64(primary) / total > BALANCE_PRIMARY_HEAVY_RATIO {
        RewardBalance::PrimaryHeavy
    } else if i64_to_f64(bonus) / total > BALANCE_BONUS_HEAVY_RATIO {
        RewardBalance::BonusHeavy
    } else if i64_to_f64(secret) / total > BALANCE_EXPLORATION_HEAVY_RATIO {
        RewardBalance::ExplorationHeavy
    } else {
        RewardBalance::Balanced
    }
}
