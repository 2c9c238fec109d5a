//! Play-style weighted objective type selection.
//!
//! Each play style doubles or halves the weight of specific families against
//! a baseline of 1.0, seeds the draw with its signature priority types, and
//! fills the rest by weighted draw, capped at two repeats per family.

use rand::Rng;

use crate::catalog::ObjectiveKind;
use crate::profile::PlayStyle;

/// Maximum times one objective family may repeat within a level.
pub const MAX_KIND_REPEATS: usize = 2;

/// Selection weight for a family under a play style.
#[must_use]
pub fn style_weight(style: PlayStyle, kind: ObjectiveKind) -> f32 {
    match style {
        PlayStyle::Aggressive => match kind {
            ObjectiveKind::Elimination => 2.0,
            ObjectiveKind::Survival => 1.5,
            ObjectiveKind::Collection => 0.7,
            _ => 1.0,
        },
        PlayStyle::Defensive => match kind {
            ObjectiveKind::Survival => 2.0,
            ObjectiveKind::Escort => 1.5,
            ObjectiveKind::Elimination => 0.8,
            _ => 1.0,
        },
        PlayStyle::Explorer => match kind {
            ObjectiveKind::Exploration => 2.0,
            ObjectiveKind::Collection => 1.5,
            ObjectiveKind::Survival => 0.8,
            _ => 1.0,
        },
        PlayStyle::Speedrun => match kind {
            ObjectiveKind::Elimination => 1.5,
            ObjectiveKind::Collection => 1.3,
            ObjectiveKind::Escort => 0.6,
            _ => 1.0,
        },
        PlayStyle::Balanced => 1.0,
    }
}

/// Families a style always tries to seed the level with.
#[must_use]
pub const fn priority_kinds(style: PlayStyle) -> [ObjectiveKind; 2] {
    match style {
        PlayStyle::Aggressive => [ObjectiveKind::Elimination, ObjectiveKind::Survival],
        PlayStyle::Defensive => [ObjectiveKind::Survival, ObjectiveKind::Escort],
        PlayStyle::Explorer => [ObjectiveKind::Exploration, ObjectiveKind::Collection],
        PlayStyle::Speedrun => [ObjectiveKind::Elimination, ObjectiveKind::Collection],
        PlayStyle::Balanced => [ObjectiveKind::Survival, ObjectiveKind::Elimination],
    }
}

/// Choose `count` objective families from `available`, biased by play style.
///
/// Returns fewer than `count` entries when the repeat cap exhausts the
/// eligible pool; an empty `available` slice yields an empty result.
pub fn select_objective_kinds<R: Rng>(
    style: PlayStyle,
    available: &[ObjectiveKind],
    count: usize,
    rng: &mut R,
) -> Vec<ObjectiveKind> {
    let mut picked = Vec::with_capacity(count);
    if count == 0 || available.is_empty() {
        return picked;
    }

    for kind in priority_kinds(style) {
        if picked.len() >= count {
            break;
        }
        if available.contains(&kind) {
            picked.push(kind);
        }
    }

    while picked.len() < count {
        let eligible: Vec<ObjectiveKind> = available
            .iter()
            .copied()
            .filter(|kind| picked.iter().filter(|p| *p == kind).count() < MAX_KIND_REPEATS)
            .collect();
        if eligible.is_empty() {
            log::debug!(
                "type selection exhausted at {}/{count} for {style}",
                picked.len()
            );
            break;
        }
        picked.push(weighted_draw(style, &eligible, rng));
    }
    picked
}

fn weighted_draw<R: Rng>(style: PlayStyle, eligible: &[ObjectiveKind], rng: &mut R) -> ObjectiveKind {
    let total: f32 = eligible.iter().map(|k| style_weight(style, *k)).sum();
    let mut roll = rng.gen_range(0.0..total.max(f32::EPSILON));
    let mut chosen = eligible[eligible.len() - 1];
    for kind in eligible {
        let weight = style_weight(style, *kind);
        if roll < weight {
            chosen = *kind;
            break;
        }
        roll -= weight;
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn priority_kinds_lead_the_selection() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let picked =
            select_objective_kinds(PlayStyle::Aggressive, &ObjectiveKind::ALL, 4, &mut rng);
        assert_eq!(picked.len(), 4);
        assert_eq!(picked[0], ObjectiveKind::Elimination);
        assert_eq!(picked[1], ObjectiveKind::Survival);
    }

    #[test]
    fn repeat_cap_limits_each_family_to_two() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let available = [ObjectiveKind::Survival, ObjectiveKind::Elimination];
        let picked = select_objective_kinds(PlayStyle::Balanced, &available, 10, &mut rng);
        assert_eq!(picked.len(), 4, "two families at two repeats each");
        for kind in available {
            assert!(picked.iter().filter(|p| **p == kind).count() <= MAX_KIND_REPEATS);
        }
    }

    #[test]
    fn empty_pool_returns_empty_selection() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let picked = select_objective_kinds(PlayStyle::Balanced, &[], 3, &mut rng);
        assert!(picked.is_empty());
    }

    #[test]
    fn single_family_pool_still_respects_count() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let picked = select_objective_kinds(
            PlayStyle::Explorer,
            &[ObjectiveKind::Exploration],
            2,
            &mut rng,
        );
        assert_eq!(
            picked,
            vec![ObjectiveKind::Exploration, ObjectiveKind::Exploration]
        );
    }

    #[test]
    fn explorer_bias_shows_up_in_the_draw_distribution() {
        let mut rng = ChaCha20Rng::seed_from_u64(77);
        let mut exploration_hits = 0usize;
        for _ in 0..200 {
            let picked =
                select_objective_kinds(PlayStyle::Explorer, &ObjectiveKind::ALL, 5, &mut rng);
            exploration_hits += picked
                .iter()
                .filter(|k| **k == ObjectiveKind::Exploration)
                .count();
        }
        // Priority seeding alone guarantees one per level; the 2.0 weight
        // should push the doubled pick well past chance.
        assert!(
            exploration_hits > 250,
            "exploration picked only {exploration_hits} times in 200 levels"
        );
    }
}
