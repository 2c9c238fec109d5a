//! Secret area generation.
//!
//! Secret areas are optional, difficulty-gated side content. Their contents
//! are fixed per type; only the currency amount scales, and their location
//! comes from the external terrain oracle.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::TerrainOracle;
use crate::catalog::SupplyKind;
use crate::constants::SECRET_ELIGIBILITY_MARGIN;
use crate::numbers::floor_f64_to_i64;
use crate::objective::Requirement;
use crate::profile::{PlayStyle, PlayerProgressProfile};
use crate::terrain::{Location, PlacementKind, PlacementRequest, TerrainData};

/// Secret area category, each with fixed base stats and stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretAreaKind {
    Cache,
    Hideout,
    Bunker,
    Garden,
}

impl SecretAreaKind {
    pub const ALL: [Self; 4] = [Self::Cache, Self::Hideout, Self::Bunker, Self::Garden];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Hideout => "hideout",
            Self::Bunker => "bunker",
            Self::Garden => "garden",
        }
    }

    /// Intrinsic difficulty gating when this type may appear.
    #[must_use]
    pub const fn base_difficulty(self) -> f32 {
        match self {
            Self::Cache => 0.3,
            Self::Garden => 0.4,
            Self::Hideout => 0.5,
            Self::Bunker => 0.8,
        }
    }

    #[must_use]
    pub const fn base_reward(self) -> i64 {
        match self {
            Self::Cache => 80,
            Self::Garden => 100,
            Self::Hideout => 120,
            Self::Bunker => 200,
        }
    }

    const fn base_currency(self) -> i64 {
        match self {
            Self::Cache => 50,
            Self::Garden => 40,
            Self::Hideout => 75,
            Self::Bunker => 150,
        }
    }

    const fn display_name(self) -> &'static str {
        match self {
            Self::Cache => "Supply Cache",
            Self::Hideout => "Survivor Hideout",
            Self::Bunker => "Military Bunker",
            Self::Garden => "Rooftop Garden",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::Cache => "A stash of supplies squirreled away before the fall.",
            Self::Hideout => "An abandoned shelter, left in a hurry but left stocked.",
            Self::Bunker => "A sealed military installation. Something kept it sealed.",
            Self::Garden => "A tended plot above the reach of the dead.",
        }
    }

    /// Minimum clear radius the placement oracle should honor, in meters.
    const fn clearance(self) -> f32 {
        match self {
            Self::Cache => 8.0,
            Self::Garden => 10.0,
            Self::Hideout => 15.0,
            Self::Bunker => 25.0,
        }
    }

    fn stock(self) -> Vec<SupplyKind> {
        match self {
            Self::Cache => vec![SupplyKind::Rations, SupplyKind::Ammunition],
            Self::Hideout => vec![SupplyKind::Rations, SupplyKind::Medkits],
            Self::Bunker => vec![
                SupplyKind::Ammunition,
                SupplyKind::Medkits,
                SupplyKind::VehicleParts,
            ],
            Self::Garden => vec![SupplyKind::Rations],
        }
    }

    const fn lore(self) -> Option<&'static str> {
        match self {
            Self::Hideout => {
                Some("A journal on the cot ends mid-sentence, three weeks after the fall.")
            }
            Self::Bunker => {
                Some("The duty log's last entry reads: do not open the south door.")
            }
            Self::Cache | Self::Garden => None,
        }
    }

    fn requirements(self) -> SmallVec<[Requirement; 2]> {
        let mut requirements = SmallVec::new();
        match self {
            Self::Cache | Self::Garden => {}
            Self::Hideout => requirements.push(Requirement::ClearGuards { count: 3 }),
            Self::Bunker => {
                requirements.push(Requirement::FindKeycard);
                requirements.push(Requirement::ClearGuards { count: 6 });
            }
        }
        requirements
    }

    const fn hint(self) -> &'static str {
        match self {
            Self::Cache => "Fresh tire tracks end where no road goes.",
            Self::Hideout => "Boarded windows with the boards on the inside.",
            Self::Bunker => "The static on the radio gets louder near the entrance.",
            Self::Garden => "Green on a rooftop means somebody carried water up there.",
        }
    }

    const fn approach_hint(self) -> &'static str {
        match self {
            Self::Cache => "Circle the wreck line on foot; the stash is low to the ground.",
            Self::Hideout => "The back entrance is quieter than the storefront.",
            Self::Bunker => "The keycard holder never made it far from the door.",
            Self::Garden => "The fire escape holds, but take it slow.",
        }
    }
}

impl std::fmt::Display for SecretAreaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a secret area yields once accessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretContents {
    pub currency: i64,
    pub items: Vec<SupplyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lore: Option<String>,
}

/// An optional, difficulty-gated bonus location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretArea {
    pub id: String,
    pub name: String,
    pub kind: SecretAreaKind,
    pub desc: String,
    pub location: Location,
    pub difficulty: f32,
    pub reward: i64,
    pub requirements: SmallVec<[Requirement; 2]>,
    pub hints: Vec<String>,
    /// Flipped by the run-time, never by this core.
    #[serde(default)]
    pub discovered: bool,
    /// Flipped by the run-time, never by this core.
    #[serde(default)]
    pub accessed: bool,
    pub contents: SecretContents,
    pub created_at: chrono::DateTime<Utc>,
}

/// Generate one secret area, or `None` when no type is eligible at this
/// difficulty or the terrain oracle cannot supply a placement.
pub fn generate_secret_area<O: TerrainOracle, R: Rng>(
    oracle: &O,
    terrain: &TerrainData,
    difficulty_level: f32,
    profile: &PlayerProgressProfile,
    id: String,
    rng: &mut R,
) -> Option<SecretArea> {
    let eligible: Vec<SecretAreaKind> = SecretAreaKind::ALL
        .into_iter()
        .filter(|kind| kind.base_difficulty() <= difficulty_level + SECRET_ELIGIBILITY_MARGIN)
        .collect();
    if eligible.is_empty() {
        log::debug!("no secret area type eligible at difficulty {difficulty_level}");
        return None;
    }
    let kind = eligible[rng.gen_range(0..eligible.len())];

    let request = PlacementRequest::new(PlacementKind::SecretArea, None, kind.clearance());
    let Some(location) = oracle.find_placement(terrain, &request) else {
        log::debug!("terrain oracle found no placement for {kind}");
        return None;
    };

    let level = f64::from(difficulty_level);
    let mut hints = vec![kind.hint().to_string()];
    if profile.play_style == PlayStyle::Explorer {
        hints.push(kind.approach_hint().to_string());
    }

    Some(SecretArea {
        id,
        name: kind.display_name().to_string(),
        kind,
        desc: kind.description().to_string(),
        location,
        difficulty: kind.base_difficulty() * difficulty_level,
        reward: floor_f64_to_i64(crate::numbers::i64_to_f64(kind.base_reward()) * level).max(1),
        requirements: kind.requirements(),
        hints,
        discovered: false,
        accessed: false,
        contents: SecretContents {
            currency: floor_f64_to_i64(crate::numbers::i64_to_f64(kind.base_currency()) * level)
                .max(1),
            items: kind.stock(),
            lore: kind.lore().map(str::to_string),
        },
        created_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use serde_json::json;

    struct FixedOracle(Option<Location>);

    impl TerrainOracle for FixedOracle {
        fn find_placement(
            &self,
            _terrain: &TerrainData,
            _request: &PlacementRequest,
        ) -> Option<Location> {
            self.0
        }
    }

    fn terrain() -> TerrainData {
        TerrainData::new(json!({"sector": "rust-belt"}))
    }

    #[test]
    fn low_difficulty_excludes_the_bunker() {
        let oracle = FixedOracle(Some(Location::new(10.0, 0.0, 5.0)));
        let profile = PlayerProgressProfile::default();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        for i in 0..50 {
            let area = generate_secret_area(
                &oracle,
                &terrain(),
                0.5,
                &profile,
                format!("secret-{i}"),
                &mut rng,
            )
            .expect("cache, garden, hideout are eligible at 0.5");
            assert_ne!(area.kind, SecretAreaKind::Bunker);
        }
    }

    #[test]
    fn oracle_failure_yields_none() {
        let oracle = FixedOracle(None);
        let profile = PlayerProgressProfile::default();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let area = generate_secret_area(
            &oracle,
            &terrain(),
            1.0,
            &profile,
            "secret-0".to_string(),
            &mut rng,
        );
        assert!(area.is_none());
    }

    #[test]
    fn nothing_is_eligible_below_the_cache_gate() {
        let oracle = FixedOracle(Some(Location::ORIGIN));
        let profile = PlayerProgressProfile::default();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let area = generate_secret_area(
            &oracle,
            &terrain(),
            0.05,
            &profile,
            "secret-0".to_string(),
            &mut rng,
        );
        assert!(area.is_none());
    }

    #[test]
    fn reward_and_difficulty_scale_with_level() {
        let oracle = FixedOracle(Some(Location::ORIGIN));
        let profile = PlayerProgressProfile::default();
        // Only the cache is eligible at 0.15, making the draw deterministic.
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let low = generate_secret_area(
            &oracle,
            &terrain(),
            0.15,
            &profile,
            "a".to_string(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(low.kind, SecretAreaKind::Cache);
        assert_eq!(low.reward, 12);
        assert_eq!(low.contents.currency, 7);
        assert!((low.difficulty - 0.045).abs() < 1e-5);
    }

    #[test]
    fn explorer_profiles_get_an_approach_hint() {
        let oracle = FixedOracle(Some(Location::ORIGIN));
        let mut explorer = PlayerProgressProfile {
            level: 2,
            secrets_found: 9,
            ..PlayerProgressProfile::default()
        };
        explorer.recompute_derived();
        assert_eq!(explorer.play_style, PlayStyle::Explorer);
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let area = generate_secret_area(
            &oracle,
            &terrain(),
            0.2,
            &explorer,
            "a".to_string(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(area.hints.len(), 2);

        let plain = PlayerProgressProfile::default();
        let area = generate_secret_area(
            &oracle,
            &terrain(),
            0.2,
            &plain,
            "b".to_string(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(area.hints.len(), 1);
    }

    #[test]
    fn bunker_contents_are_fixed_and_guarded() {
        let oracle = FixedOracle(Some(Location::ORIGIN));
        let profile = PlayerProgressProfile::default();
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let bunker = std::iter::repeat_with(|| {
            generate_secret_area(
                &oracle,
                &terrain(),
                2.0,
                &profile,
                "s".to_string(),
                &mut rng,
            )
        })
        .flatten()
        .find(|area| area.kind == SecretAreaKind::Bunker)
        .expect("bunker eligible at 2.0 and drawn eventually");
        assert!(bunker.requirements.contains(&Requirement::FindKeycard));
        assert!(bunker.contents.lore.is_some());
        assert_eq!(bunker.contents.items.len(), 3);
        assert!(!bunker.discovered && !bunker.accessed);
    }
}
