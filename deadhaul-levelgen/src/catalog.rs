//! Objective template catalog.
//!
//! Templates are immutable data injected into the generator at construction.
//! Each template carries difficulty-ordered variants; each variant carries a
//! family-specific set of parameter tiers, least to most difficult.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numbers::tier_index;

/// Objective family identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Survival,
    Elimination,
    Collection,
    Escort,
    Exploration,
}

impl ObjectiveKind {
    pub const ALL: [Self; 5] = [
        Self::Survival,
        Self::Elimination,
        Self::Collection,
        Self::Escort,
        Self::Exploration,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Survival => "survival",
            Self::Elimination => "elimination",
            Self::Collection => "collection",
            Self::Escort => "escort",
            Self::Exploration => "exploration",
        }
    }
}

impl std::fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zombie threat category targeted by elimination objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Walkers,
    Runners,
    Brutes,
    Nests,
}

/// Supply category gathered by collection objectives and stocked in caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyKind {
    Fuel,
    Medkits,
    Rations,
    VehicleParts,
    Ammunition,
}

/// Ordered candidate values, least to most difficult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tiered<T>(Vec<T>);

impl<T: Copy> Tiered<T> {
    #[must_use]
    pub fn new(values: Vec<T>) -> Self {
        Self(values)
    }

    /// Value for the given difficulty level: `floor(level * len)` clamped to
    /// the hardest tier. Returns `None` only for an empty list.
    #[must_use]
    pub fn pick(&self, difficulty_level: f32) -> Option<T> {
        if self.0.is_empty() {
            return None;
        }
        self.0.get(tier_index(difficulty_level, self.0.len())).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Copy> From<Vec<T>> for Tiered<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(values)
    }
}

/// Family-specific parameter tiers for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum VariantParams {
    Survival {
        /// Seconds to hold out, when the variant is timer-driven.
        #[serde(default)]
        duration: Option<Tiered<u32>>,
        /// Horde waves to outlast, when the variant is wave-driven.
        #[serde(default)]
        waves: Option<Tiered<u32>>,
    },
    Elimination {
        count: Tiered<u32>,
        target: TargetKind,
    },
    Collection {
        amount: Tiered<u32>,
        item: SupplyKind,
    },
    Escort {
        /// Survivors to bring through alive.
        count: Tiered<u32>,
        /// Route length in meters.
        distance: Tiered<u32>,
    },
    Exploration {
        /// Meters of route to scout, when the variant is route-driven.
        #[serde(default)]
        distance: Option<Tiered<u32>>,
        /// Map coverage percentage, when the variant is survey-driven.
        #[serde(default)]
        coverage: Option<Tiered<u32>>,
    },
}

impl VariantParams {
    #[must_use]
    pub const fn family(&self) -> ObjectiveKind {
        match self {
            Self::Survival { .. } => ObjectiveKind::Survival,
            Self::Elimination { .. } => ObjectiveKind::Elimination,
            Self::Collection { .. } => ObjectiveKind::Collection,
            Self::Escort { .. } => ObjectiveKind::Escort,
            Self::Exploration { .. } => ObjectiveKind::Exploration,
        }
    }
}

const fn default_reward_scaling() -> f32 {
    1.0
}

/// Difficulty-tiered flavor of an objective template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveVariant {
    pub id: String,
    /// Description with `{token}` placeholders resolved at instantiation.
    pub desc: String,
    pub params: VariantParams,
    #[serde(default = "default_reward_scaling")]
    pub reward_scaling: f32,
    /// Base time limit in seconds; 0 means untimed.
    #[serde(default)]
    pub time_limit: u32,
    #[serde(default)]
    pub hints: Vec<String>,
}

/// Immutable catalog entry for one objective family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTemplate {
    pub kind: ObjectiveKind,
    pub name: String,
    /// Intrinsic difficulty in (0, 1]; scaled by the difficulty level.
    pub base_difficulty: f32,
    pub base_reward: i64,
    pub variants: Vec<ObjectiveVariant>,
}

impl ObjectiveTemplate {
    /// Variant for the given difficulty level; later variants are harder.
    #[must_use]
    pub fn variant_for(&self, difficulty_level: f32) -> Option<&ObjectiveVariant> {
        if self.variants.is_empty() {
            return None;
        }
        self.variants
            .get(tier_index(difficulty_level, self.variants.len()))
    }
}

/// Registry of objective templates, one per family at most.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ObjectiveCatalog {
    pub templates: Vec<ObjectiveTemplate>,
}

/// Errors raised when catalog data violates structural invariants.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("JSON parse error: {0}")]
    Parse(String),
    #[error("catalog has no templates")]
    Empty,
    #[error("duplicate template for {kind}")]
    DuplicateKind { kind: ObjectiveKind },
    #[error("template {kind} has no variants")]
    NoVariants { kind: ObjectiveKind },
    #[error("template {kind} base difficulty {value} outside (0, 1]")]
    DifficultyRange { kind: ObjectiveKind, value: f32 },
    #[error("template {kind} base reward must be positive (got {value})")]
    RewardNotPositive { kind: ObjectiveKind, value: i64 },
    #[error("variant {variant} of {kind} carries {family} parameters")]
    FamilyMismatch {
        kind: ObjectiveKind,
        variant: String,
        family: ObjectiveKind,
    },
    #[error("variant {variant} of {kind} has an empty parameter tier")]
    EmptyTier { kind: ObjectiveKind, variant: String },
    #[error("variant {variant} of {kind} lacks a goal parameter")]
    MissingGoal { kind: ObjectiveKind, variant: String },
    #[error("variant {variant} of {kind} has non-positive reward scaling")]
    ScalingNotPositive { kind: ObjectiveKind, variant: String },
    #[error("variants of {kind} must not decrease in reward scaling")]
    ScalingOrder { kind: ObjectiveKind },
}

impl ObjectiveCatalog {
    /// Load and validate a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or validation fails.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build a catalog from pre-parsed templates, validating them.
    ///
    /// # Errors
    ///
    /// Returns an error if the templates violate structural invariants.
    pub fn from_templates(templates: Vec<ObjectiveTemplate>) -> Result<Self, CatalogError> {
        let catalog = Self { templates };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Template registered for the given family, if any.
    #[must_use]
    pub fn template(&self, kind: ObjectiveKind) -> Option<&ObjectiveTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    /// Families available in this catalog, in registration order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ObjectiveKind> {
        self.templates.iter().map(|t| t.kind).collect()
    }

    /// Validate structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (idx, template) in self.templates.iter().enumerate() {
            if self.templates[..idx].iter().any(|t| t.kind == template.kind) {
                return Err(CatalogError::DuplicateKind {
                    kind: template.kind,
                });
            }
            template_invariants(template)?;
        }
        Ok(())
    }

    /// Built-in catalog used when the platform supplies no data.
    #[must_use]
    pub fn default_catalog() -> Self {
        Self {
            templates: vec![
                survival_template(),
                elimination_template(),
                collection_template(),
                escort_template(),
                exploration_template(),
            ],
        }
    }
}

fn template_invariants(template: &ObjectiveTemplate) -> Result<(), CatalogError> {
    let kind = template.kind;
    if template.variants.is_empty() {
        return Err(CatalogError::NoVariants { kind });
    }
    if !(template.base_difficulty > 0.0 && template.base_difficulty <= 1.0) {
        return Err(CatalogError::DifficultyRange {
            kind,
            value: template.base_difficulty,
        });
    }
    if template.base_reward <= 0 {
        return Err(CatalogError::RewardNotPositive {
            kind,
            value: template.base_reward,
        });
    }
    let mut prev_scaling = 0.0f32;
    for variant in &template.variants {
        variant_invariants(kind, variant)?;
        if variant.reward_scaling < prev_scaling {
            return Err(CatalogError::ScalingOrder { kind });
        }
        prev_scaling = variant.reward_scaling;
    }
    Ok(())
}

fn variant_invariants(kind: ObjectiveKind, variant: &ObjectiveVariant) -> Result<(), CatalogError> {
    let family = variant.params.family();
    if family != kind {
        return Err(CatalogError::FamilyMismatch {
            kind,
            variant: variant.id.clone(),
            family,
        });
    }
    if variant.reward_scaling <= 0.0 {
        return Err(CatalogError::ScalingNotPositive {
            kind,
            variant: variant.id.clone(),
        });
    }
    let empty_tier = || CatalogError::EmptyTier {
        kind,
        variant: variant.id.clone(),
    };
    let missing_goal = || CatalogError::MissingGoal {
        kind,
        variant: variant.id.clone(),
    };
    match &variant.params {
        VariantParams::Survival { duration, waves } => {
            if duration.is_none() && waves.is_none() {
                return Err(missing_goal());
            }
            for tier in [duration, waves].into_iter().flatten() {
                if tier.is_empty() {
                    return Err(empty_tier());
                }
            }
        }
        VariantParams::Elimination { count, .. } => {
            if count.is_empty() {
                return Err(empty_tier());
            }
        }
        VariantParams::Collection { amount, .. } => {
            if amount.is_empty() {
                return Err(empty_tier());
            }
        }
        VariantParams::Escort { count, distance } => {
            if count.is_empty() || distance.is_empty() {
                return Err(empty_tier());
            }
        }
        VariantParams::Exploration { distance, coverage } => {
            if distance.is_none() && coverage.is_none() {
                return Err(missing_goal());
            }
            for tier in [distance, coverage].into_iter().flatten() {
                if tier.is_empty() {
                    return Err(empty_tier());
                }
            }
        }
    }
    Ok(())
}

fn survival_template() -> ObjectiveTemplate {
    ObjectiveTemplate {
        kind: ObjectiveKind::Survival,
        name: "Outlast the Horde".to_string(),
        base_difficulty: 0.6,
        base_reward: 150,
        variants: vec![
            ObjectiveVariant {
                id: "hold_out".to_string(),
                desc: "Hold your position for {duration} seconds".to_string(),
                params: VariantParams::Survival {
                    duration: Some(Tiered::new(vec![60, 90, 120, 180])),
                    waves: None,
                },
                reward_scaling: 1.0,
                time_limit: 0,
                hints: vec![
                    "High ground near the wreck line gives clean sightlines.".to_string(),
                    "Keep the engine running in case the line breaks.".to_string(),
                ],
            },
            ObjectiveVariant {
                id: "wave_defense".to_string(),
                desc: "Survive {waves} waves of the horde".to_string(),
                params: VariantParams::Survival {
                    duration: None,
                    waves: Some(Tiered::new(vec![3, 5, 8, 12])),
                },
                reward_scaling: 1.2,
                time_limit: 0,
                hints: vec!["Waves come heavier from the downwind side.".to_string()],
            },
            ObjectiveVariant {
                id: "last_stand".to_string(),
                desc: "Endure {waves} waves without abandoning the barricade".to_string(),
                params: VariantParams::Survival {
                    duration: None,
                    waves: Some(Tiered::new(vec![6, 9, 14, 20])),
                },
                reward_scaling: 1.5,
                time_limit: 0,
                hints: vec![
                    "Repair the barricade between waves, not during them.".to_string(),
                    "Brutes ignore the barricade; drop them first.".to_string(),
                ],
            },
        ],
    }
}

fn elimination_template() -> ObjectiveTemplate {
    ObjectiveTemplate {
        kind: ObjectiveKind::Elimination,
        name: "Thin the Dead".to_string(),
        base_difficulty: 0.5,
        base_reward: 120,
        variants: vec![
            ObjectiveVariant {
                id: "cull_the_pack".to_string(),
                desc: "Put down {count} walkers".to_string(),
                params: VariantParams::Elimination {
                    count: Tiered::new(vec![10, 15, 25, 40]),
                    target: TargetKind::Walkers,
                },
                reward_scaling: 1.0,
                time_limit: 0,
                hints: vec!["Running them over counts, and saves ammunition.".to_string()],
            },
            ObjectiveVariant {
                id: "nest_cleanout".to_string(),
                desc: "Burn out {count} nests before they spread".to_string(),
                params: VariantParams::Elimination {
                    count: Tiered::new(vec![2, 3, 4, 6]),
                    target: TargetKind::Nests,
                },
                reward_scaling: 1.3,
                time_limit: 420,
                hints: vec![
                    "Nests spawn runners while they stand.".to_string(),
                    "A fuel can does the work of thirty rounds.".to_string(),
                ],
            },
            ObjectiveVariant {
                id: "brute_hunt".to_string(),
                desc: "Bring down {count} brutes".to_string(),
                params: VariantParams::Elimination {
                    count: Tiered::new(vec![1, 2, 4, 6]),
                    target: TargetKind::Brutes,
                },
                reward_scaling: 1.6,
                time_limit: 0,
                hints: vec!["Brutes shrug off ramming below full speed.".to_string()],
            },
        ],
    }
}

fn collection_template() -> ObjectiveTemplate {
    ObjectiveTemplate {
        kind: ObjectiveKind::Collection,
        name: "Scavenge Run".to_string(),
        base_difficulty: 0.4,
        base_reward: 100,
        variants: vec![
            ObjectiveVariant {
                id: "fuel_run".to_string(),
                desc: "Siphon {amount} cans of fuel from the wrecks".to_string(),
                params: VariantParams::Collection {
                    amount: Tiered::new(vec![5, 8, 12, 18]),
                    item: SupplyKind::Fuel,
                },
                reward_scaling: 1.0,
                time_limit: 0,
                hints: vec!["Tankers along the highway still hold a few liters.".to_string()],
            },
            ObjectiveVariant {
                id: "medical_sweep".to_string(),
                desc: "Recover {amount} medkits from the clinic district".to_string(),
                params: VariantParams::Collection {
                    amount: Tiered::new(vec![3, 5, 8, 12]),
                    item: SupplyKind::Medkits,
                },
                reward_scaling: 1.2,
                time_limit: 480,
                hints: vec![
                    "Ambulances are faster to search than pharmacies.".to_string(),
                    "The district swarms after dark.".to_string(),
                ],
            },
            ObjectiveVariant {
                id: "parts_hunt".to_string(),
                desc: "Strip {amount} vehicle parts from the junkyard".to_string(),
                params: VariantParams::Collection {
                    amount: Tiered::new(vec![4, 6, 9, 14]),
                    item: SupplyKind::VehicleParts,
                },
                reward_scaling: 1.4,
                time_limit: 0,
                hints: vec!["Matching parts fit faster; check the plates first.".to_string()],
            },
        ],
    }
}

fn escort_template() -> ObjectiveTemplate {
    ObjectiveTemplate {
        kind: ObjectiveKind::Escort,
        name: "Convoy Duty".to_string(),
        base_difficulty: 0.7,
        base_reward: 180,
        variants: vec![
            ObjectiveVariant {
                id: "convoy_cover".to_string(),
                desc: "Shield {count} survivors over {distance} meters of open road"
                    .to_string(),
                params: VariantParams::Escort {
                    count: Tiered::new(vec![1, 2, 3, 4]),
                    distance: Tiered::new(vec![800, 1200, 1800, 2500]),
                },
                reward_scaling: 1.0,
                time_limit: 0,
                hints: vec!["Stay ahead of the convoy; the dead chase the loudest engine."
                    .to_string()],
            },
            ObjectiveVariant {
                id: "refugee_run".to_string(),
                desc: "Bring {count} refugees through {distance} meters of the overrun zone"
                    .to_string(),
                params: VariantParams::Escort {
                    count: Tiered::new(vec![2, 3, 5, 8]),
                    distance: Tiered::new(vec![1000, 1500, 2200, 3000]),
                },
                reward_scaling: 1.4,
                time_limit: 540,
                hints: vec![
                    "Refugees panic near nests; plot the route around them.".to_string(),
                    "A breakdown mid-zone ends the run.".to_string(),
                ],
            },
        ],
    }
}

fn exploration_template() -> ObjectiveTemplate {
    ObjectiveTemplate {
        kind: ObjectiveKind::Exploration,
        name: "Chart the Wastes".to_string(),
        base_difficulty: 0.45,
        base_reward: 110,
        variants: vec![
            ObjectiveVariant {
                id: "scout_route".to_string(),
                desc: "Scout {distance} meters of uncharted road".to_string(),
                params: VariantParams::Exploration {
                    distance: Some(Tiered::new(vec![1000, 1500, 2500, 4000])),
                    coverage: None,
                },
                reward_scaling: 1.0,
                time_limit: 0,
                hints: vec!["Uncharted road shows dark on the dash map.".to_string()],
            },
            ObjectiveVariant {
                id: "survey_zone".to_string(),
                desc: "Survey {coverage} percent of the marked zone".to_string(),
                params: VariantParams::Exploration {
                    distance: None,
                    coverage: Some(Tiered::new(vec![40, 55, 70, 85])),
                },
                reward_scaling: 1.2,
                time_limit: 600,
                hints: vec![
                    "Rooftop vantage points reveal whole blocks at once.".to_string(),
                    "The survey resets if you leave the zone boundary.".to_string(),
                ],
            },
        ],
    }
}
