//! Energy and portion calculations.
//!
//! Everything in here is pure arithmetic. Nothing returns an error: bad numeric
//! input (zero or negative divisors, non-finite values, unknown status tags)
//! degrades to zero or to a neutral multiplier instead. The UI validates
//! weight before calling in, so these fallbacks only matter for garbage input.
//!
//! Order of operations for portions:
//! 1. treats are taken off the DER budget (floored at 0)
//! 2. the rest is split between wet and dry food according to the food type
//! 3. every surfaced quantity is rounded to one decimal place

use log::warn;
use shared::{
    CalculatorConfig, CatStatus, ConsumptionSummary, EnergyRequirement, FoodPortions,
    FoodPortionsRequest, FoodType,
};

/// Grams per kilogram, used to turn kcal/kg into grams
const GRAMS_PER_KG: f64 = 1000.0;

/// Round half-up to 0.1 resolution
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Treat non-finite and negative values as zero
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Calculator service holding the configured constants
#[derive(Debug, Clone)]
pub struct CalculatorService {
    config: CalculatorConfig,
}

impl Default for CalculatorService {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorService {
    pub fn new() -> Self {
        Self {
            config: CalculatorConfig::default(),
        }
    }

    pub fn with_config(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Resting Energy Requirement in kcal/day.
    ///
    /// Below the small cat threshold (2 kg) the allometric formula
    /// `70 * w^0.75` is used, otherwise the linear `30 * w + 70`.
    /// Non-positive or non-finite weight yields 0.
    pub fn calculate_rer(&self, weight_kg: f64) -> f64 {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return 0.0;
        }

        if weight_kg < self.config.small_cat_threshold_kg {
            70.0 * weight_kg.powf(0.75)
        } else {
            weight_kg * 30.0 + 70.0
        }
    }

    /// Energy multiplier for a status; unrecognized statuses get 1
    pub fn multiplier(&self, status: &CatStatus) -> f64 {
        match status {
            CatStatus::KittenYoung => 3.0,
            CatStatus::KittenOld => 2.5,
            CatStatus::Neutered => 1.2,
            CatStatus::Intact => 1.4,
            CatStatus::Inactive => 1.0,
            CatStatus::Active => 1.6,
            CatStatus::Unrecognized(tag) => {
                warn!("Unrecognized cat status '{}', using multiplier 1", tag);
                1.0
            }
        }
    }

    /// Multiplier lookup straight from a storage tag
    pub fn multiplier_for_tag(&self, tag: &str) -> f64 {
        self.multiplier(&CatStatus::from(tag))
    }

    /// Daily Energy Requirement: RER scaled by the status multiplier
    pub fn calculate_der(&self, rer: f64, status: &CatStatus) -> f64 {
        rer * self.multiplier(status)
    }

    /// RER, DER and multiplier for a weight/status pair, rounded for display
    pub fn energy_requirement(&self, weight_kg: f64, status: &CatStatus) -> EnergyRequirement {
        let rer = self.calculate_rer(weight_kg);
        let der = self.calculate_der(rer, status);

        EnergyRequirement {
            weight: weight_kg,
            cat_status: status.clone(),
            rer: round_to_tenth(rer),
            der: round_to_tenth(der),
            multiplier: self.multiplier(status),
        }
    }

    /// Split a daily calorie budget into wet/dry food portions
    pub fn calculate_food_portions(&self, request: &FoodPortionsRequest) -> FoodPortions {
        let split = self.split_budget(request);

        FoodPortions {
            wet_food_grams: round_to_tenth(split.wet_grams),
            dry_food_grams: round_to_tenth(split.dry_grams),
            remaining_calories: round_to_tenth(split.remaining),
            pouches: round_to_tenth(self.grams_to_pouches(split.wet_grams)),
        }
    }

    /// Total daily intake from treats, wet and dry food compared with the DER.
    ///
    /// Over budget means the total exceeds the DER at display resolution.
    pub fn calculate_consumption(&self, request: &FoodPortionsRequest) -> ConsumptionSummary {
        let der = non_negative(request.der_calories);
        let wet_per_pouch = non_negative(request.wet_food_calories_per_pouch);
        let dry_per_kg = non_negative(request.dry_food_calories_per_kg);
        let treats = non_negative(request.treat_calories);

        let split = self.split_budget(request);

        let wet_calories = self.grams_to_pouches(split.wet_grams) * wet_per_pouch;
        let dry_calories = split.dry_grams / GRAMS_PER_KG * dry_per_kg;
        let total = treats + wet_calories + dry_calories;
        let remaining = round_to_tenth(der - total);

        ConsumptionSummary {
            wet_food_calories: round_to_tenth(wet_calories),
            dry_food_calories: round_to_tenth(dry_calories),
            treat_calories: round_to_tenth(treats),
            total_calories: round_to_tenth(total),
            remaining_calories: remaining,
            is_over_budget: remaining < 0.0,
        }
    }

    fn grams_to_pouches(&self, grams: f64) -> f64 {
        if self.config.pouch_grams > 0.0 {
            grams / self.config.pouch_grams
        } else {
            0.0
        }
    }

    /// Unrounded wet/dry split shared by portions and consumption
    fn split_budget(&self, request: &FoodPortionsRequest) -> BudgetSplit {
        let der = non_negative(request.der_calories);
        let wet_per_pouch = non_negative(request.wet_food_calories_per_pouch);
        let dry_per_kg = non_negative(request.dry_food_calories_per_kg);
        let treats = non_negative(request.treat_calories);
        let pouch_count = f64::from(request.pouch_count.max(1));
        let pouch_grams = self.config.pouch_grams;

        let budget = (der - treats).max(0.0);

        match request.food_type {
            FoodType::Wet => BudgetSplit {
                wet_grams: if wet_per_pouch > 0.0 {
                    budget / wet_per_pouch * pouch_grams
                } else {
                    0.0
                },
                dry_grams: 0.0,
                remaining: 0.0,
            },
            FoodType::Dry => BudgetSplit {
                wet_grams: 0.0,
                dry_grams: if dry_per_kg > 0.0 {
                    budget / dry_per_kg * GRAMS_PER_KG
                } else {
                    0.0
                },
                remaining: 0.0,
            },
            FoodType::Both => {
                let remaining = (budget - wet_per_pouch * pouch_count).max(0.0);
                let dry_grams = if remaining > 0.0 && dry_per_kg > 0.0 {
                    remaining / dry_per_kg * GRAMS_PER_KG
                } else {
                    0.0
                };

                BudgetSplit {
                    wet_grams: pouch_grams * pouch_count,
                    dry_grams,
                    remaining,
                }
            }
        }
    }
}

struct BudgetSplit {
    wet_grams: f64,
    dry_grams: f64,
    remaining: f64,
}
