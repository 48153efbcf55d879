use serde::{Deserialize, Serialize};
use std::fmt;

/// Life stage / lifestyle of a cat, used to pick the energy multiplier.
///
/// Stored as a plain string tag (`"kitten_young"`, `"neutered"`, ...). Tags that
/// are not one of the six known statuses are kept verbatim in
/// [`CatStatus::Unrecognized`] so they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CatStatus {
    /// Kitten younger than 4 months
    KittenYoung,
    /// Kitten between 4 and 12 months
    KittenOld,
    /// Neutered adult (standard indoor cat)
    Neutered,
    /// Intact adult
    Intact,
    /// Inactive cat or weight management
    Inactive,
    /// Active, high energy cat
    Active,
    /// Any tag we don't know about
    Unrecognized(String),
}

impl CatStatus {
    /// The six known statuses in display order
    pub fn all() -> [CatStatus; 6] {
        [
            CatStatus::KittenYoung,
            CatStatus::KittenOld,
            CatStatus::Neutered,
            CatStatus::Intact,
            CatStatus::Inactive,
            CatStatus::Active,
        ]
    }

    /// Storage tag for this status
    pub fn as_str(&self) -> &str {
        match self {
            CatStatus::KittenYoung => "kitten_young",
            CatStatus::KittenOld => "kitten_old",
            CatStatus::Neutered => "neutered",
            CatStatus::Intact => "intact",
            CatStatus::Inactive => "inactive",
            CatStatus::Active => "active",
            CatStatus::Unrecognized(tag) => tag,
        }
    }

    /// Short label shown in the status picker
    pub fn label(&self) -> &str {
        match self {
            CatStatus::KittenYoung => "Kitten <4mo",
            CatStatus::KittenOld => "Kitten 4-12mo",
            CatStatus::Neutered => "Neutered",
            CatStatus::Intact => "Intact",
            CatStatus::Inactive => "Inactive",
            CatStatus::Active => "Active",
            CatStatus::Unrecognized(_) => "Unknown",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            CatStatus::KittenYoung => "Rapid growth phase",
            CatStatus::KittenOld => "Late growth phase",
            CatStatus::Neutered => "Standard indoor cat",
            CatStatus::Intact => "Non-neutered adult",
            CatStatus::Inactive => "Weight management",
            CatStatus::Active => "High energy level",
            CatStatus::Unrecognized(_) => "",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, CatStatus::Unrecognized(_))
    }
}

impl From<&str> for CatStatus {
    fn from(tag: &str) -> Self {
        match tag {
            "kitten_young" => CatStatus::KittenYoung,
            "kitten_old" => CatStatus::KittenOld,
            "neutered" => CatStatus::Neutered,
            "intact" => CatStatus::Intact,
            "inactive" => CatStatus::Inactive,
            "active" => CatStatus::Active,
            other => CatStatus::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for CatStatus {
    fn from(tag: String) -> Self {
        match CatStatus::from(tag.as_str()) {
            CatStatus::Unrecognized(_) => CatStatus::Unrecognized(tag),
            known => known,
        }
    }
}

impl From<CatStatus> for String {
    fn from(status: CatStatus) -> Self {
        match status {
            CatStatus::Unrecognized(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which food sources make up the daily diet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    /// Wet food only
    Wet,
    /// Dry food only
    Dry,
    /// Fixed number of wet pouches, dry food covers the rest
    Both,
}

impl FoodType {
    pub fn label(&self) -> &'static str {
        match self {
            FoodType::Wet => "Wet Only",
            FoodType::Dry => "Dry Only",
            FoodType::Both => "Both",
        }
    }
}

impl Default for FoodType {
    fn default() -> Self {
        FoodType::Both
    }
}

/// A saved cat profile. Only raw inputs are stored; RER, DER and portions are
/// re-derived whenever the profile is displayed.
///
/// Profile ID is the epoch millis at creation time, e.g. "1702516122000"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatProfile {
    pub id: String,
    /// Display name, may be empty
    pub name: String,
    /// Body weight in kg
    pub weight: f64,
    pub cat_status: CatStatus,
    pub food_type: FoodType,
    /// kcal per wet food pouch
    pub wet_food_calories: f64,
    /// kcal per kg of dry food
    pub dry_food_calories_per_kg: f64,
    /// kcal per day from treats
    pub treat_calories: f64,
    /// Wet pouches per day; absent in older records, which means one pouch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pouches: Option<u32>,
    /// Creation/update time in epoch millis
    pub saved_at: i64,
}

impl CatProfile {
    /// Generate a profile ID from a timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        epoch_millis.to_string()
    }

    /// Parse a profile ID back into its timestamp
    pub fn parse_id(id: &str) -> Result<u64, ProfileIdError> {
        if id.is_empty() {
            return Err(ProfileIdError::Empty);
        }
        id.parse::<u64>().map_err(|_| ProfileIdError::InvalidTimestamp)
    }

    /// Number of wet pouches per day, defaulting to one
    pub fn pouch_count(&self) -> u32 {
        self.pouches.unwrap_or(1)
    }

    /// Name to show in lists
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Unnamed Cat"
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileIdError {
    Empty,
    InvalidTimestamp,
}

impl fmt::Display for ProfileIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileIdError::Empty => write!(f, "Profile ID is empty"),
            ProfileIdError::InvalidTimestamp => write!(f, "Invalid timestamp in profile ID"),
        }
    }
}

impl std::error::Error for ProfileIdError {}

/// Daily food portions for a calorie budget. All quantities rounded to 0.1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPortions {
    pub wet_food_grams: f64,
    pub dry_food_grams: f64,
    /// Calories left for dry food after wet food and treats
    pub remaining_calories: f64,
    /// Wet food expressed in reference pouches
    pub pouches: f64,
}

/// Breakdown of what the cat actually eats per day against the DER target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSummary {
    pub wet_food_calories: f64,
    pub dry_food_calories: f64,
    pub treat_calories: f64,
    pub total_calories: f64,
    /// DER minus total, negative when over budget
    pub remaining_calories: f64,
    pub is_over_budget: bool,
}

/// RER/DER result handed from the calculator screen to the results screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyRequirement {
    pub weight: f64,
    pub cat_status: CatStatus,
    pub rer: f64,
    pub der: f64,
    pub multiplier: f64,
}

/// Inputs to a portion calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPortionsRequest {
    pub der_calories: f64,
    pub food_type: FoodType,
    pub wet_food_calories_per_pouch: f64,
    pub dry_food_calories_per_kg: f64,
    pub treat_calories: f64,
    pub pouch_count: u32,
}

/// Everything the saved profiles list shows for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub profile: CatProfile,
    pub display_name: String,
    pub energy: EnergyRequirement,
    pub portions: FoodPortions,
    pub consumption: ConsumptionSummary,
}

/// Result of validating the weight input field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightValidation {
    pub is_valid: bool,
    pub weight: f64,
    pub error_message: Option<String>,
    pub hint: String,
}

/// Constants used by the calculator and the input forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Mass of one reference wet food pouch in grams
    pub pouch_grams: f64,
    pub default_wet_food_calories: f64,
    pub default_dry_food_calories_per_kg: f64,
    pub default_treat_calories: f64,
    pub default_pouches: u32,
    /// Upper bound accepted by weight validation
    pub max_weight_kg: f64,
    /// Below this weight the allometric RER formula is used
    pub small_cat_threshold_kg: f64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            pouch_grams: 85.0,
            default_wet_food_calories: 80.0,
            default_dry_food_calories_per_kg: 3500.0,
            default_treat_calories: 0.0,
            default_pouches: 1,
            max_weight_kg: 45.0,
            small_cat_threshold_kg: 2.0,
        }
    }
}

/// Prefill values for the food setup form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodFormDefaults {
    pub food_type: FoodType,
    pub wet_food_calories: f64,
    pub dry_food_calories_per_kg: f64,
    pub treat_calories: f64,
    pub pouches: u32,
    /// Set when editing an existing profile
    pub profile_id: Option<String>,
    pub profile_name: Option<String>,
}

impl FoodFormDefaults {
    /// Prefill for a brand new calculation
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            food_type: FoodType::default(),
            wet_food_calories: config.default_wet_food_calories,
            dry_food_calories_per_kg: config.default_dry_food_calories_per_kg,
            treat_calories: config.default_treat_calories,
            pouches: config.default_pouches,
            profile_id: None,
            profile_name: None,
        }
    }

    /// Prefill for editing a saved profile
    pub fn for_profile(profile: &CatProfile) -> Self {
        Self {
            food_type: profile.food_type,
            wet_food_calories: profile.wet_food_calories,
            dry_food_calories_per_kg: profile.dry_food_calories_per_kg,
            treat_calories: profile.treat_calories,
            pouches: profile.pouch_count(),
            profile_id: Some(profile.id.clone()),
            profile_name: Some(profile.name.clone()),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.profile_id.is_some()
    }
}

/// Request to save a new profile or overwrite an existing one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub name: String,
    pub weight: f64,
    pub cat_status: CatStatus,
    pub food_type: FoodType,
    pub wet_food_calories: f64,
    pub dry_food_calories_per_kg: f64,
    pub treat_calories: f64,
    pub pouches: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: CatProfile,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileListResponse {
    /// Most recently saved first
    pub profiles: Vec<CatProfile>,
}
