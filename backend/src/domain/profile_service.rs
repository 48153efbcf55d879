use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use super::calculator::CalculatorService;
use super::calculator_form::WeightValidationError;
use crate::storage::ProfileStorage;
use shared::{
    CatProfile, FoodPortionsRequest, ProfileListResponse, ProfileResponse, ProfileSummary,
    SaveProfileRequest,
};

/// Service for saving, editing and listing cat profiles
#[derive(Clone)]
pub struct ProfileService {
    storage: Arc<dyn ProfileStorage>,
    calculator: CalculatorService,
}

impl ProfileService {
    pub fn new(storage: Arc<dyn ProfileStorage>, calculator: CalculatorService) -> Self {
        Self { storage, calculator }
    }

    /// Save a new profile. The ID is the current epoch millis, bumped if a
    /// profile with that ID already exists.
    pub async fn create_profile(&self, request: SaveProfileRequest) -> Result<ProfileResponse> {
        info!("Creating profile: name={}, weight={}", request.name.trim(), request.weight);

        self.validate_request(&request)?;

        let now_millis = Utc::now().timestamp_millis();
        let draft = self.build_profile(String::new(), request, now_millis);

        // The ID is picked under the store's lock, against the collection it is appended to
        let profile = self
            .storage
            .create_profile(Box::new(move |existing: &[CatProfile]| {
                let taken: HashSet<&str> = existing.iter().map(|p| p.id.as_str()).collect();

                let mut id_millis = now_millis.max(0) as u64;
                while taken.contains(CatProfile::generate_id(id_millis).as_str()) {
                    id_millis += 1;
                }

                CatProfile {
                    id: CatProfile::generate_id(id_millis),
                    ..draft
                }
            }))
            .await?;

        info!("Created profile {} with ID {}", profile.display_name(), profile.id);

        Ok(ProfileResponse {
            profile,
            success_message: "Profile saved successfully".to_string(),
        })
    }

    /// Overwrite an existing profile, keeping its ID and refreshing `savedAt`.
    /// Returns `None` when no profile has this ID; storage is left unchanged.
    pub async fn update_profile(
        &self,
        profile_id: &str,
        request: SaveProfileRequest,
    ) -> Result<Option<ProfileResponse>> {
        info!("Updating profile: {}", profile_id);

        self.validate_request(&request)?;

        let profile = self.build_profile(profile_id.to_string(), request, Utc::now().timestamp_millis());

        if !self.storage.update_profile(profile_id, &profile).await? {
            warn!("Profile not found for update: {}", profile_id);
            return Ok(None);
        }

        info!("Updated profile {} with ID {}", profile.display_name(), profile.id);

        Ok(Some(ProfileResponse {
            profile,
            success_message: "Profile updated successfully".to_string(),
        }))
    }

    /// Delete a profile. Returns false if it did not exist.
    pub async fn delete_profile(&self, profile_id: &str) -> Result<bool> {
        info!("Deleting profile: {}", profile_id);

        let deleted = self.storage.delete_profile(profile_id).await?;
        if !deleted {
            warn!("Profile not found for delete: {}", profile_id);
        }

        Ok(deleted)
    }

    pub async fn get_profile(&self, profile_id: &str) -> Result<Option<CatProfile>> {
        let profiles = self.storage.list_profiles().await?;
        Ok(profiles.into_iter().find(|p| p.id == profile_id))
    }

    /// All profiles, most recently saved first
    pub async fn list_profiles(&self) -> Result<ProfileListResponse> {
        let mut profiles = self.storage.list_profiles().await?;
        profiles.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));

        info!("Found {} profiles", profiles.len());

        Ok(ProfileListResponse { profiles })
    }

    /// List view data: every profile with energy and portions re-derived
    pub async fn list_profile_summaries(&self) -> Result<Vec<ProfileSummary>> {
        let response = self.list_profiles().await?;
        Ok(response
            .profiles
            .into_iter()
            .map(|p| self.profile_summary(p))
            .collect())
    }

    /// Re-derive RER, DER, portions and consumption from a profile's raw inputs
    pub fn profile_summary(&self, profile: CatProfile) -> ProfileSummary {
        let energy = self
            .calculator
            .energy_requirement(profile.weight, &profile.cat_status);

        let request = FoodPortionsRequest {
            der_calories: self
                .calculator
                .calculate_der(self.calculator.calculate_rer(profile.weight), &profile.cat_status),
            food_type: profile.food_type,
            wet_food_calories_per_pouch: profile.wet_food_calories,
            dry_food_calories_per_kg: profile.dry_food_calories_per_kg,
            treat_calories: profile.treat_calories,
            pouch_count: profile.pouch_count(),
        };

        ProfileSummary {
            display_name: profile.display_name().to_string(),
            portions: self.calculator.calculate_food_portions(&request),
            consumption: self.calculator.calculate_consumption(&request),
            energy,
            profile,
        }
    }

    fn build_profile(&self, id: String, request: SaveProfileRequest, saved_at: i64) -> CatProfile {
        CatProfile {
            id,
            name: request.name.trim().to_string(),
            weight: request.weight,
            cat_status: request.cat_status,
            food_type: request.food_type,
            wet_food_calories: request.wet_food_calories,
            dry_food_calories_per_kg: request.dry_food_calories_per_kg,
            treat_calories: request.treat_calories,
            pouches: Some(
                request
                    .pouches
                    .unwrap_or(self.calculator.config().default_pouches)
                    .max(1),
            ),
            saved_at,
        }
    }

    /// Profiles are only persisted with a usable weight
    fn validate_request(&self, request: &SaveProfileRequest) -> Result<()> {
        if !request.weight.is_finite() || request.weight <= 0.0 {
            return Err(WeightValidationError::NotPositive.into());
        }

        let max_weight = self.calculator.config().max_weight_kg;
        if request.weight > max_weight {
            return Err(WeightValidationError::TooHeavy(max_weight).into());
        }

        Ok(())
    }
}
