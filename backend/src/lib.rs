//! # Catculator Backend
//!
//! All non-UI logic of the cat calorie calculator.
//!
//! - **Domain**: energy requirements, food portions, form validation, profiles
//! - **Storage**: the saved profile collection on top of a key-value store
//!
//! ```text
//! UI layer (screens, navigation)
//!     ↓
//! Domain layer (CalculatorService, CalculatorFormService, ProfileService)
//!     ↓
//! Storage layer (ProfileRepository → KeyValueStore)
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod storage;

use anyhow::Result;
use log::info;
use std::sync::Arc;

pub use config::AppConfig;
pub use domain::{CalculatorFormService, CalculatorService, ProfileService, WeightValidationError};
pub use logging::init_logging;
pub use storage::{
    JsonConnection, KeyValueStore, MemoryConnection, ProfileRepository, ProfileStorage,
    ProfileStoreError,
};

/// Services the UI talks to
#[derive(Clone)]
pub struct AppState {
    pub calculator_service: CalculatorService,
    pub calculator_form_service: CalculatorFormService,
    pub profile_service: ProfileService,
}

/// Wire up logging, storage and services from a config
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    config.validate()?;
    init_logging(&config.log_level);

    let store: Arc<dyn KeyValueStore> = if config.in_memory {
        info!("Setting up in-memory profile storage");
        Arc::new(MemoryConnection::new())
    } else {
        let data_directory = config.resolved_data_directory();
        info!("Setting up profile storage in {}", data_directory.display());
        Arc::new(JsonConnection::new(data_directory)?)
    };

    info!("Setting up domain services");
    let calculator_service = CalculatorService::with_config(config.calculator.clone());
    let calculator_form_service = CalculatorFormService::with_config(config.calculator.clone());
    let profile_repository = ProfileRepository::new(store);
    let profile_service = ProfileService::new(Arc::new(profile_repository), calculator_service.clone());

    Ok(AppState {
        calculator_service,
        calculator_form_service,
        profile_service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CatStatus, FoodPortionsRequest, FoodType, SaveProfileRequest};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_calculate_then_save_flow() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_directory: Some(temp_dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let state = initialize_backend(&config).unwrap();

        // Calculator screen
        let validation = state
            .calculator_form_service
            .validate_weight("4", &CatStatus::Neutered);
        assert!(validation.is_valid);
        let energy = state
            .calculator_service
            .energy_requirement(validation.weight, &CatStatus::Neutered);
        assert_eq!(energy.der, 228.0);

        // Food setup screen
        let portions = state.calculator_service.calculate_food_portions(&FoodPortionsRequest {
            der_calories: energy.der,
            food_type: FoodType::Both,
            wet_food_calories_per_pouch: 80.0,
            dry_food_calories_per_kg: 3500.0,
            treat_calories: 0.0,
            pouch_count: 1,
        });
        assert_eq!(portions.wet_food_grams, 85.0);
        assert_eq!(portions.remaining_calories, 148.0);

        // Save and read back through a fresh backend on the same directory
        let saved = state
            .profile_service
            .create_profile(SaveProfileRequest {
                name: "Mochi".to_string(),
                weight: validation.weight,
                cat_status: CatStatus::Neutered,
                food_type: FoodType::Both,
                wet_food_calories: 80.0,
                dry_food_calories_per_kg: 3500.0,
                treat_calories: 0.0,
                pouches: Some(1),
            })
            .await
            .unwrap()
            .profile;

        let reopened = initialize_backend(&config).unwrap();
        let summaries = reopened.profile_service.list_profile_summaries().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].profile, saved);
        assert_eq!(summaries[0].portions, portions);
    }

    #[tokio::test]
    async fn test_in_memory_backend() {
        let config = AppConfig {
            in_memory: true,
            ..AppConfig::default()
        };
        let state = initialize_backend(&config).unwrap();
        assert!(state.profile_service.list_profiles().await.unwrap().profiles.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_backend_installs_logging() {
        let config = AppConfig {
            in_memory: true,
            log_level: "debug".to_string(),
            ..AppConfig::default()
        };
        initialize_backend(&config).unwrap();

        // `log` records are dropped until a logger is installed
        assert!(log::max_level() > log::LevelFilter::Off);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_two_backends_on_one_directory_keep_every_profile() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_directory: Some(temp_dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let first = initialize_backend(&config).unwrap();
        let second = initialize_backend(&config).unwrap();

        let mut handles = Vec::new();
        for (i, state) in [first.clone(), second, first.clone(), first.clone()].into_iter().enumerate() {
            handles.push(tokio::spawn(async move {
                state
                    .profile_service
                    .create_profile(SaveProfileRequest {
                        name: format!("Cat {}", i),
                        weight: 4.0,
                        cat_status: CatStatus::Neutered,
                        food_type: FoodType::Wet,
                        wet_food_calories: 80.0,
                        dry_food_calories_per_kg: 3500.0,
                        treat_calories: 0.0,
                        pouches: None,
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let profiles = first.profile_service.list_profiles().await.unwrap().profiles;
        assert_eq!(profiles.len(), 4);
        let ids: std::collections::HashSet<_> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = AppConfig {
            in_memory: true,
            ..AppConfig::default()
        };
        config.calculator.default_pouches = 0;
        assert!(initialize_backend(&config).is_err());
    }
}
