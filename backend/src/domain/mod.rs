//! # Domain Module
//!
//! Business logic of the calculator, independent of UI and storage.
//!
//! ## Module Organization
//!
//! - **calculator**: RER/DER, food portions and daily consumption
//! - **calculator_form**: numeric input parsing and weight validation
//! - **profile_service**: saving, editing, listing and summarising cat profiles
//!
//! ## Business Rules
//!
//! - Weight must satisfy 0 < weight <= 45 kg before a calculation or save
//! - Treat calories come off the daily budget before wet/dry food is split
//! - Derived values (RER, DER, portions) are never stored, only recomputed
//! - Saved profiles are listed most recently saved first

pub mod calculator;
pub mod calculator_form;
pub mod profile_service;

pub use calculator::{round_to_tenth, CalculatorService};
pub use calculator_form::{CalculatorFormService, WeightValidationError};
pub use profile_service::ProfileService;
