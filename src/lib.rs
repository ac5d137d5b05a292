//! NH energy supplier plan scraper
//!
//! Fetches the state's residential supplier comparison page for each utility
//! provider, extracts one normalized record per plan block and stores the
//! records as JSON. A table view with the filter and sort rules of the plan
//! explorer is available over the stored files.

pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

pub use domain::{SupplierPlan, UtilityProvider};
pub use infrastructure::{AppConfig, SupplierPlanParser};
