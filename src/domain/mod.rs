//! Domain module - plan records and the views built over them
//!
//! Plain data types with no I/O: the scraped record, the provider choice,
//! and the explorer's filter/sort model.

pub mod plan_view;
pub mod provider;
pub mod supplier_plan;

// Re-export commonly used items
pub use plan_view::{EnergyPlanView, PlanFilter, PlanSort, PricingType, RawEnergyPlan, SortKey, SortOrder};
pub use provider::{DEFAULT_PROVIDERS, InvalidProvider, UtilityProvider};
pub use supplier_plan::{SignUpLink, SupplierPlan};
