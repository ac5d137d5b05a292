//! Table view over stored plan records
//!
//! Stored files are read leniently (every field optional) and normalized into
//! display rows, which can then be filtered and sorted the way the plan
//! explorer table does it.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TERM_MONTHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*months?").expect("term pattern is valid"));

/// A plan record as found in a stored JSON file.
///
/// Files written by other tools may carry `null` for any field, so nothing
/// here is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEnergyPlan {
    pub supplier_name: Option<String>,
    pub plan_name: Option<String>,
    pub price_per_kwh: Option<f64>,
    pub last_updated: Option<String>,
    pub pricing_type: Option<String>,
    pub is_monthly_charge: Option<bool>,
    pub is_intro_price: Option<bool>,
    pub has_cancellation_fee: Option<bool>,
    pub percent_renewable: Option<f64>,
    pub rate_is_good_for: Option<String>,
    pub rate_end: Option<String>,
    pub comments: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingType {
    Fixed,
    Variable,
    Unknown,
}

impl PricingType {
    fn from_source(value: Option<&str>) -> Self {
        match value {
            Some("Fixed") => Self::Fixed,
            Some("Variable") => Self::Variable,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PricingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fixed => "Fixed",
            Self::Variable => "Variable",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// A plan row ready for display, with every gap filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyPlanView {
    pub supplier_name: String,
    pub plan_name: String,
    /// Kept optional so that a missing price never sorts as the cheapest.
    pub price_per_kwh: Option<f64>,
    pub last_updated: Option<NaiveDate>,
    pub pricing_type: PricingType,
    pub is_monthly_charge: bool,
    pub is_intro_price: bool,
    pub has_cancellation_fee: bool,
    pub percent_renewable: f64,
    pub rate_is_good_for: String,
    pub rate_is_good_for_months: u32,
    pub rate_end: String,
    pub comments: String,
    pub link: Option<String>,
}

impl EnergyPlanView {
    /// Normalize a stored record; `index` is its zero-based position in the file.
    pub fn from_raw(index: usize, raw: &RawEnergyPlan) -> Self {
        let rate_is_good_for = non_empty(raw.rate_is_good_for.as_deref()).unwrap_or_default();

        Self {
            supplier_name: non_empty(raw.supplier_name.as_deref())
                .unwrap_or_else(|| format!("Unknown Supplier {}", index + 1)),
            plan_name: non_empty(raw.plan_name.as_deref())
                .unwrap_or_else(|| format!("Unnamed Plan {}", index + 1)),
            price_per_kwh: raw.price_per_kwh,
            last_updated: raw.last_updated.as_deref().and_then(parse_stored_date),
            pricing_type: PricingType::from_source(raw.pricing_type.as_deref()),
            is_monthly_charge: raw.is_monthly_charge.unwrap_or(false),
            is_intro_price: raw.is_intro_price.unwrap_or(false),
            has_cancellation_fee: raw.has_cancellation_fee.unwrap_or(false),
            percent_renewable: raw.percent_renewable.unwrap_or(0.0),
            rate_is_good_for_months: term_months(&rate_is_good_for),
            rate_is_good_for,
            rate_end: non_empty(raw.rate_end.as_deref()).unwrap_or_default(),
            comments: non_empty(raw.comments.as_deref()).unwrap_or_default(),
            link: non_empty(raw.link.as_deref()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Contract length in months from text like "12 months"; 0 when absent.
pub fn term_months(rate_is_good_for: &str) -> u32 {
    TERM_MONTHS
        .captures(rate_is_good_for)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn parse_stored_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Filter criteria for the plan table. `None` means "any".
#[derive(Debug, Clone, PartialEq)]
pub struct PlanFilter {
    pub supplier_name: Option<String>,
    pub pricing_type: Option<PricingType>,
    /// Inclusive bounds.
    pub renewable_range: (f64, f64),
    pub has_cancellation_fee: Option<bool>,
    pub is_monthly_charge: Option<bool>,
}

impl Default for PlanFilter {
    fn default() -> Self {
        Self {
            supplier_name: None,
            pricing_type: None,
            renewable_range: (0.0, 100.0),
            has_cancellation_fee: None,
            is_monthly_charge: None,
        }
    }
}

impl PlanFilter {
    pub fn matches(&self, plan: &EnergyPlanView) -> bool {
        if let Some(needle) = self.supplier_name.as_deref().filter(|s| !s.is_empty()) {
            if !plan
                .supplier_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if self.pricing_type.is_some_and(|t| t != plan.pricing_type) {
            return false;
        }
        let (min, max) = self.renewable_range;
        if plan.percent_renewable < min || plan.percent_renewable > max {
            return false;
        }
        if self
            .has_cancellation_fee
            .is_some_and(|fee| fee != plan.has_cancellation_fee)
        {
            return false;
        }
        if self
            .is_monthly_charge
            .is_some_and(|charge| charge != plan.is_monthly_charge)
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Supplier,
    Price,
    Renewable,
    Term,
    Updated,
}

impl SortKey {
    /// Direction applied when a column is first selected.
    pub fn default_order(self) -> SortOrder {
        match self {
            Self::Renewable => SortOrder::Descending,
            Self::Supplier | Self::Price | Self::Term | Self::Updated => SortOrder::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for PlanSort {
    fn default() -> Self {
        Self {
            key: SortKey::Price,
            order: SortOrder::Ascending,
        }
    }
}

impl PlanSort {
    pub fn by(key: SortKey) -> Self {
        Self {
            key,
            order: key.default_order(),
        }
    }

    pub fn compare(&self, a: &EnergyPlanView, b: &EnergyPlanView) -> Ordering {
        let primary = match self.key {
            SortKey::Supplier => self.order.apply(
                a.supplier_name
                    .to_lowercase()
                    .cmp(&b.supplier_name.to_lowercase()),
            ),
            SortKey::Price => compare_missing_last(a.price_per_kwh, b.price_per_kwh, self.order),
            SortKey::Renewable => self
                .order
                .apply(a.percent_renewable.total_cmp(&b.percent_renewable)),
            SortKey::Term => self
                .order
                .apply(a.rate_is_good_for_months.cmp(&b.rate_is_good_for_months)),
            SortKey::Updated => compare_missing_first(a.last_updated, b.last_updated, self.order),
        };

        primary.then_with(|| {
            compare_missing_last(a.price_per_kwh, b.price_per_kwh, SortOrder::Ascending)
        })
    }
}

fn compare_missing_last(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => order.apply(a.total_cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_missing_first<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => order.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Normalize, filter, and sort stored records. The sort is stable, so rows
/// that compare equal keep their file order.
pub fn explore(raw_plans: &[RawEnergyPlan], filter: &PlanFilter, sort: PlanSort) -> Vec<EnergyPlanView> {
    let mut plans: Vec<EnergyPlanView> = raw_plans
        .iter()
        .enumerate()
        .map(|(index, raw)| EnergyPlanView::from_raw(index, raw))
        .filter(|plan| filter.matches(plan))
        .collect();
    plans.sort_by(|a, b| sort.compare(a, b));
    plans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(supplier: &str, price: Option<f64>) -> RawEnergyPlan {
        RawEnergyPlan {
            supplier_name: Some(supplier.to_string()),
            price_per_kwh: price,
            ..RawEnergyPlan::default()
        }
    }

    fn suppliers(plans: &[EnergyPlanView]) -> Vec<&str> {
        plans.iter().map(|p| p.supplier_name.as_str()).collect()
    }

    #[test]
    fn test_view_fills_gaps() {
        let view = EnergyPlanView::from_raw(2, &RawEnergyPlan::default());
        assert_eq!(view.supplier_name, "Unknown Supplier 3");
        assert_eq!(view.plan_name, "Unnamed Plan 3");
        assert_eq!(view.pricing_type, PricingType::Unknown);
        assert_eq!(view.price_per_kwh, None);
        assert_eq!(view.percent_renewable, 0.0);
        assert_eq!(view.rate_is_good_for_months, 0);
        assert!(!view.has_cancellation_fee);
        assert!(view.link.is_none());
    }

    #[test]
    fn test_term_months_parsing() {
        assert_eq!(term_months("12 months"), 12);
        assert_eq!(term_months("1 Month"), 1);
        assert_eq!(term_months("24months, then variable"), 24);
        assert_eq!(term_months("Month to month"), 0);
        assert_eq!(term_months(""), 0);
    }

    #[test]
    fn test_stored_dates_accept_both_shapes() {
        assert_eq!(parse_stored_date("2025-05-01"), NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(
            parse_stored_date("2025-05-01T04:00:00.000Z"),
            NaiveDate::from_ymd_opt(2025, 5, 1)
        );
        assert_eq!(parse_stored_date("Invalid Date"), None);
    }

    #[test]
    fn test_missing_price_sorts_last_both_ways() {
        let plans = vec![raw("A", None), raw("B", Some(0.2)), raw("C", Some(0.1))];
        let asc = explore(&plans, &PlanFilter::default(), PlanSort::by(SortKey::Price));
        assert_eq!(suppliers(&asc), ["C", "B", "A"]);

        let desc = explore(
            &plans,
            &PlanFilter::default(),
            PlanSort {
                key: SortKey::Price,
                order: SortOrder::Descending,
            },
        );
        assert_eq!(suppliers(&desc), ["B", "C", "A"]);
    }

    #[test]
    fn test_renewable_defaults_descending_with_price_tiebreak() {
        let mut plans = vec![raw("A", Some(0.3)), raw("B", Some(0.1)), raw("C", Some(0.2))];
        plans[0].percent_renewable = Some(50.0);
        plans[1].percent_renewable = Some(10.0);
        plans[2].percent_renewable = Some(50.0);

        let sorted = explore(&plans, &PlanFilter::default(), PlanSort::by(SortKey::Renewable));
        assert_eq!(suppliers(&sorted), ["C", "A", "B"]);
    }

    #[test]
    fn test_filters_combine() {
        let mut plans = vec![
            raw("Acme Energy", Some(0.1)),
            raw("Budget Power", Some(0.2)),
            raw("acme green", Some(0.3)),
        ];
        plans[0].pricing_type = Some("Fixed".to_string());
        plans[2].pricing_type = Some("Variable".to_string());
        plans[2].has_cancellation_fee = Some(true);

        let filter = PlanFilter {
            supplier_name: Some("ACME".to_string()),
            ..PlanFilter::default()
        };
        let found = explore(&plans, &filter, PlanSort::default());
        assert_eq!(suppliers(&found), ["Acme Energy", "acme green"]);

        let filter = PlanFilter {
            supplier_name: Some("acme".to_string()),
            pricing_type: Some(PricingType::Variable),
            has_cancellation_fee: Some(true),
            ..PlanFilter::default()
        };
        let found = explore(&plans, &filter, PlanSort::default());
        assert_eq!(suppliers(&found), ["acme green"]);
    }

    #[test]
    fn test_renewable_range_is_inclusive() {
        let mut plans = vec![raw("A", None), raw("B", None), raw("C", None)];
        plans[0].percent_renewable = Some(20.0);
        plans[1].percent_renewable = Some(50.0);
        plans[2].percent_renewable = Some(51.0);

        let filter = PlanFilter {
            renewable_range: (20.0, 50.0),
            ..PlanFilter::default()
        };
        let found = explore(&plans, &filter, PlanSort::by(SortKey::Supplier));
        assert_eq!(suppliers(&found), ["A", "B"]);
    }

    #[test]
    fn test_missing_date_sorts_first() {
        let mut plans = vec![raw("A", None), raw("B", None), raw("C", None)];
        plans[0].last_updated = Some("2025-03-01".to_string());
        plans[2].last_updated = Some("2025-01-01".to_string());

        let asc = explore(&plans, &PlanFilter::default(), PlanSort::by(SortKey::Updated));
        assert_eq!(suppliers(&asc), ["B", "C", "A"]);

        let desc = explore(
            &plans,
            &PlanFilter::default(),
            PlanSort {
                key: SortKey::Updated,
                order: SortOrder::Descending,
            },
        );
        assert_eq!(suppliers(&desc), ["B", "A", "C"]);
    }
}
