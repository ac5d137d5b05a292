//! Parsing configuration for plan extraction
//!
//! Centralized selectors and label prefixes. Defaults match the markup of
//! the residential comparison page.

use serde::{Deserialize, Serialize};

use super::markup::ElementQuery;
use super::{ParsingError, ParsingResult};
use crate::infrastructure::config::nh_ceps;

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Container of one plan
    pub plan_block: ElementQuery,

    /// Per-field selectors and label prefixes
    pub fields: PlanFieldRules,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            plan_block: ElementQuery::class(nh_ceps::PLAN_BLOCK_CLASS),
            fields: PlanFieldRules::default(),
        }
    }
}

impl ParsingConfig {
    /// Every query must compile, and the plan block query must not be blank.
    pub fn validate(&self) -> ParsingResult<()> {
        if self.plan_block.to_css().trim().is_empty() {
            return Err(ParsingError::configuration(
                "plan_block",
                "plan block selector is empty",
            ));
        }
        self.plan_block.compile()?;
        for rule in self.fields.rules() {
            rule.query.compile()?;
        }
        self.fields.sign_up_link.compile()?;
        Ok(())
    }
}

/// Where a field lives inside a plan block and which label precedes its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub query: ElementQuery,
    #[serde(default)]
    pub label: Option<String>,
}

impl FieldRule {
    pub fn new(query: ElementQuery) -> Self {
        Self { query, label: None }
    }

    pub fn labeled(query: ElementQuery, label: &str) -> Self {
        Self {
            query,
            label: Some(label.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanFieldRules {
    pub supplier_name: FieldRule,
    pub plan_name: FieldRule,
    pub price_per_kwh: FieldRule,
    pub last_updated: FieldRule,
    pub pricing_type: FieldRule,
    pub monthly_charge: FieldRule,
    pub intro_price: FieldRule,
    pub cancellation_fee: FieldRule,
    pub renewable: FieldRule,
    pub rate_good_for: FieldRule,
    pub rate_end: FieldRule,
    pub comments: FieldRule,
    /// Anchor whose `href` is the sign-up link
    pub sign_up_link: ElementQuery,
}

impl PlanFieldRules {
    fn rules(&self) -> [&FieldRule; 12] {
        [
            &self.supplier_name,
            &self.plan_name,
            &self.price_per_kwh,
            &self.last_updated,
            &self.pricing_type,
            &self.monthly_charge,
            &self.intro_price,
            &self.cancellation_fee,
            &self.renewable,
            &self.rate_good_for,
            &self.rate_end,
            &self.comments,
        ]
    }
}

impl Default for PlanFieldRules {
    fn default() -> Self {
        Self {
            supplier_name: FieldRule::new(ElementQuery::class_descendant("CompanyName", "b")),
            plan_name: FieldRule::new(ElementQuery::class("PlanName")),
            price_per_kwh: FieldRule::labeled(
                ElementQuery::attribute_prefix("span", "id", nh_ceps::PRICE_ID_PREFIX),
                "Per KWh: $",
            ),
            last_updated: FieldRule::labeled(
                ElementQuery::attribute_prefix("span", "id", nh_ceps::LAST_UPDATE_ID_PREFIX),
                "Last Update:",
            ),
            pricing_type: FieldRule::labeled(ElementQuery::class("Pricing"), "Pricing:"),
            monthly_charge: FieldRule::labeled(
                ElementQuery::class("MonthlyFee"),
                "Monthly Charge:",
            ),
            intro_price: FieldRule::labeled(ElementQuery::class("IntroPrice"), "Intro Price:"),
            cancellation_fee: FieldRule::labeled(
                ElementQuery::class("CancellationFee"),
                "Cancellation Fee:",
            ),
            renewable: FieldRule::labeled(
                ElementQuery::class("RenewableEnergy"),
                "Renewable Energy:",
            ),
            rate_good_for: FieldRule::labeled(ElementQuery::class("RateGoodFor"), "Rate Good for:"),
            rate_end: FieldRule::labeled(ElementQuery::class("RateEnd"), "Rate End:"),
            comments: FieldRule::labeled(ElementQuery::class("Comments"), "Comments:"),
            sign_up_link: ElementQuery::accessible_label("a", nh_ceps::SIGN_UP_LABEL),
        }
    }
}
