//! Supplier plan parser
//!
//! Drives the scanner, the field extractor and the normalizer over a whole
//! comparison page.

use scraper::{ElementRef, Html};
use tracing::{debug, info};

use super::config::{FieldRule, ParsingConfig};
use super::document_scanner::scan;
use super::field_extractor::{extract_anchor, extract_field, extract_labeled, strip_prefix};
use super::markup::CompiledQuery;
use super::plan_normalizer::{RawPlanFields, normalize};
use super::{ContextualParser, ParsingResult};
use crate::domain::{SupplierPlan, UtilityProvider};

/// Context of one parse run, used for diagnostics only.
#[derive(Debug, Clone, Default)]
pub struct PlanParseContext {
    pub provider: Option<UtilityProvider>,
    pub source: Option<String>,
}

impl PlanParseContext {
    pub fn new(provider: UtilityProvider, source: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            source: Some(source.into()),
        }
    }

    fn label(&self) -> String {
        match (&self.provider, &self.source) {
            (Some(provider), _) => provider.to_string(),
            (None, Some(source)) => source.clone(),
            (None, None) => "document".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    query: CompiledQuery,
    label: Option<String>,
}

impl CompiledRule {
    fn compile(rule: &FieldRule) -> ParsingResult<Self> {
        Ok(Self {
            query: rule.query.compile()?,
            label: rule.label.clone(),
        })
    }

    fn extract(&self, block: &ElementRef<'_>) -> Option<String> {
        extract_labeled(block, &self.query, self.label.as_deref())
    }

    /// Like `extract`, but an element with blank text counts as missing.
    /// A bare label still yields an empty string.
    fn extract_non_blank(&self, block: &ElementRef<'_>) -> Option<String> {
        let text = extract_field(block, &self.query).filter(|text| !text.is_empty());
        match self.label.as_deref() {
            Some(label) => strip_prefix(text.as_deref(), label),
            None => text,
        }
    }
}

/// Parser for the plan blocks of a comparison page
#[derive(Debug, Clone)]
pub struct SupplierPlanParser {
    plan_block: CompiledQuery,
    supplier_name: CompiledRule,
    plan_name: CompiledRule,
    price_per_kwh: CompiledRule,
    last_updated: CompiledRule,
    pricing_type: CompiledRule,
    monthly_charge: CompiledRule,
    intro_price: CompiledRule,
    cancellation_fee: CompiledRule,
    renewable: CompiledRule,
    rate_good_for: CompiledRule,
    rate_end: CompiledRule,
    comments: CompiledRule,
    sign_up_link: CompiledQuery,
}

impl SupplierPlanParser {
    /// Parser with the selectors of the live comparison page
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Compile every configured selector up front; a bad selector is a
    /// configuration error, not a per-page one.
    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let fields = &config.fields;
        Ok(Self {
            plan_block: config.plan_block.compile()?,
            supplier_name: CompiledRule::compile(&fields.supplier_name)?,
            plan_name: CompiledRule::compile(&fields.plan_name)?,
            price_per_kwh: CompiledRule::compile(&fields.price_per_kwh)?,
            last_updated: CompiledRule::compile(&fields.last_updated)?,
            pricing_type: CompiledRule::compile(&fields.pricing_type)?,
            monthly_charge: CompiledRule::compile(&fields.monthly_charge)?,
            intro_price: CompiledRule::compile(&fields.intro_price)?,
            cancellation_fee: CompiledRule::compile(&fields.cancellation_fee)?,
            renewable: CompiledRule::compile(&fields.renewable)?,
            rate_good_for: CompiledRule::compile(&fields.rate_good_for)?,
            rate_end: CompiledRule::compile(&fields.rate_end)?,
            comments: CompiledRule::compile(&fields.comments)?,
            sign_up_link: fields.sign_up_link.compile()?,
        })
    }

    /// Parse raw markup with an anonymous context.
    pub fn parse_document(&self, html: &str) -> Vec<SupplierPlan> {
        let document = Html::parse_document(html);
        self.plans_in(&document, &PlanParseContext::default())
    }

    fn extract_block(&self, block: &ElementRef<'_>) -> RawPlanFields {
        RawPlanFields {
            supplier_name: self.supplier_name.extract(block),
            plan_name: self.plan_name.extract(block),
            price_per_kwh: self.price_per_kwh.extract(block),
            last_updated: self.last_updated.extract(block),
            pricing_type: self.pricing_type.extract(block),
            monthly_charge: self.monthly_charge.extract(block),
            intro_price: self.intro_price.extract(block),
            cancellation_fee: self.cancellation_fee.extract(block),
            renewable: self.renewable.extract(block),
            rate_good_for: self.rate_good_for.extract(block),
            rate_end: self.rate_end.extract(block),
            comments: self.comments.extract_non_blank(block),
            link: extract_anchor(block, &self.sign_up_link),
        }
    }

    fn plans_in(&self, document: &Html, context: &PlanParseContext) -> Vec<SupplierPlan> {
        let blocks = scan(document, &self.plan_block);
        if blocks.is_empty() {
            info!(
                "No plan blocks matching '{}' found for {}",
                self.plan_block.css(),
                context.label()
            );
            return Vec::new();
        }

        debug!("Found {} plan blocks for {}", blocks.len(), context.label());
        blocks
            .iter()
            .map(|block| normalize(self.extract_block(block)))
            .collect()
    }
}

impl ContextualParser for SupplierPlanParser {
    type Output = Vec<SupplierPlan>;
    type Context = PlanParseContext;

    /// One record per plan block, in document order. Missing or malformed
    /// fields fall back to defaults, so this never fails on page content.
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        Ok(self.plans_in(html, context))
    }
}
