//! HTML parsing infrastructure for supplier plan pages
//!
//! Trait-based parsing: a page goes through the document scanner, each plan
//! block through the field extractor, and the extracted strings through the
//! plan normalizer.

pub mod config;
pub mod document_scanner;
pub mod field_extractor;
pub mod markup;
pub mod plan_normalizer;
pub mod supplier_plan_parser;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use config::{FieldRule, ParsingConfig, PlanFieldRules};
pub use markup::{CompiledQuery, ElementQuery, MarkupNode};
pub use plan_normalizer::{RawPlanFields, normalize};
pub use supplier_plan_parser::{PlanParseContext, SupplierPlanParser};

use scraper::Html;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}
