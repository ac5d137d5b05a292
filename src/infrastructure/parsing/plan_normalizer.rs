//! Plan normalizer
//!
//! Turns the label-stripped strings pulled from one plan block into a typed
//! [`SupplierPlan`]. Every coercion falls back to a per-field default; no
//! field can fail the record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{SignUpLink, SupplierPlan};

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("float pattern is valid")
});
static TRAILING_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*%$").expect("percent pattern is valid"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));

const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];
const DATE_TIME_FORMATS: [&str; 3] = [
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
];

/// Label-stripped field text of one plan block; `None` where the element was
/// not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPlanFields {
    pub supplier_name: Option<String>,
    pub plan_name: Option<String>,
    pub price_per_kwh: Option<String>,
    pub last_updated: Option<String>,
    pub pricing_type: Option<String>,
    pub monthly_charge: Option<String>,
    pub intro_price: Option<String>,
    pub cancellation_fee: Option<String>,
    pub renewable: Option<String>,
    pub rate_good_for: Option<String>,
    pub rate_end: Option<String>,
    pub comments: Option<String>,
    pub link: SignUpLink,
}

pub fn normalize(raw: RawPlanFields) -> SupplierPlan {
    SupplierPlan {
        supplier_name: raw.supplier_name,
        plan_name: raw.plan_name,
        pricing_type: raw.pricing_type,
        is_intro_price: is_yes(raw.intro_price.as_deref()),
        has_cancellation_fee: !is_no(raw.cancellation_fee.as_deref()),
        price_per_kwh: raw
            .price_per_kwh
            .as_deref()
            .and_then(parse_float_prefix)
            .unwrap_or(0.0),
        last_updated: raw.last_updated.as_deref().and_then(parse_plan_date),
        percent_renewable: raw.renewable.as_deref().and_then(parse_renewable),
        is_monthly_charge: is_yes(raw.monthly_charge.as_deref()),
        rate_is_good_for: raw.rate_good_for,
        rate_end: raw.rate_end,
        comments: raw.comments.as_deref().map(collapse_whitespace),
        link: raw.link,
    }
}

fn is_yes(value: Option<&str>) -> bool {
    value == Some("Yes")
}

fn is_no(value: Option<&str>) -> bool {
    value == Some("No")
}

/// Parse the longest leading decimal number, ignoring leading whitespace.
///
/// `"0.1234 per kWh"` gives `0.1234`, `"abc"` gives `None`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let matched = FLOAT_PREFIX.find(text.trim_start())?;
    matched.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Renewable share: unset when nothing but a percent sign is left, zero
/// when the figure is garbage.
pub fn parse_renewable(text: &str) -> Option<f64> {
    let figure = TRAILING_PERCENT.replace(text, "");
    let figure = figure.trim();
    if figure.is_empty() {
        return None;
    }
    Some(parse_float_prefix(figure).unwrap_or(0.0))
}

/// Calendar date of a "last updated" stamp, if it is recognizable.
pub fn parse_plan_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Replace each run of two or more whitespace characters with one space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}
