use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One supplier plan as published on the comparison page.
///
/// Field nullability is part of the output contract consumed downstream:
/// `Option` fields without `skip_serializing_if` serialize as `null`, the
/// ones with it are omitted from the JSON object entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPlan {
    pub supplier_name: Option<String>,
    pub plan_name: Option<String>,
    pub pricing_type: Option<String>,
    pub is_intro_price: bool,
    pub has_cancellation_fee: bool,
    /// Zero when the price is missing or not a number.
    pub price_per_kwh: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
    /// Unset when the page shows no figure at all; zero when it shows garbage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_renewable: Option<f64>,
    pub is_monthly_charge: bool,
    pub rate_is_good_for: Option<String>,
    pub rate_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "SignUpLink::is_unset")]
    pub link: SignUpLink,
}

impl SupplierPlan {
    /// Record produced for a plan block in which no field could be found.
    pub fn empty() -> Self {
        Self {
            supplier_name: None,
            plan_name: None,
            pricing_type: None,
            is_intro_price: false,
            has_cancellation_fee: true,
            price_per_kwh: 0.0,
            last_updated: None,
            percent_renewable: None,
            is_monthly_charge: false,
            rate_is_good_for: None,
            rate_end: None,
            comments: None,
            link: SignUpLink::NoAnchor,
        }
    }
}

/// Sign-up link of a plan.
///
/// Three states are distinguishable in the JSON output:
/// - `Href(url)` serializes as the URL string
/// - `NoAnchor` (no sign-up anchor in the block) serializes as `null`
/// - `NoHref` (anchor present without an `href`) omits the key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpLink {
    Href(String),
    NoAnchor,
    NoHref,
}

impl SignUpLink {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::NoHref)
    }
}

// An omitted `link` key deserializes to the state that omits it.
impl Default for SignUpLink {
    fn default() -> Self {
        Self::NoHref
    }
}

impl Serialize for SignUpLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Href(url) => serializer.serialize_str(url),
            Self::NoAnchor | Self::NoHref => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for SignUpLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(url) => Self::Href(url),
            None => Self::NoAnchor,
        })
    }
}
