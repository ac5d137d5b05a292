//! End-to-end extraction over a saved comparison page
use chrono::NaiveDate;
use energy_plan_scraper::domain::{SignUpLink, SupplierPlan};
use energy_plan_scraper::infrastructure::SupplierPlanParser;
use serde_json::json;

const PAGE: &str = include_str!("fixtures/residential_compare.html");

fn parse(html: &str) -> Vec<SupplierPlan> {
    SupplierPlanParser::new().unwrap().parse_document(html)
}

#[test]
fn fixture_yields_one_record_per_block_in_order() {
    let plans = parse(PAGE);
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0].supplier_name.as_deref(), Some("Granite State Power"));
    assert_eq!(plans[1].supplier_name.as_deref(), Some("Seacoast Energy"));
    assert_eq!(plans[2], SupplierPlan::empty());
}

#[test]
fn complete_block_is_fully_normalized() {
    let plan = &parse(PAGE)[0];
    assert_eq!(plan.plan_name.as_deref(), Some("Granite Fixed 12"));
    assert_eq!(plan.price_per_kwh, 0.0899);
    assert_eq!(plan.last_updated, NaiveDate::from_ymd_opt(2025, 4, 15));
    assert_eq!(plan.pricing_type.as_deref(), Some("Fixed"));
    assert!(!plan.is_monthly_charge);
    assert!(!plan.is_intro_price);
    assert!(!plan.has_cancellation_fee);
    assert_eq!(plan.percent_renewable, Some(23.0));
    assert_eq!(plan.rate_is_good_for.as_deref(), Some("12 months"));
    assert_eq!(
        plan.rate_end.as_deref(),
        Some("Rate converts to a month-to-month variable rate")
    );
    assert_eq!(
        plan.comments.as_deref(),
        Some("Price includes all fees. No deposit required.")
    );
    assert_eq!(
        plan.link,
        SignUpLink::Href("https://granite.example/signup?plan=fixed12".to_string())
    );
}

#[test]
fn partial_block_keeps_absence_semantics() {
    let plan = &parse(PAGE)[1];
    assert_eq!(plan.price_per_kwh, 0.115);
    assert_eq!(plan.last_updated, None);
    assert!(plan.is_monthly_charge);
    assert!(plan.is_intro_price);
    assert!(plan.has_cancellation_fee);
    assert_eq!(plan.percent_renewable, None);
    assert_eq!(plan.rate_end.as_deref(), Some(""));
    assert_eq!(plan.comments, None);
    assert_eq!(plan.link, SignUpLink::NoHref);

    let value = serde_json::to_value(plan).unwrap();
    let object = value.as_object().unwrap();
    for key in ["last_updated", "percent_renewable", "comments", "link"] {
        assert!(!object.contains_key(key), "{key} should be omitted");
    }
}

#[test]
fn json_output_matches_contract() {
    let plans = parse(PAGE);
    let value = serde_json::to_value(&plans).unwrap();
    assert_eq!(
        value[0],
        json!({
            "supplier_name": "Granite State Power",
            "plan_name": "Granite Fixed 12",
            "pricing_type": "Fixed",
            "is_intro_price": false,
            "has_cancellation_fee": false,
            "price_per_kwh": 0.0899,
            "last_updated": "2025-04-15",
            "percent_renewable": 23.0,
            "is_monthly_charge": false,
            "rate_is_good_for": "12 months",
            "rate_end": "Rate converts to a month-to-month variable rate",
            "comments": "Price includes all fees. No deposit required.",
            "link": "https://granite.example/signup?plan=fixed12"
        })
    );
    assert_eq!(value[2]["link"], serde_json::Value::Null);
    assert_eq!(value[2]["price_per_kwh"], json!(0.0));
}

#[test]
fn full_and_empty_block_pair() {
    let html = r#"
        <div>
          <table class="tblCompareList">
            <tr><td class="CompanyName"><b>Acme</b></td><td class="PlanName">Basic</td></tr>
            <tr><td><span id="MainContent_CompareSupplierID_lblKWh_0">Per KWh: $0.1234</span></td></tr>
            <tr><td class="RenewableEnergy">Renewable Energy: 45 %</td></tr>
            <tr><td class="Comments">Comments: ok</td></tr>
            <tr><td><a aria-label="Sign Up for Supplier Plan" href="/enroll">Sign Up</a></td></tr>
          </table>
          <table class="tblCompareList"></table>
        </div>"#;
    let plans = parse(html);
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].price_per_kwh, 0.1234);
    assert_eq!(plans[0].percent_renewable, Some(45.0));
    assert_eq!(plans[0].link, SignUpLink::Href("/enroll".to_string()));

    let empty = &plans[1];
    assert_eq!(empty.price_per_kwh, 0.0);
    assert_eq!(empty.percent_renewable, None);
    assert!(empty.has_cancellation_fee);
    assert!(!empty.is_monthly_charge);
    assert_eq!(empty.link, SignUpLink::NoAnchor);
    assert_eq!(empty.comments, None);
}

#[test]
fn page_without_blocks_is_empty() {
    assert!(parse("<html><body><p>No offers are available.</p></body></html>").is_empty());
    assert!(parse("").is_empty());
}

#[test]
fn records_round_trip_through_json() {
    let plans = parse(PAGE);
    let text = serde_json::to_string_pretty(&plans).unwrap();
    let back: Vec<SupplierPlan> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, plans);
}
