//! Plain-text table rendering of plan rows

use std::fmt::Write;

use crate::domain::EnergyPlanView;

const HEADERS: [&str; 9] = [
    "Supplier", "Plan", "$/kWh", "Type", "Renew %", "Term", "Updated", "Cancel fee", "Monthly",
];

const MAX_CELL_WIDTH: usize = 32;

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn row(plan: &EnergyPlanView) -> [String; 9] {
    [
        truncate(&plan.supplier_name),
        truncate(&plan.plan_name),
        plan.price_per_kwh
            .map_or_else(|| "-".to_string(), |price| format!("{price:.4}")),
        plan.pricing_type.to_string(),
        format!("{:.0}", plan.percent_renewable),
        if plan.rate_is_good_for_months > 0 {
            format!("{} mo", plan.rate_is_good_for_months)
        } else {
            "-".to_string()
        },
        plan.last_updated
            .map_or_else(|| "-".to_string(), |date| date.format("%Y-%m-%d").to_string()),
        yes_no(plan.has_cancellation_fee).to_string(),
        yes_no(plan.is_monthly_charge).to_string(),
    ]
}

/// Render rows as an aligned table followed by a count line.
pub fn render_table(plans: &[EnergyPlanView]) -> String {
    let rows: Vec<[String; 9]> = plans.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: &[&str]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    };

    push_line(&HEADERS);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&rule.iter().map(String::as_str).collect::<Vec<_>>());
    for cells in &rows {
        push_line(&cells.iter().map(String::as_str).collect::<Vec<_>>());
    }

    let _ = writeln!(out, "{} plan(s)", plans.len());
    out
}
