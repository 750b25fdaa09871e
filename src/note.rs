use crate::config::CostAssumptions;
use crate::finance::FinancialSummary;
use crate::model::{PoiCategory, PropertyRecord};
use chrono::{DateTime, Utc};

pub fn render(
    record: &PropertyRecord,
    summary: &FinancialSummary,
    assumptions: &CostAssumptions,
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines = Vec::new();

    push_frontmatter(&mut lines, record, generated_at);

    lines.push(String::new());
    lines.push(format!("# {}", record.title));

    push_location_section(&mut lines, record);
    push_financial_section(&mut lines, record, summary, assumptions);
    push_features_section(&mut lines, record);
    push_poi_section(&mut lines, &record.points_of_interest);

    lines.join("\n") + "\n"
}

fn push_frontmatter(lines: &mut Vec<String>, record: &PropertyRecord, generated_at: DateTime<Utc>) {
    lines.push("---".to_string());
    lines.push(format!(
        "date: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!("title: {}", yaml_safe(&record.title)));
    lines.push(format!(
        "property_type: {}",
        yaml_safe(&record.property_type)
    ));
    lines.push(format!("price: {}", record.price));
    lines.push(format!("bedrooms: {}", record.bedrooms));
    lines.push(format!("bathrooms: {}", record.bathrooms));
    lines.push(format!("suburb: {}", yaml_safe(&record.suburb)));
    lines.push("tags:".to_string());
    lines.push("  - property".to_string());
    lines.push("  - portfolio".to_string());
    if !record.amenities.is_empty() {
        lines.push("amenities:".to_string());
        for tag in &record.amenities {
            lines.push(format!("  - {}", yaml_safe(tag)));
        }
    }
    lines.push("---".to_string());
}

fn push_location_section(lines: &mut Vec<String>, record: &PropertyRecord) {
    lines.push(String::new());
    lines.push("## Location & Basic Info".to_string());
    lines.push(String::new());
    lines.push("| Field | Value |".to_string());
    lines.push("|-------|-------|".to_string());
    if let Some(address) = &record.street_address {
        lines.push(format!("| **Address** | {address} |"));
    }
    lines.push(format!("| **Suburb** | [[{}]] |", record.suburb));
    lines.push(format!("| **City** | {} |", record.city));
    lines.push(format!("| **Province** | {} |", record.province));
    lines.push(format!("| **Property Type** | {} |", record.property_type));
    if let Some(listing_id) = record.listing_id {
        lines.push(format!("| **Listing ID** | {listing_id} |"));
    }
    lines.push(format!("| **Source** | {} |", record.source_url));
}

fn push_financial_section(
    lines: &mut Vec<String>,
    record: &PropertyRecord,
    summary: &FinancialSummary,
    assumptions: &CostAssumptions,
) {
    lines.push(String::new());
    lines.push("## Financial Analysis".to_string());

    lines.push(String::new());
    lines.push("### Purchase Costs".to_string());
    lines.push(String::new());
    lines.push("| Item | Amount |".to_string());
    lines.push("|------|--------|".to_string());
    lines.push(format!(
        "| **Purchase Price** | {} |",
        format_rand(record.price as f64)
    ));
    lines.push(format!(
        "| **Transfer Duty** | {} |",
        format_rand(summary.transfer_duty)
    ));
    for (name, amount) in &assumptions.fees {
        lines.push(format!("| **{name}** | {} |", format_rand(*amount)));
    }
    lines.push(format!(
        "| **Total Purchase Cost** | {} |",
        format_rand(summary.total_purchase_cost)
    ));

    lines.push(String::new());
    lines.push("### Bond Repayment".to_string());
    lines.push(String::new());
    lines.push("| Item | Amount |".to_string());
    lines.push("|------|--------|".to_string());
    lines.push(format!(
        "| **Deposit ({:.0}%)** | {} |",
        assumptions.deposit_fraction * 100.0,
        format_rand(summary.deposit)
    ));
    lines.push(format!(
        "| **Bond Amount** | {} |",
        format_rand(summary.principal)
    ));
    lines.push(format!(
        "| **Interest Rate** | {:.2}% |",
        assumptions.annual_interest_rate * 100.0
    ));
    lines.push(format!("| **Term** | {} months |", assumptions.term_months));
    lines.push(format!(
        "| **Monthly Instalment** | {} |",
        format_rand(summary.monthly_instalment)
    ));

    lines.push(String::new());
    lines.push("### Monthly Costs".to_string());
    lines.push(String::new());
    lines.push("| Item | Amount |".to_string());
    lines.push("|------|--------|".to_string());
    lines.push(format!(
        "| **Bond Instalment** | {} |",
        format_rand(summary.monthly_instalment)
    ));
    if let Some(levies) = record.levies {
        lines.push(format!("| **Levies** | {} |", format_rand(levies as f64)));
    }
    if let Some(rates) = record.rates {
        lines.push(format!(
            "| **Rates & Taxes** | {} |",
            format_rand(rates as f64)
        ));
    }
    lines.push(format!(
        "| **Total Monthly** | {} |",
        format_rand(summary.total_monthly_cost)
    ));
}

fn push_features_section(lines: &mut Vec<String>, record: &PropertyRecord) {
    lines.push(String::new());
    lines.push("## Property Features".to_string());
    lines.push(String::new());
    lines.push("| Field | Value |".to_string());
    lines.push("|-------|-------|".to_string());
    lines.push(format!("| **Bedrooms** | {} |", record.bedrooms));
    lines.push(format!("| **Bathrooms** | {} |", record.bathrooms));
    lines.push(format!("| **Kitchens** | {} |", record.kitchens));
    if let Some(parking) = &record.parking {
        lines.push(format!("| **Parking** | {parking} |"));
    }

    if !record.amenities.is_empty() {
        lines.push(String::new());
        for tag in &record.amenities {
            lines.push(format!("- {}", display_tag(tag)));
        }
    }
}

fn push_poi_section(lines: &mut Vec<String>, categories: &[PoiCategory]) {
    if categories.iter().all(PoiCategory::is_empty) {
        return;
    }

    lines.push(String::new());
    lines.push("## Points of Interest".to_string());

    for category in categories {
        if category.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("### {}", category.name));
        lines.push(String::new());
        for entry in &category.entries {
            lines.push(format!("- {} - {:.2} km", entry.name, entry.distance_km));
        }
    }
}

pub fn format_rand(amount: f64) -> String {
    format!("R{}", group_thousands(amount.round() as i64))
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn display_tag(tag: &str) -> String {
    tag.split(['_', ' '])
        .filter(|part| !part.is_empty())
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn yaml_safe(value: &str) -> String {
    value.replace('"', "'").replace('\n', " ").trim().to_string()
}
