//! Plain-text rendering of estimates for the terminal.

use crate::calculator::RateCard;
use crate::models::{CostBreakdown, FloorArea, Project};

const RUPEE: char = '₹';

/// Format an amount in rupees with Indian digit grouping.
///
/// ```text
/// 950000    -> ₹9,50,000
/// 34500000  -> ₹3,45,00,000
/// ```
pub fn format_inr(amount: u64) -> String {
    let mut out = String::new();
    out.push(RUPEE);
    out.push_str(&group_indian(amount));
    out
}

/// Digits grouped as thousands first, then pairs (lakh, crore, ...).
pub fn group_indian(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Square feet with Indian grouping on the whole part (`1,500.5`).
pub fn format_area(area: FloorArea) -> String {
    let whole = group_indian(area.whole_sq_ft());
    match area.to_string().split_once('.') {
        Some((_, fraction)) => format!("{}.{}", whole, fraction),
        None => whole,
    }
}

fn floors_label(floors: u32) -> &'static str {
    if floors == 1 {
        "floor"
    } else {
        "floors"
    }
}

/// Render a breakdown the way the estimate screen shows it.
///
/// Example output:
/// ```text
/// Base cost        2,000 sq ft × 2 floors × ₹1,200/sq ft   ₹48,00,000
/// Features                                                ₹9,50,000
/// Total                                                   ₹57,50,000
/// ```
pub fn render_breakdown(floor_area: FloorArea, floors: u32, breakdown: &CostBreakdown) -> String {
    let basis = format!(
        "{} sq ft × {} {} × {}/sq ft",
        format_area(floor_area),
        floors,
        floors_label(floors),
        format_inr(breakdown.material_multiplier())
    );

    let rows = [
        ("Base cost", basis, format_inr(breakdown.base_cost())),
        (
            "Features",
            String::new(),
            format_inr(breakdown.additional_features_cost()),
        ),
        ("Total", String::new(), format_inr(breakdown.total_cost())),
    ];

    let basis_width = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(0);
    let mut output = String::new();
    for (label, basis, amount) in rows {
        let pad = basis_width - basis.chars().count();
        output.push_str(&format!(
            "{:<12} {}{}   {}\n",
            label,
            basis,
            " ".repeat(pad),
            amount
        ));
    }
    output
}

/// One line per project, as in the saved-projects list.
pub fn render_project_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No saved projects.\n".to_string();
    }

    let mut output = String::new();
    for p in projects {
        output.push_str(&format!(
            "{}  {}  ({})  {} sq ft × {} {}  {}  {}\n",
            p.id,
            p.project_name,
            p.location,
            format_area(p.floor_area),
            p.number_of_floors,
            floors_label(p.number_of_floors),
            p.material_type,
            format_inr(p.estimated_cost),
        ));
    }
    output
}

/// Detailed view of a single project.
pub fn render_project(project: &Project) -> String {
    let features = if project.additional_features.is_empty() {
        "none".to_string()
    } else {
        project.additional_features.join(", ")
    };

    let mut output = String::new();
    output.push_str(&format!("{}\n", project.project_name));
    output.push_str(&format!("  Id:        {}\n", project.id));
    output.push_str(&format!("  Location:  {}\n", project.location));
    output.push_str(&format!("  Material:  {}\n", project.material_type));
    output.push_str(&format!("  Features:  {}\n", features));
    output.push_str(&format!(
        "  Created:   {}\n\n",
        project.created_at.format("%d %b %Y %H:%M UTC")
    ));
    output.push_str(&render_breakdown(
        project.floor_area,
        project.number_of_floors,
        &project.cost_breakdown,
    ));
    output
}

/// The rate card as two small tables.
pub fn render_rate_card(rates: &RateCard) -> String {
    let mut output = String::from("Material rates (per sq ft per floor)\n");
    for rate in rates.material_rates() {
        output.push_str(&format!(
            "  {:<14}{}\n",
            rate.grade.as_str(),
            format_inr(rate.rate_per_sq_ft)
        ));
    }

    output.push_str("\nAdditional features (flat)\n");
    for feature in rates.feature_costs() {
        output.push_str(&format!(
            "  {:<14}{}\n",
            feature.feature.as_str(),
            format_inr(feature.cost)
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_amounts_are_not_grouped() {
        assert_eq!(format_inr(0), "₹0");
        assert_eq!(format_inr(999), "₹999");
    }

    #[test]
    fn groups_thousands_then_pairs() {
        assert_eq!(format_inr(1200), "₹1,200");
        assert_eq!(format_inr(150_000), "₹1,50,000");
        assert_eq!(format_inr(950_000), "₹9,50,000");
        assert_eq!(format_inr(4_800_000), "₹48,00,000");
        assert_eq!(format_inr(34_500_000), "₹3,45,00,000");
        assert_eq!(format_inr(1_234_567_890), "₹1,23,45,67,890");
    }

    #[test]
    fn breakdown_lists_base_features_and_total() {
        let breakdown = CostBreakdown::new(2_500_000, 2500, 950_000).unwrap();
        let text = render_breakdown(FloorArea::from_sq_ft(1000).unwrap(), 1, &breakdown);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Base cost"));
        assert!(lines[0].contains("1,000 sq ft × 1 floor × ₹2,500/sq ft"));
        assert!(lines[0].ends_with("₹25,00,000"));
        assert!(lines[1].ends_with("₹9,50,000"));
        assert!(lines[2].ends_with("₹34,50,000"));
    }

    #[test]
    fn areas_keep_their_fraction() {
        assert_eq!(format_area(FloorArea::from_sq_ft(150_000).unwrap()), "1,50,000");
        assert_eq!(format_area(FloorArea::from_f64(1500.5).unwrap()), "1,500.5");
        assert_eq!(format_area(FloorArea::from_f64(12.05).unwrap()), "12.05");
    }

    #[test]
    fn rate_card_lists_every_grade_and_feature() {
        let text = render_rate_card(&RateCard::standard());
        for name in ["Standard", "Premium", "Luxury", "Parking", "Solar Panels"] {
            assert!(text.contains(name), "missing {}", name);
        }
        assert!(text.contains("₹8,00,000"));
    }

    #[test]
    fn empty_project_list_says_so() {
        assert_eq!(render_project_list(&[]), "No saved projects.\n");
    }
}
