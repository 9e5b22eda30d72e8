//! Text and JSON rendering of recommendations

use crate::roi::RoiComparison;
use crate::{RecommendationRequest, RecommendationResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::error;

/// Reasons and specializations shown per card
const DISPLAYED_ITEMS: usize = 3;

/// Everything produced for one request, as written by `--format json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub request: RecommendationRequest,
    pub results: Vec<RecommendationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<RoiComparison>,
    pub generated_at: String,
}

impl RecommendationReport {
    pub fn new(
        request: RecommendationRequest,
        results: Vec<RecommendationResult>,
        roi: Option<RoiComparison>,
    ) -> Self {
        Self {
            request,
            results,
            roi,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Whole-dollar USD with thousands separators (`-$1,235`)
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}${grouped}")
}

pub fn format_currency_range(min: f64, max: f64) -> String {
    format!("{} - {}", format_currency(min), format_currency(max))
}

/// Infrastructure rating as five stars
pub fn star_rating(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Render ranked results followed by the ROI panel
pub fn render_text(
    results: &[RecommendationResult],
    request: &RecommendationRequest,
    roi: Option<&RoiComparison>,
) -> String {
    let mut out = String::new();
    if let Err(e) = write_report(&mut out, results, request, roi) {
        error!("Failed to render report: {}", e);
    }
    out
}

fn write_report(
    out: &mut String,
    results: &[RecommendationResult],
    request: &RecommendationRequest,
    roi: Option<&RoiComparison>,
) -> std::fmt::Result {
    if results.is_empty() {
        return writeln!(
            out,
            "No locations match the selected regions ({}).",
            request.selected_regions.join(", ")
        );
    }

    for (i, result) in results.iter().enumerate() {
        write_card(out, result, i + 1)?;
    }

    match roi {
        Some(roi) => write_roi(out, roi),
        None => Ok(()),
    }
}

fn write_card(out: &mut String, result: &RecommendationResult, rank: usize) -> std::fmt::Result {
    let loc = &result.location;
    let badge = if rank == 1 { "  [Top pick]" } else { "" };

    writeln!(out, "#{} {} {}{}", rank, loc.flag, loc.country, badge)?;
    writeln!(out, "   Region:         {}", loc.region)?;
    writeln!(out, "   Timezone:       {}", loc.timezone)?;
    writeln!(out, "   Infrastructure: {}", star_rating(loc.infrastructure_rating))?;
    writeln!(out, "   English:        {}", loc.english_proficiency)?;
    writeln!(out, "   Score:          {:.1}", result.score)?;
    for reason in result.match_reasons.iter().take(DISPLAYED_ITEMS) {
        writeln!(out, "     ✓ {}", reason)?;
    }
    if !loc.specializations.is_empty() {
        let specs: Vec<&str> = loc
            .specializations
            .iter()
            .take(DISPLAYED_ITEMS)
            .map(String::as_str)
            .collect();
        writeln!(out, "   Specializations: {}", specs.join(", "))?;
    }
    writeln!(
        out,
        "   Est. Monthly Cost:    {}",
        format_currency_range(
            result.estimated_monthly_cost_range.min,
            result.estimated_monthly_cost_range.max
        )
    )?;
    writeln!(
        out,
        "   Est. Annual Savings:  {}",
        format_currency_range(
            result.estimated_annual_savings_range.min,
            result.estimated_annual_savings_range.max
        )
    )?;
    writeln!(out, "   Savings vs US:        {}%", result.savings_percentage)?;
    writeln!(out)
}

fn write_roi(out: &mut String, roi: &RoiComparison) -> std::fmt::Result {
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(
        out,
        "ROI: {} agents, {}",
        roi.agent_count, roi.service_label
    )?;
    writeln!(out, "{}", "=".repeat(60))?;

    writeln!(out, "In-house (US)")?;
    writeln!(out, "   Rate:            ${} - ${}/hr", roi.us_rate.min, roi.us_rate.max)?;
    writeln!(out, "   Monthly wages:   ~{}", format_currency(roi.in_house_monthly))?;
    writeln!(out, "   Benefits (mo):   {}", format_currency(roi.in_house_benefits_monthly))?;
    writeln!(
        out,
        "   Infrastructure:  {}",
        format_currency(roi.in_house_infrastructure_monthly)
    )?;
    writeln!(out, "   Annual total:    ~{}", format_currency(roi.in_house_total_annual))?;

    writeln!(out, "Outsourced ({})", roi.outsourced_country)?;
    writeln!(
        out,
        "   Rate:            ${} - ${}/hr",
        roi.outsourced_rate.min, roi.outsourced_rate.max
    )?;
    writeln!(
        out,
        "   Monthly:         {}",
        format_currency_range(roi.outsourced_monthly.min, roi.outsourced_monthly.max)
    )?;
    writeln!(
        out,
        "   Annual total:    {}",
        format_currency_range(roi.outsourced_annual.min, roi.outsourced_annual.max)
    )?;

    writeln!(out, "Potential savings")?;
    writeln!(
        out,
        "   Total:           ~{} ({}%)",
        format_currency(roi.total_potential_savings),
        roi.savings_percent
    )?;
    writeln!(out, "   Labor:           ~{}", format_currency(roi.labor_savings))?;
    writeln!(out, "   Benefits:        ~{}", format_currency(roi.benefits_savings))?;
    writeln!(
        out,
        "   Infrastructure:  ~{}",
        format_currency(roi.infrastructure_savings)
    )
}
