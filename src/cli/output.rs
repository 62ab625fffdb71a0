//! Plain-text and JSON rendering for CLI reports

use std::fmt::Write as _;

use serde::Serialize;

use crate::services::dates::get_nights;
use crate::services::travel_format::format_thousands;
use crate::services::{
    format_distance, format_duration, TripAggregator, TripHighlight, TripStatsReport,
};
use crate::types::{ActivityCategory, CostBreakdown, TravelTotals, Trip, TripStatusTotals};

/// `tripstats costs --json`
#[derive(Debug, Serialize)]
pub struct CostsOutput {
    #[serde(flatten)]
    pub breakdown: CostBreakdown,
    pub total: f64,
}

/// `tripstats status --json`
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    #[serde(flatten)]
    pub totals: TripStatusTotals,
    pub next_trip: Option<TripHighlight>,
    pub longest_trip: Option<TripHighlight>,
}

/// `tripstats trip <ID>`
#[derive(Debug, Serialize)]
pub struct TripDetail {
    pub id: Option<String>,
    pub name: String,
    pub destination: Option<String>,
    pub nights: Option<i64>,
    pub costs: CostBreakdown,
    pub total_cost: f64,
    pub budget: Option<f64>,
    pub activities: usize,
    pub travel: TravelTotals,
    pub distance: String,
    pub duration: String,
}

impl TripDetail {
    pub fn from_trip(trip: &Trip) -> Self {
        let costs = TripAggregator::trip_planned_costs(trip);
        let travel = TripAggregator::travel_totals(std::slice::from_ref(trip));
        let nights = match (trip.start_date.as_deref(), trip.end_date.as_deref()) {
            (Some(start), Some(end)) => Some(get_nights(start, end)),
            _ => None,
        };

        Self {
            id: trip.key().map(String::from),
            name: trip.name.clone(),
            destination: trip.destination.clone(),
            nights,
            costs,
            total_cost: costs.total(),
            budget: trip.budget,
            activities: trip.activities().len(),
            travel,
            distance: format_distance(travel.meters),
            duration: format_duration(travel.minutes),
        }
    }
}

/// Two decimals with thousands separators, e.g. `1,234.50`
pub fn format_amount(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    format!("{}{}.{:02}", sign, format_thousands(cents / 100), cents % 100)
}

fn highlight_line(label: &str, highlight: Option<&TripHighlight>) -> String {
    match highlight {
        None => format!("{:<16}-", label),
        Some(h) => {
            let mut line = format!("{:<16}{}", label, h.name);
            if let Some(dest) = &h.destination {
                let _ = write!(line, " ({})", dest);
            }
            if let (Some(start), Some(end)) = (&h.start_date, &h.end_date) {
                let _ = write!(line, ", {} -> {}", start, end);
            }
            let _ = write!(line, ", {} night{}", h.nights, plural(h.nights));
            if let Some(days) = h.days_until {
                let _ = write!(line, ", in {} day{}", days, plural(days));
            }
            line
        }
    }
}

/// Label column plus right-aligned value column
fn row(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<16}{:>14}", label, value)
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

pub fn render_costs(costs: &CostBreakdown, total: f64) -> String {
    [
        row("Accommodation", format_amount(costs.accommodation)),
        row("Travel", format_amount(costs.travel)),
        row("Activities", format_amount(costs.activities)),
        row("Total", format_amount(total)),
    ]
    .join("\n")
}

pub fn render_status(
    totals: &TripStatusTotals,
    next: Option<&TripHighlight>,
    longest: Option<&TripHighlight>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Trips: {} planned, {} past, {} live, {} incoming",
        totals.planned, totals.past, totals.live, totals.incoming
    );
    let _ = writeln!(out, "{}", highlight_line("Next trip", next));
    let _ = write!(out, "{}", highlight_line("Longest trip", longest));
    out
}

pub fn render_summary(report: &TripStatsReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Trips ==");
    let _ = writeln!(
        out,
        "{}",
        render_status(
            &report.status,
            report.next_trip.as_ref(),
            report.longest_trip.as_ref()
        )
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "== Planned costs ==");
    let _ = writeln!(out, "{}", render_costs(&report.costs, report.planned_costs));

    let _ = writeln!(out);
    let _ = writeln!(out, "== Budget ==");
    let _ = writeln!(out, "{}", row("Budget", format_amount(report.total_budget)));
    let _ = writeln!(out, "{}", row("Spent", format_amount(report.total_spent)));
    let usage = match report.budget_usage {
        Some(usage) => format!("{:.1}%", usage * 100.0),
        None => "-".to_string(),
    };
    let _ = writeln!(out, "{}", row("Planned/budget", usage));

    let _ = writeln!(out);
    let _ = writeln!(out, "== Activities ({}) ==", report.activities);
    for category in ActivityCategory::ALL {
        let count = report
            .activities_by_category
            .get(&category)
            .copied()
            .unwrap_or(0);
        let _ = writeln!(out, "{}", row(category.label(), count));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "== Travel ({} legs) ==", report.travel.legs);
    let total_km = format_thousands(report.total_km.round().max(0.0) as u64);
    let _ = writeln!(out, "{}", row("Total km", total_km));
    let _ = writeln!(out, "{}", row("Distance", format_distance(report.travel.meters)));
    let _ = write!(out, "{}", row("Duration", format_duration(report.travel.minutes)));

    out
}

pub fn render_trip(detail: &TripDetail) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}", detail.name);
    if let Some(dest) = &detail.destination {
        let _ = write!(out, " ({})", dest);
    }
    let _ = writeln!(out);

    let nights = detail
        .nights
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "{}", row("Nights", nights));
    let _ = writeln!(out, "{}", render_costs(&detail.costs, detail.total_cost));
    if let Some(budget) = detail.budget {
        let _ = writeln!(out, "{}", row("Budget", format_amount(budget)));
    }
    let _ = writeln!(out, "{}", row("Activities", detail.activities));
    let _ = writeln!(out, "{}", row("Distance", &detail.distance));
    let _ = write!(out, "{}", row("Duration", &detail.duration));

    out
}
