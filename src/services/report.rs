//! Dashboard report combining every trip statistic

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::aggregator::TripAggregator;
use super::dates::{get_nights, parse_date};
use crate::types::{ActivityCategory, CostBreakdown, TravelTotals, Trip, TripStatusTotals};

/// A trip singled out on the dashboard (longest, next)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripHighlight {
    pub id: Option<String>,
    pub name: String,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub nights: i64,
    /// Whole days from today until the start, for upcoming trips
    pub days_until: Option<i64>,
}

impl TripHighlight {
    fn from_trip(trip: &Trip) -> Self {
        let nights = match (trip.start_date.as_deref(), trip.end_date.as_deref()) {
            (Some(start), Some(end)) => get_nights(start, end),
            _ => 1,
        };

        Self {
            id: trip.key().map(String::from),
            name: trip.name.clone(),
            destination: trip.destination.clone(),
            start_date: trip.start_date.clone(),
            end_date: trip.end_date.clone(),
            nights,
            days_until: None,
        }
    }
}

/// Everything the dashboard shows for a trip collection
#[derive(Debug, Clone, Serialize)]
pub struct TripStatsReport {
    pub trip_count: usize,
    pub planned_costs: f64,
    pub costs: CostBreakdown,
    pub activities: usize,
    pub activities_by_category: BTreeMap<ActivityCategory, usize>,
    pub total_km: f64,
    pub travel: TravelTotals,
    pub total_budget: f64,
    pub total_spent: f64,
    /// Planned costs as a fraction of the budget; `None` without a budget
    pub budget_usage: Option<f64>,
    pub status: TripStatusTotals,
    pub longest_trip: Option<TripHighlight>,
    pub next_trip: Option<TripHighlight>,
}

impl TripStatsReport {
    pub fn from_trips(trips: &[Trip], now: NaiveDateTime) -> Self {
        let costs = TripAggregator::planned_costs_breakdown(trips);
        let planned_costs = TripAggregator::total_planned_costs(trips);
        let total_budget = TripAggregator::total_budget(trips);

        let budget_usage = if total_budget > 0.0 {
            Some(planned_costs / total_budget)
        } else {
            None
        };

        let next_trip = TripAggregator::next_incoming_trip(trips, now).map(|trip| {
            let mut highlight = TripHighlight::from_trip(trip);
            highlight.days_until = trip_start_days_from(trip, now);
            highlight
        });

        Self {
            trip_count: trips.len(),
            planned_costs,
            costs,
            activities: TripAggregator::total_planned_activities(trips),
            activities_by_category: TripAggregator::activities_by_category(trips),
            total_km: TripAggregator::total_kms(trips),
            travel: TripAggregator::travel_totals(trips),
            total_budget,
            total_spent: TripAggregator::total_spent(trips),
            budget_usage,
            status: TripAggregator::trip_status_totals(trips, now),
            longest_trip: TripAggregator::longest_planned_trip(trips).map(TripHighlight::from_trip),
            next_trip,
        }
    }
}

/// Calendar days between today and the trip's start date
fn trip_start_days_from(trip: &Trip, now: NaiveDateTime) -> Option<i64> {
    let start = trip.start_date.as_deref().and_then(parse_date)?;
    Some((start.date() - now.date()).num_days())
}
