//! Aggregator service for computing trip statistics
//!
//! Every function is pure: it reads a snapshot of trips and recomputes from
//! scratch. Malformed numbers and dates never fail a computation; they
//! contribute zero or take the record out of date-based classification.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};

use super::dates::{nights_between, parse_date, parse_range, start_of_day};
use super::numeric::{parse_float_or_zero, parse_float_prefix};
use super::travel_format::{parse_distance, parse_duration};
use crate::types::{
    Accommodation, ActivityCategory, CostBreakdown, Travel, TravelTotals, Trip, TripStatusTotals,
};

/// Aggregator for computing trip statistics
pub struct TripAggregator;

impl TripAggregator {
    /// Sum of travel, accommodation and activity costs across all trips
    pub fn total_planned_costs(trips: &[Trip]) -> f64 {
        let mut total = 0.0;

        for trip in trips {
            for travel in trip.travels() {
                total += travel_cost(travel);
            }
            for acc in trip.accommodations() {
                total += stay_cost(acc);
            }
            for activity in trip.activities() {
                total += activity.cost.unwrap_or(0.0);
            }
        }

        total
    }

    /// Same accumulation as [`Self::total_planned_costs`], kept per category
    pub fn planned_costs_breakdown(trips: &[Trip]) -> CostBreakdown {
        let mut costs = CostBreakdown::default();
        for trip in trips {
            costs.add(&Self::trip_planned_costs(trip));
        }
        costs
    }

    /// Planned costs of a single trip, per category
    pub fn trip_planned_costs(trip: &Trip) -> CostBreakdown {
        let mut costs = CostBreakdown::default();

        for travel in trip.travels() {
            costs.travel += travel_cost(travel);
        }

        for acc in trip.accommodations() {
            costs.accommodation += stay_cost(acc);
        }

        for activity in trip.activities() {
            costs.activities += activity.cost.unwrap_or(0.0);
        }

        costs
    }

    /// Number of activities across all trips
    pub fn total_planned_activities(trips: &[Trip]) -> usize {
        trips.iter().map(|t| t.activities().len()).sum()
    }

    /// Activity counts per category; every category is present
    pub fn activities_by_category(trips: &[Trip]) -> BTreeMap<ActivityCategory, usize> {
        let mut counts: BTreeMap<ActivityCategory, usize> =
            ActivityCategory::ALL.iter().map(|c| (*c, 0)).collect();

        for activity in trips.iter().flat_map(|t| t.activities()) {
            *counts.entry(activity.category).or_default() += 1;
        }

        counts
    }

    /// Sum of the leading number of every leg's distance.
    ///
    /// Only the numeric prefix is read: "50 km" counts 50, "1,275 km"
    /// counts 1. Use [`Self::travel_totals`] for unit-aware sums.
    pub fn total_kms(trips: &[Trip]) -> f64 {
        trips
            .iter()
            .flat_map(|t| t.travels())
            .filter_map(|travel| travel.distance.as_deref())
            .filter_map(parse_float_prefix)
            .filter(|km| km.is_finite())
            .sum()
    }

    /// Distance and duration over all legs, parsed with their units
    pub fn travel_totals(trips: &[Trip]) -> TravelTotals {
        let mut totals = TravelTotals::default();

        for travel in trips.iter().flat_map(|t| t.travels()) {
            totals.legs += 1;
            totals.meters = totals
                .meters
                .saturating_add(parse_distance(travel.distance.as_deref()));
            totals.minutes = totals
                .minutes
                .saturating_add(parse_duration(travel.estimated_duration.as_deref()));
        }

        totals
    }

    /// Sum of trip budgets (missing = 0)
    pub fn total_budget(trips: &[Trip]) -> f64 {
        trips.iter().map(|t| t.budget.unwrap_or(0.0)).sum()
    }

    /// Sum of tracked spend (missing = 0)
    pub fn total_spent(trips: &[Trip]) -> f64 {
        trips.iter().map(|t| t.spent.unwrap_or(0.0)).sum()
    }

    /// Dated trip with the greatest `end - start`; ties keep the first
    pub fn longest_planned_trip(trips: &[Trip]) -> Option<&Trip> {
        let mut longest: Option<(&Trip, i64)> = None;

        for trip in trips {
            let Some((start, end)) = trip_range(trip) else {
                continue;
            };
            let span = (end - start).num_milliseconds();

            match longest {
                None => longest = Some((trip, span)),
                Some((_, best)) if span > best => longest = Some((trip, span)),
                _ => {}
            }
        }

        longest.map(|(trip, _)| trip)
    }

    /// Classify trips as past, live or incoming relative to `now`.
    ///
    /// A trip is live when `now` is in the same year and month as its start
    /// and the day of month lies between the start and end days. Trips
    /// spanning a month boundary can therefore fall into no bucket while
    /// they are under way. Undated trips only count toward `planned`.
    pub fn trip_status_totals(trips: &[Trip], now: NaiveDateTime) -> TripStatusTotals {
        let mut totals = TripStatusTotals {
            planned: trips.len(),
            ..Default::default()
        };

        for trip in trips {
            let Some((start, end)) = trip_range(trip) else {
                continue;
            };

            if is_live(start, end, now) {
                totals.live += 1;
            } else if end < now {
                totals.past += 1;
            } else if start > now {
                totals.incoming += 1;
            }
        }

        totals
    }

    /// Earliest trip starting today or later; ties keep the first
    pub fn next_incoming_trip(trips: &[Trip], now: NaiveDateTime) -> Option<&Trip> {
        let today = start_of_day(now);
        let mut next: Option<(&Trip, NaiveDateTime)> = None;

        for trip in trips {
            let Some(start) = trip.start_date.as_deref().and_then(parse_date) else {
                continue;
            };
            if start < today {
                continue;
            }

            match next {
                None => next = Some((trip, start)),
                Some((_, earliest)) if start < earliest => next = Some((trip, start)),
                _ => {}
            }
        }

        next.map(|(trip, _)| trip)
    }
}

/// Parsed `(start, end)` of a trip with both dates readable
pub fn trip_range(trip: &Trip) -> Option<(NaiveDateTime, NaiveDateTime)> {
    parse_range(trip.start_date.as_deref(), trip.end_date.as_deref())
}

fn is_live(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> bool {
    now.year() == start.year()
        && now.month() == start.month()
        && now.day() >= start.day()
        && now.day() <= end.day()
}

/// Leg cost when its text starts with a finite number, else 0
fn travel_cost(travel: &Travel) -> f64 {
    travel
        .estimated_cost
        .as_deref()
        .map_or(0.0, parse_float_or_zero)
}

/// Nights times the combined nightly rate; 0 when a date is missing or unreadable
fn stay_cost(acc: &Accommodation) -> f64 {
    stay_nights(acc).map_or(0.0, |nights| nights * acc.nightly_rate())
}

fn stay_nights(acc: &Accommodation) -> Option<f64> {
    let check_in = acc.check_in_date.as_deref()?;
    let check_out = acc.check_out_date.as_deref()?;
    nights_between(check_in, check_out).map(|n| n as f64)
}
