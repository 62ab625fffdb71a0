//! Derived statistics over a trip collection

use serde::{Deserialize, Serialize};

/// Planned costs split by category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CostBreakdown {
    pub accommodation: f64,
    pub travel: f64,
    pub activities: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.accommodation + self.travel + self.activities
    }

    pub fn add(&mut self, other: &CostBreakdown) {
        self.accommodation += other.accommodation;
        self.travel += other.travel;
        self.activities += other.activities;
    }
}

/// Trip counts by status
///
/// `planned` counts every trip; the other buckets only dated ones, and a
/// dated trip may land in none of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TripStatusTotals {
    pub planned: usize,
    pub past: usize,
    pub live: usize,
    pub incoming: usize,
}

/// Travel legs summed with the unit-aware parsers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TravelTotals {
    pub legs: usize,
    pub meters: u64,
    pub minutes: u64,
}
