//! Dashboard statistics over travel-planning trip snapshots
//!
//! The aggregation core lives in [`services`]: pure functions over `&[Trip]`
//! for planned costs, trip status, distances and budgets, plus the
//! distance/duration text helpers used by travel cards. [`parsers`] loads
//! exported snapshots and [`cli`] wraps everything in the `tripstats` binary.

pub mod cli;
pub mod logging;
pub mod parsers;
pub mod services;
pub mod types;
