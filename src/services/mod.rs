//! Services for trip aggregation and text parsing

pub mod aggregator;
pub mod dates;
pub mod numeric;
pub mod report;
pub mod settings;
pub mod travel_format;

pub use aggregator::TripAggregator;
pub use dates::get_nights;
pub use report::{TripHighlight, TripStatsReport};
pub use settings::{Settings, SettingsService};
pub use travel_format::{format_distance, format_duration, parse_distance, parse_duration};
