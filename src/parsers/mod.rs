//! Loading trip snapshots exported from the trip backend

mod snapshot;

pub use snapshot::{dedup_trips, TripSnapshotLoader};
