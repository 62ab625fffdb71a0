//! Type definitions for tripstats

mod error;
mod stats;
mod trip;

pub use error::*;
pub use stats::*;
pub use trip::*;
