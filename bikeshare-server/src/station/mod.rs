//! Station data: types, the status join, and summary totals.

mod merge;
mod summary;
mod types;

pub use merge::{coerce_count, merge};
pub use summary::{Summary, summarize};
pub use types::{MergedStation, RawCount, Station, StationId, StationStatus};
