//! Derived numbers shown next to tracked media: per-record completion and
//! per-collection aggregates.

pub mod progress;
pub mod stats;

pub use progress::{progress, progress_percent};
pub use stats::{aggregate_stats, AggregateStats};
