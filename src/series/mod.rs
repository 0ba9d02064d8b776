//! Series builder: one component spec in, one dense per-year series out
//!
//! The builder walks the timeline once. Each index grows last year's
//! *recurring* value by the rate active at that index, then applies every
//! override in effect at that age in a fixed order:
//!
//! 1. `from_age` ascending
//! 2. bounded overrides before open-ended ones
//! 3. `to_age` ascending
//! 4. insertion order
//!
//! In [`AddMode::NonRecurring`] `add` overrides sit outside the chain and are
//! summed per year, so a one-off bonus neither compounds nor disappears.

mod builder;
mod ordering;

pub use builder::{AddMode, SeriesBreakdown, SeriesBuilder};
