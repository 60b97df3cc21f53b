//! Pricing
//!
//! Discount math for cart previews and order price snapshots.

pub mod snapshot;

pub use snapshot::{discounted_unit_price, line_total, sum};
