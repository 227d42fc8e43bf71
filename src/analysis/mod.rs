//! Analysis modules.
//!
//! `aggregator` holds the pure counting and grouping functions;
//! `dashboard` assembles them into the per-role views.

pub mod aggregator;
pub mod dashboard;

pub use aggregator::*;
pub use dashboard::{Dashboard, OfficeOverview, StudentOverview, ViewOptions};
