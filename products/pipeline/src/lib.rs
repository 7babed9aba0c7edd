//! Pipeline dashboard core: deal generation, filtering and aggregation.
//!
//! Everything here is a pure function of explicit inputs except [`Session`],
//! which owns the current seed and the generation cache for one interactive
//! session.

pub mod aggregate;
pub mod cache;
pub mod dashboard;
mod error;
pub mod filter;
pub mod generator;
pub mod session;

pub use cache::{CacheKey, DealCache};
pub use dashboard::{Dashboard, DashboardParams, KpiDisplay};
pub use error::{PipelineError, PipelineResult};
pub use filter::{DateRange, DealFilter};
pub use generator::DealGenerator;
pub use session::Session;
