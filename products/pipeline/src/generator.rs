//! Synthetic deal fabrication.

use chrono::{DateTime, Duration, Utc};
use entity::{Deal, Rep, Stage};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp;
use tracing::{debug, instrument};

use crate::{PipelineError, PipelineResult};

pub const MEAN_DAYS_IN_STAGE: f64 = 15.0;
/// `created` is drawn from `[anchor - WINDOW + 1 day, anchor]`.
pub const CREATED_WINDOW_DAYS: i64 = 90;
pub const MIN_DEAL_VALUE: f64 = 1_000.0;
pub const MAX_DEAL_VALUE: f64 = 20_000.0;

/// Fabricates deal sets relative to a fixed anchor instant.
///
/// The anchor is captured once so that repeated calls with the same
/// `(count, seed)` yield field-identical sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DealGenerator {
    anchor: DateTime<Utc>,
}

impl Default for DealGenerator {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl DealGenerator {
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    #[instrument(name = "pipeline.generate", skip(self), fields(anchor = %self.anchor))]
    pub fn generate(&self, count: i64, seed: u64) -> PipelineResult<Vec<Deal>> {
        if count < 0 {
            return Err(PipelineError::NegativeCount(count));
        }
        let stage_dist = WeightedIndex::new(Stage::weights()).map_err(PipelineError::distribution)?;
        let days_dist = Exp::new(1.0 / MEAN_DAYS_IN_STAGE).map_err(PipelineError::distribution)?;

        // Seeded once per call; every row draws from the same stream.
        let mut rng = StdRng::seed_from_u64(seed);
        let mut deals = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let rep = Rep::ROSTER[rng.gen_range(0..Rep::ROSTER.len())];
            let stage = Stage::ALL[stage_dist.sample(&mut rng)];
            let days = (days_dist.sample(&mut rng).floor() as u32).saturating_add(1);
            let created = self.anchor - Duration::days(rng.gen_range(0..CREATED_WINDOW_DAYS));
            let value = rng.gen_range(MIN_DEAL_VALUE..MAX_DEAL_VALUE).round() as i64;
            deals.push(Deal::new(rep, stage, days, created, value));
        }
        debug!(generated = deals.len(), "deal set generated");
        Ok(deals)
    }
}
