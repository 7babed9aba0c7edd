use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{Dashboard, DashboardParams, DealCache, DealGenerator, PipelineResult};

pub const DEFAULT_SEED: u64 = 42;
/// Regenerated seeds are drawn from `0..=MAX_SEED`.
pub const MAX_SEED: u64 = 1_000_000;

/// State of one interactive dashboard session: the current seed, the
/// generation anchor and the cached deal set.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    seed: u64,
    generator: DealGenerator,
    cache: DealCache,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::with_generator(seed, DealGenerator::default())
    }

    pub fn with_generator(seed: u64, generator: DealGenerator) -> Self {
        Self {
            id: Uuid::new_v4(),
            seed,
            generator,
            cache: DealCache::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.generator.anchor()
    }

    pub fn cache(&self) -> &DealCache {
        &self.cache
    }

    /// Control defaults relative to the session's anchor date.
    pub fn default_params(&self) -> DashboardParams {
        DashboardParams::defaults_for(self.anchor().date_naive())
    }

    /// Replaces the seed with a fresh random one. Previously generated sets
    /// are left untouched; the next recompute misses the cache.
    pub fn regenerate(&mut self) -> u64 {
        self.regenerate_with(&mut rand::thread_rng())
    }

    pub fn regenerate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u64 {
        let previous = self.seed;
        self.seed = rng.gen_range(0..=MAX_SEED);
        info!(session = %self.id, previous, seed = self.seed, "session seed regenerated");
        self.seed
    }

    /// Generate-or-reuse, filter and aggregate for the current seed.
    #[instrument(
        name = "pipeline.recompute",
        skip_all,
        fields(session = %self.id, seed = self.seed, count = params.deal_count)
    )]
    pub fn recompute(&mut self, params: &DashboardParams) -> PipelineResult<Dashboard> {
        params.validate()?;
        let deals = self
            .cache
            .get_or_generate(&self.generator, params.deal_count, self.seed)?;
        let filtered = params.filter().apply(&deals);
        Ok(Dashboard::build(
            self.seed,
            &filtered,
            params.stalled_threshold_days,
        ))
    }
}
