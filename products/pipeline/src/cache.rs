use std::sync::Arc;

use entity::Deal;
use tracing::debug;

use crate::{DealGenerator, PipelineResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub count: i64,
    pub seed: u64,
}

/// Single-slot memo of the last generated deal set, keyed by `(count, seed)`.
///
/// A lookup with a different key replaces the slot. Generation is
/// deterministic in its key, so a hit is indistinguishable from a rebuild.
#[derive(Debug, Default)]
pub struct DealCache {
    slot: Option<(CacheKey, Arc<[Deal]>)>,
    hits: u64,
    misses: u64,
}

impl DealCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_generate(
        &mut self,
        generator: &DealGenerator,
        count: i64,
        seed: u64,
    ) -> PipelineResult<Arc<[Deal]>> {
        let key = CacheKey { count, seed };
        if let Some((cached, deals)) = &self.slot {
            if *cached == key {
                self.hits += 1;
                debug!(count, seed, "deal cache hit");
                return Ok(Arc::clone(deals));
            }
        }
        let deals: Arc<[Deal]> = generator.generate(count, seed)?.into();
        self.misses += 1;
        debug!(count, seed, "deal cache miss");
        self.slot = Some((key, Arc::clone(&deals)));
        Ok(deals)
    }

    pub fn key(&self) -> Option<CacheKey> {
        self.slot.as_ref().map(|(key, _)| *key)
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
