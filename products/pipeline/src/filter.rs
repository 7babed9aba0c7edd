use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use entity::{Deal, Rep, Stage};
use serde::Serialize;

use crate::{PipelineError, PipelineResult};

/// Inclusive calendar date range. Construction guarantees `from <= to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> PipelineResult<Self> {
        if from > to {
            return Err(PipelineError::InvalidDateRange {
                start: from,
                end: to,
            });
        }
        Ok(Self { from, to })
    }

    /// The `days` days before `end` through `end` itself.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        Self {
            from: end - Duration::days(i64::from(days)),
            to: end,
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Row predicate over created date, rep and stage. `None` means "allow all";
/// an empty set allows nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DealFilter {
    pub date_range: Option<DateRange>,
    pub reps: Option<BTreeSet<Rep>>,
    pub stages: Option<BTreeSet<Stage>>,
}

impl DealFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_reps(mut self, reps: impl IntoIterator<Item = Rep>) -> Self {
        self.reps = Some(reps.into_iter().collect());
        self
    }

    pub fn with_stages(mut self, stages: impl IntoIterator<Item = Stage>) -> Self {
        self.stages = Some(stages.into_iter().collect());
        self
    }

    pub fn matches(&self, deal: &Deal) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(deal.created.date_naive()) {
                return false;
            }
        }
        if let Some(reps) = &self.reps {
            if !reps.contains(&deal.rep) {
                return false;
            }
        }
        if let Some(stages) = &self.stages {
            if !stages.contains(&deal.stage) {
                return false;
            }
        }
        true
    }

    /// Keeps matching deals in input order.
    pub fn apply(&self, deals: &[Deal]) -> Vec<Deal> {
        deals.iter().filter(|deal| self.matches(deal)).cloned().collect()
    }
}
