use chrono::NaiveDate;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("deal count must be non-negative, got {0}")]
    NegativeCount(i64),
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid sampling distribution: {0}")]
    Distribution(String),
}

impl PipelineError {
    pub(crate) fn distribution(err: impl std::fmt::Display) -> Self {
        Self::Distribution(err.to_string())
    }

    /// True when the caller supplied bad parameters, as opposed to an internal fault.
    pub fn is_validation(&self) -> bool {
        !matches!(self, PipelineError::Distribution(_))
    }
}
