use std::collections::BTreeSet;

use chrono::NaiveDate;
use entity::{Deal, Rep, Stage};
use serde::Serialize;

use crate::aggregate::{
    self, HistogramBin, Kpis, RepCount, StageAverage, StageCount, StalledDeal, StatusCount,
    WeeklyVolume, MAX_HISTOGRAM_BINS,
};
use crate::{DateRange, DealFilter, PipelineError, PipelineResult};

pub const INSIGHTS: [&str; 3] = [
    "Move deals faster from Qualification to Proposal",
    "Prioritize follow-up on stalled deals",
    "Coach low-performing reps with targeted guidance",
];

/// Inputs for one recompute pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardParams {
    pub deal_count: i64,
    pub date_range: DateRange,
    pub reps: BTreeSet<Rep>,
    pub stages: BTreeSet<Stage>,
    pub stalled_threshold_days: u32,
}

impl DashboardParams {
    pub const DEFAULT_DEAL_COUNT: i64 = 500;
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;
    pub const DEFAULT_STALLED_DAYS: u32 = 30;

    /// 500 deals, the 90 days up to `today`, every rep and stage, 30 day threshold.
    pub fn defaults_for(today: NaiveDate) -> Self {
        Self {
            deal_count: Self::DEFAULT_DEAL_COUNT,
            date_range: DateRange::trailing(today, Self::DEFAULT_LOOKBACK_DAYS),
            reps: Rep::ROSTER.into_iter().collect(),
            stages: Stage::ALL.into_iter().collect(),
            stalled_threshold_days: Self::DEFAULT_STALLED_DAYS,
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.deal_count < 0 {
            return Err(PipelineError::NegativeCount(self.deal_count));
        }
        Ok(())
    }

    pub fn filter(&self) -> DealFilter {
        DealFilter::all()
            .with_date_range(self.date_range)
            .with_reps(self.reps.iter().copied())
            .with_stages(self.stages.iter().copied())
    }
}

/// Human-readable KPI strings as shown on metric cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KpiDisplay {
    pub total_deals: String,
    pub win_rate: String,
    pub avg_value: String,
    pub median_time: String,
}

impl From<&Kpis> for KpiDisplay {
    fn from(kpis: &Kpis) -> Self {
        Self {
            total_deals: kpis.total_deals.to_string(),
            win_rate: format!("{:.1}%", kpis.win_rate),
            avg_value: format!("${}", group_thousands(kpis.avg_value.round() as i64)),
            median_time: format!("{:.0} d", kpis.median_time_in_stage),
        }
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Every table derived from one filtered deal set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub seed: u64,
    pub kpis: Kpis,
    pub kpi_display: KpiDisplay,
    pub status_breakdown: Vec<StatusCount>,
    pub open_funnel: Vec<StageCount>,
    pub rep_counts: Vec<RepCount>,
    pub avg_time_by_stage: Vec<StageAverage>,
    pub weekly_volume: Vec<WeeklyVolume>,
    pub time_in_stage_histogram: Vec<HistogramBin>,
    pub stalled_deals: Vec<StalledDeal>,
    pub insights: Vec<String>,
}

impl Dashboard {
    pub fn build(seed: u64, deals: &[Deal], stalled_threshold_days: u32) -> Self {
        let kpis = aggregate::kpis(deals);
        Self {
            seed,
            kpi_display: KpiDisplay::from(&kpis),
            kpis,
            status_breakdown: aggregate::status_breakdown(deals),
            open_funnel: aggregate::open_funnel(deals),
            rep_counts: aggregate::rep_counts(deals),
            avg_time_by_stage: aggregate::avg_time_by_stage(deals),
            weekly_volume: aggregate::weekly_volume(deals),
            time_in_stage_histogram: aggregate::time_in_stage_histogram(deals, MAX_HISTOGRAM_BINS),
            stalled_deals: aggregate::stalled_deals(deals, stalled_threshold_days),
            insights: INSIGHTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
