//! Descriptive aggregations over a (possibly filtered) deal slice.
//!
//! Every function accepts an empty slice and degrades to zero-filled or
//! empty output. Per-stage tables always carry one row per stage in
//! pipeline order.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use entity::{Deal, Rep, Stage, Status};
use serde::Serialize;

pub const MAX_HISTOGRAM_BINS: usize = 20;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_deals: usize,
    /// Percentage in `[0, 100]`.
    pub win_rate: f64,
    pub avg_value: f64,
    pub median_time_in_stage: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: Stage,
    pub count: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepCount {
    pub rep: Rep,
    pub count: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct StageAverage {
    pub stage: Stage,
    pub avg_days: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeeklyVolume {
    /// Sunday closing the bucket.
    pub week_ending: NaiveDate,
    pub deals: usize,
}

/// Half-open bin `[start, end)` over days in stage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub start: u64,
    pub end: u64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StalledDeal {
    pub rep: Rep,
    pub stage: Stage,
    pub time_in_stage: u32,
    pub value: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<&Deal> for StalledDeal {
    fn from(deal: &Deal) -> Self {
        Self {
            rep: deal.rep,
            stage: deal.stage,
            time_in_stage: deal.time_in_stage,
            value: deal.value,
            created: deal.created,
            updated: deal.updated,
        }
    }
}

pub fn kpis(deals: &[Deal]) -> Kpis {
    let total = deals.len();
    let won = deals.iter().filter(|d| d.status == Status::Won).count();
    let win_rate = won as f64 / total.max(1) as f64 * 100.0;
    let avg_value = if total == 0 {
        0.0
    } else {
        deals.iter().map(|d| d.value as f64).sum::<f64>() / total as f64
    };
    let mut days: Vec<u32> = deals.iter().map(|d| d.time_in_stage).collect();
    days.sort_unstable();
    Kpis {
        total_deals: total,
        win_rate,
        avg_value,
        median_time_in_stage: median(&days),
    }
}

fn median(sorted: &[u32]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        f64::from(sorted[n / 2])
    } else {
        (f64::from(sorted[n / 2 - 1]) + f64::from(sorted[n / 2])) / 2.0
    }
}

/// Counts per status, most frequent first; absent statuses are omitted.
pub fn status_breakdown(deals: &[Deal]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<Status, usize> = BTreeMap::new();
    for deal in deals {
        *counts.entry(deal.status).or_default() += 1;
    }
    let mut rows: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    rows.sort_by_key(|row| Reverse(row.count));
    rows
}

/// Open deals per stage, zero-filled across the whole pipeline.
pub fn open_funnel(deals: &[Deal]) -> Vec<StageCount> {
    let mut counts = [0usize; Stage::ALL.len()];
    for deal in deals.iter().filter(|d| d.is_open()) {
        counts[deal.stage.sort_order()] += 1;
    }
    Stage::ALL
        .iter()
        .map(|&stage| StageCount {
            stage,
            count: counts[stage.sort_order()],
        })
        .collect()
}

/// Deals per rep, most frequent first; reps without deals are omitted.
pub fn rep_counts(deals: &[Deal]) -> Vec<RepCount> {
    let mut counts: BTreeMap<Rep, usize> = BTreeMap::new();
    for deal in deals {
        *counts.entry(deal.rep).or_default() += 1;
    }
    let mut rows: Vec<RepCount> = counts
        .into_iter()
        .map(|(rep, count)| RepCount { rep, count })
        .collect();
    rows.sort_by_key(|row| Reverse(row.count));
    rows
}

pub fn avg_time_by_stage(deals: &[Deal]) -> Vec<StageAverage> {
    let mut sums = [(0u64, 0usize); Stage::ALL.len()];
    for deal in deals {
        let slot = &mut sums[deal.stage.sort_order()];
        slot.0 += u64::from(deal.time_in_stage);
        slot.1 += 1;
    }
    Stage::ALL
        .iter()
        .map(|&stage| {
            let (total, count) = sums[stage.sort_order()];
            let avg_days = if count == 0 {
                0.0
            } else {
                total as f64 / count as f64
            };
            StageAverage { stage, avg_days }
        })
        .collect()
}

/// Deals bucketed by the Sunday-ending week of their created date.
pub fn weekly_volume(deals: &[Deal]) -> Vec<WeeklyVolume> {
    let mut weeks: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for deal in deals {
        *weeks.entry(week_ending(deal.created.date_naive())).or_default() += 1;
    }
    weeks
        .into_iter()
        .map(|(week_ending, deals)| WeeklyVolume { week_ending, deals })
        .collect()
}

fn week_ending(date: NaiveDate) -> NaiveDate {
    let offset = (7 - date.weekday().num_days_from_sunday()) % 7;
    date + Duration::days(i64::from(offset))
}

/// Histogram of days in stage with at most `max_bins` bins (capped at
/// [`MAX_HISTOGRAM_BINS`]). Bin width is the smallest of 1, 2, 5 x 10^k
/// that covers the observed range.
pub fn time_in_stage_histogram(deals: &[Deal], max_bins: usize) -> Vec<HistogramBin> {
    let max_bins = max_bins.clamp(1, MAX_HISTOGRAM_BINS) as u64;
    let Some((min, max)) = deals.iter().fold(None, |acc: Option<(u64, u64)>, deal| {
        let days = u64::from(deal.time_in_stage);
        Some(match acc {
            None => (days, days),
            Some((lo, hi)) => (lo.min(days), hi.max(days)),
        })
    }) else {
        return Vec::new();
    };

    let step = nice_step(min, max, max_bins);
    let start = min / step * step;
    let bins = (max - start) / step + 1;
    let mut counts = vec![0usize; bins as usize];
    for deal in deals {
        let idx = (u64::from(deal.time_in_stage) - start) / step;
        counts[idx as usize] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| {
            let lo = start + idx as u64 * step;
            HistogramBin {
                start: lo,
                end: lo + step,
                count,
            }
        })
        .collect()
}

fn nice_step(min: u64, max: u64, max_bins: u64) -> u64 {
    let mut magnitude = 1u64;
    loop {
        for factor in [1, 2, 5] {
            let step = factor * magnitude;
            let start = min / step * step;
            if (max - start) / step < max_bins {
                return step;
            }
        }
        magnitude *= 10;
    }
}

/// Open deals idle for more than `threshold_days`, in input order.
pub fn stalled_deals(deals: &[Deal], threshold_days: u32) -> Vec<StalledDeal> {
    deals
        .iter()
        .filter(|d| d.is_open() && d.time_in_stage > threshold_days)
        .map(StalledDeal::from)
        .collect()
}
