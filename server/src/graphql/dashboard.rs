use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use entity::{Rep, Stage, Status};
use products_pipeline::Dashboard;
use products_pipeline::aggregate::{
    HistogramBin, Kpis, RepCount, StageAverage, StageCount, StalledDeal, StatusCount,
    WeeklyVolume,
};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum DealStage {
    #[graphql(name = "PROSPECTING")]
    Prospecting,
    #[graphql(name = "QUALIFICATION")]
    Qualification,
    #[graphql(name = "PROPOSAL")]
    Proposal,
    #[graphql(name = "NEGOTIATION")]
    Negotiation,
    #[graphql(name = "CLOSED_WON")]
    ClosedWon,
    #[graphql(name = "CLOSED_LOST")]
    ClosedLost,
}

impl From<Stage> for DealStage {
    fn from(value: Stage) -> Self {
        match value {
            Stage::Prospecting => DealStage::Prospecting,
            Stage::Qualification => DealStage::Qualification,
            Stage::Proposal => DealStage::Proposal,
            Stage::Negotiation => DealStage::Negotiation,
            Stage::ClosedWon => DealStage::ClosedWon,
            Stage::ClosedLost => DealStage::ClosedLost,
        }
    }
}

impl From<DealStage> for Stage {
    fn from(value: DealStage) -> Self {
        match value {
            DealStage::Prospecting => Stage::Prospecting,
            DealStage::Qualification => Stage::Qualification,
            DealStage::Proposal => Stage::Proposal,
            DealStage::Negotiation => Stage::Negotiation,
            DealStage::ClosedWon => Stage::ClosedWon,
            DealStage::ClosedLost => Stage::ClosedLost,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum SalesRep {
    #[graphql(name = "ALICE")]
    Alice,
    #[graphql(name = "BOB")]
    Bob,
    #[graphql(name = "CAROL")]
    Carol,
    #[graphql(name = "DAVID")]
    David,
}

impl From<Rep> for SalesRep {
    fn from(value: Rep) -> Self {
        match value {
            Rep::Alice => SalesRep::Alice,
            Rep::Bob => SalesRep::Bob,
            Rep::Carol => SalesRep::Carol,
            Rep::David => SalesRep::David,
        }
    }
}

impl From<SalesRep> for Rep {
    fn from(value: SalesRep) -> Self {
        match value {
            SalesRep::Alice => Rep::Alice,
            SalesRep::Bob => Rep::Bob,
            SalesRep::Carol => Rep::Carol,
            SalesRep::David => Rep::David,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum DealStatus {
    #[graphql(name = "OPEN")]
    Open,
    #[graphql(name = "WON")]
    Won,
    #[graphql(name = "LOST")]
    Lost,
}

impl From<Status> for DealStatus {
    fn from(value: Status) -> Self {
        match value {
            Status::Open => DealStatus::Open,
            Status::Won => DealStatus::Won,
            Status::Lost => DealStatus::Lost,
        }
    }
}

/// Sidebar controls. Omitted fields fall back to the session defaults.
#[derive(Clone, Debug, Default, InputObject)]
pub struct DashboardInput {
    #[graphql(name = "dealCount")]
    pub deal_count: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub reps: Option<Vec<SalesRep>>,
    pub stages: Option<Vec<DealStage>>,
    #[graphql(name = "stalledDays")]
    pub stalled_days: Option<i32>,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StagePayload {
    pub key: DealStage,
    #[graphql(name = "displayName")]
    pub display_name: String,
    #[graphql(name = "sortOrder")]
    pub sort_order: i32,
    #[graphql(name = "samplingWeight")]
    pub sampling_weight: f64,
    #[graphql(name = "isWon")]
    pub is_won: bool,
    #[graphql(name = "isLost")]
    pub is_lost: bool,
}

impl From<Stage> for StagePayload {
    fn from(stage: Stage) -> Self {
        Self {
            key: stage.into(),
            display_name: stage.display_name().to_string(),
            sort_order: stage.sort_order() as i32,
            sampling_weight: stage.sampling_weight(),
            is_won: stage.is_won(),
            is_lost: stage.is_lost(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct RepPayload {
    pub key: SalesRep,
    pub name: String,
}

impl From<Rep> for RepPayload {
    fn from(rep: Rep) -> Self {
        Self {
            key: rep.into(),
            name: rep.name().to_string(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct KpiDisplayPayload {
    #[graphql(name = "totalDeals")]
    pub total_deals: String,
    #[graphql(name = "winRate")]
    pub win_rate: String,
    #[graphql(name = "avgValue")]
    pub avg_value: String,
    #[graphql(name = "medianTime")]
    pub median_time: String,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct KpiPayload {
    #[graphql(name = "totalDeals")]
    pub total_deals: i32,
    #[graphql(name = "winRate")]
    pub win_rate: f64,
    #[graphql(name = "avgValue")]
    pub avg_value: f64,
    #[graphql(name = "medianTimeInStage")]
    pub median_time_in_stage: f64,
}

impl From<&Kpis> for KpiPayload {
    fn from(kpis: &Kpis) -> Self {
        Self {
            total_deals: kpis.total_deals as i32,
            win_rate: kpis.win_rate,
            avg_value: kpis.avg_value,
            median_time_in_stage: kpis.median_time_in_stage,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StatusCountPayload {
    pub status: DealStatus,
    pub count: i32,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StageCountPayload {
    pub stage: DealStage,
    pub count: i32,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct RepCountPayload {
    pub rep: SalesRep,
    pub count: i32,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StageAveragePayload {
    pub stage: DealStage,
    #[graphql(name = "avgDays")]
    pub avg_days: f64,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct WeeklyVolumePayload {
    #[graphql(name = "weekEnding")]
    pub week_ending: NaiveDate,
    pub deals: i32,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct HistogramBinPayload {
    pub start: i64,
    pub end: i64,
    pub count: i32,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct StalledDealPayload {
    pub rep: SalesRep,
    pub stage: DealStage,
    #[graphql(name = "timeInStage")]
    pub time_in_stage: i32,
    pub value: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DashboardPayload {
    pub seed: i64,
    pub kpis: KpiPayload,
    #[graphql(name = "kpiDisplay")]
    pub kpi_display: KpiDisplayPayload,
    #[graphql(name = "statusBreakdown")]
    pub status_breakdown: Vec<StatusCountPayload>,
    #[graphql(name = "openFunnel")]
    pub open_funnel: Vec<StageCountPayload>,
    #[graphql(name = "repCounts")]
    pub rep_counts: Vec<RepCountPayload>,
    #[graphql(name = "avgTimeByStage")]
    pub avg_time_by_stage: Vec<StageAveragePayload>,
    #[graphql(name = "weeklyVolume")]
    pub weekly_volume: Vec<WeeklyVolumePayload>,
    #[graphql(name = "timeInStageHistogram")]
    pub time_in_stage_histogram: Vec<HistogramBinPayload>,
    #[graphql(name = "stalledDeals")]
    pub stalled_deals: Vec<StalledDealPayload>,
    pub insights: Vec<String>,
}

impl From<Dashboard> for DashboardPayload {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            seed: dashboard.seed as i64,
            kpis: KpiPayload::from(&dashboard.kpis),
            kpi_display: KpiDisplayPayload {
                total_deals: dashboard.kpi_display.total_deals,
                win_rate: dashboard.kpi_display.win_rate,
                avg_value: dashboard.kpi_display.avg_value,
                median_time: dashboard.kpi_display.median_time,
            },
            status_breakdown: dashboard
                .status_breakdown
                .iter()
                .map(|StatusCount { status, count }| StatusCountPayload {
                    status: (*status).into(),
                    count: *count as i32,
                })
                .collect(),
            open_funnel: dashboard
                .open_funnel
                .iter()
                .map(|StageCount { stage, count }| StageCountPayload {
                    stage: (*stage).into(),
                    count: *count as i32,
                })
                .collect(),
            rep_counts: dashboard
                .rep_counts
                .iter()
                .map(|RepCount { rep, count }| RepCountPayload {
                    rep: (*rep).into(),
                    count: *count as i32,
                })
                .collect(),
            avg_time_by_stage: dashboard
                .avg_time_by_stage
                .iter()
                .map(|StageAverage { stage, avg_days }| StageAveragePayload {
                    stage: (*stage).into(),
                    avg_days: *avg_days,
                })
                .collect(),
            weekly_volume: dashboard
                .weekly_volume
                .iter()
                .map(|WeeklyVolume { week_ending, deals }| WeeklyVolumePayload {
                    week_ending: *week_ending,
                    deals: *deals as i32,
                })
                .collect(),
            time_in_stage_histogram: dashboard
                .time_in_stage_histogram
                .iter()
                .map(|HistogramBin { start, end, count }| HistogramBinPayload {
                    start: *start as i64,
                    end: *end as i64,
                    count: *count as i32,
                })
                .collect(),
            stalled_deals: dashboard
                .stalled_deals
                .iter()
                .map(StalledDealPayload::from)
                .collect(),
            insights: dashboard.insights,
        }
    }
}

impl From<&StalledDeal> for StalledDealPayload {
    fn from(deal: &StalledDeal) -> Self {
        Self {
            rep: deal.rep.into(),
            stage: deal.stage.into(),
            time_in_stage: deal.time_in_stage as i32,
            value: deal.value,
            created: deal.created,
            updated: deal.updated,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct RegeneratePayload {
    pub seed: i64,
}
