mod dashboard;

use std::collections::BTreeSet;
use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema, SimpleObject};
use entity::{Rep, Stage};
use platform_api::{ApiError, ApiResult};
use products_pipeline::{DashboardParams, DateRange, PipelineError, Session};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::config::AppConfig;

pub use dashboard::{
    DashboardInput, DashboardPayload, RegeneratePayload, RepPayload, StagePayload,
};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Process-wide state shared with every resolver.
#[derive(Clone)]
pub struct GraphqlData {
    pub session: Arc<Mutex<Session>>,
    pub config: Arc<AppConfig>,
}

pub fn build_schema(data: GraphqlData) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(data)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> HealthPayload {
        HealthPayload { ok: true }
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    async fn stages(&self) -> Vec<StagePayload> {
        Stage::ALL.into_iter().map(StagePayload::from).collect()
    }

    async fn reps(&self) -> Vec<RepPayload> {
        Rep::ROSTER.into_iter().map(RepPayload::from).collect()
    }

    #[instrument(name = "graphql.seed", skip_all)]
    async fn seed(&self, ctx: &Context<'_>) -> async_graphql::Result<i64> {
        let data = ctx.data::<GraphqlData>()?;
        let session = data.session.lock().await;
        Ok(session.seed() as i64)
    }

    #[instrument(name = "graphql.dashboard", skip_all)]
    async fn dashboard(
        &self,
        ctx: &Context<'_>,
        input: Option<DashboardInput>,
    ) -> async_graphql::Result<DashboardPayload> {
        let data = ctx.data::<GraphqlData>()?;
        let mut session = data.session.lock().await;
        let params = resolve_params(input.unwrap_or_default(), &session, &data.config)
            .map_err(|err| err.extend())?;
        let dashboard = session
            .recompute(&params)
            .map_err(|err| ApiError::from(err).extend())?;
        Ok(dashboard.into())
    }
}

#[Object]
impl MutationRoot {
    #[instrument(name = "graphql.regenerate", skip_all)]
    async fn regenerate(&self, ctx: &Context<'_>) -> async_graphql::Result<RegeneratePayload> {
        let data = ctx.data::<GraphqlData>()?;
        let mut session = data.session.lock().await;
        let seed = session.regenerate();
        Ok(RegeneratePayload { seed: seed as i64 })
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}

/// Applies session defaults and configured bounds to raw controls.
fn resolve_params(
    input: DashboardInput,
    session: &Session,
    config: &AppConfig,
) -> ApiResult<DashboardParams> {
    let defaults = session.default_params();

    let deal_count = input
        .deal_count
        .map(i64::from)
        .unwrap_or(config.default_deal_count);
    if deal_count < 0 {
        return Err(PipelineError::NegativeCount(deal_count).into());
    }
    if !config.deal_count_bounds.contains(&deal_count) {
        return Err(ApiError::limit(format!(
            "dealCount must be within {}..={}",
            config.deal_count_bounds.start(),
            config.deal_count_bounds.end()
        )));
    }

    let from = input.from.unwrap_or(defaults.date_range.from());
    let to = input.to.unwrap_or(defaults.date_range.to());
    let date_range = DateRange::new(from, to)?;

    let stalled_threshold_days = match input.stalled_days {
        None => config.default_stalled_days,
        Some(days) => {
            let days = u32::try_from(days)
                .map_err(|_| ApiError::invalid("stalledDays must be non-negative"))?;
            if !config.stalled_days_bounds.contains(&days) {
                return Err(ApiError::limit(format!(
                    "stalledDays must be within {}..={}",
                    config.stalled_days_bounds.start(),
                    config.stalled_days_bounds.end()
                )));
            }
            days
        }
    };

    let reps: BTreeSet<Rep> = match input.reps {
        Some(selected) => selected.into_iter().map(Rep::from).collect(),
        None => defaults.reps,
    };
    let stages: BTreeSet<Stage> = match input.stages {
        Some(selected) => selected.into_iter().map(Stage::from).collect(),
        None => defaults.stages,
    };

    Ok(DashboardParams {
        deal_count,
        date_range,
        reps,
        stages,
        stalled_threshold_days,
    })
}
