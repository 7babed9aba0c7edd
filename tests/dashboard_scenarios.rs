use anyhow::Result;
use chrono::{Duration, NaiveDate};
use entity::{Rep, Stage, Status};
use products_pipeline::aggregate::{self, StatusCount, MAX_HISTOGRAM_BINS};
use products_pipeline::{Dashboard, DateRange, DealFilter, PipelineError};
use suite_tests::{anchor, deal, generator, session, ten_deal_book};

#[test]
fn generation_is_reproducible_for_a_key() -> Result<()> {
    let generator = generator();
    let first = generator.generate(500, 42)?;
    let second = generator.generate(500, 42)?;
    assert_eq!(first, second);
    assert_eq!(serde_json::to_vec(&first)?, serde_json::to_vec(&second)?);
    Ok(())
}

#[test]
fn generated_rows_hold_their_invariants() -> Result<()> {
    let generator = generator();
    for seed in [0, 1, 42, 77_777, 1_000_000] {
        for deal in generator.generate(250, seed)? {
            assert_eq!(
                deal.updated,
                deal.created + Duration::days(i64::from(deal.time_in_stage))
            );
            assert_eq!(deal.status, Status::for_stage(deal.stage));
        }
    }
    Ok(())
}

#[test]
fn empty_generation_aggregates_to_zero() -> Result<()> {
    let deals = generator().generate(0, 1)?;
    assert!(deals.is_empty());
    let dashboard = Dashboard::build(1, &deals, 30);
    assert_eq!(dashboard.kpis.total_deals, 0);
    assert_eq!(dashboard.kpis.win_rate, 0.0);
    assert_eq!(dashboard.kpis.avg_value, 0.0);
    assert_eq!(dashboard.kpis.median_time_in_stage, 0.0);
    assert!(dashboard.status_breakdown.is_empty());
    assert!(dashboard.open_funnel.iter().all(|row| row.count == 0));
    assert!(dashboard.rep_counts.is_empty());
    assert!(dashboard.avg_time_by_stage.iter().all(|row| row.avg_days == 0.0));
    assert!(dashboard.weekly_volume.is_empty());
    assert!(dashboard.time_in_stage_histogram.is_empty());
    assert!(dashboard.stalled_deals.is_empty());
    Ok(())
}

#[test]
fn win_rate_and_breakdown_for_a_known_book() {
    let book = ten_deal_book();
    let kpis = aggregate::kpis(&book);
    assert!((kpis.win_rate - 30.0).abs() < 1e-9);
    let breakdown = aggregate::status_breakdown(&book);
    assert_eq!(
        breakdown,
        vec![
            StatusCount { status: Status::Open, count: 5 },
            StatusCount { status: Status::Won, count: 3 },
            StatusCount { status: Status::Lost, count: 2 },
        ]
    );
}

#[test]
fn stalled_filter_keeps_only_long_running_open_deals() {
    let deals = vec![
        deal(Rep::Alice, Stage::Proposal, 45, 3, 5_000),
        deal(Rep::Bob, Stage::Proposal, 10, 3, 5_000),
    ];
    let stalled = aggregate::stalled_deals(&deals, 30);
    assert_eq!(stalled.len(), 1);
    assert_eq!(stalled[0].time_in_stage, 45);
    assert_eq!(stalled[0].rep, Rep::Alice);
}

#[test]
fn range_excluding_all_deals_yields_zero_kpis() -> Result<()> {
    let deals = generator().generate(400, 42)?;
    let far_past = DateRange::new(
        NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
    )?;
    let filtered = DealFilter::all().with_date_range(far_past).apply(&deals);
    assert!(filtered.is_empty());
    let dashboard = Dashboard::build(42, &filtered, 30);
    assert_eq!(dashboard.kpis.total_deals, 0);
    assert_eq!(dashboard.kpi_display.win_rate, "0.0%");
    assert_eq!(dashboard.kpi_display.avg_value, "$0");
    assert_eq!(dashboard.kpi_display.median_time, "0 d");
    assert!(dashboard.status_breakdown.is_empty());
    Ok(())
}

#[test]
fn per_stage_tables_always_cover_the_pipeline() -> Result<()> {
    let deals = generator().generate(300, 8)?;
    let only_won = DealFilter::all().with_stages([Stage::ClosedWon]).apply(&deals);
    let none: Vec<entity::Deal> = Vec::new();
    for subset in [&deals[..], &only_won[..], &none[..]] {
        let funnel = aggregate::open_funnel(subset);
        let averages = aggregate::avg_time_by_stage(subset);
        assert_eq!(funnel.iter().map(|r| r.stage).collect::<Vec<_>>(), Stage::ALL);
        assert_eq!(averages.iter().map(|r| r.stage).collect::<Vec<_>>(), Stage::ALL);
    }
    assert!(aggregate::open_funnel(&only_won).iter().all(|r| r.count == 0));
    Ok(())
}

#[test]
fn win_rate_stays_within_bounds() -> Result<()> {
    let generator = generator();
    for seed in 0..20 {
        let deals = generator.generate(120, seed)?;
        let rate = aggregate::kpis(&deals).win_rate;
        assert!((0.0..=100.0).contains(&rate), "seed {seed}: {rate}");
    }
    Ok(())
}

#[test]
fn filter_application_is_idempotent() -> Result<()> {
    let deals = generator().generate(500, 42)?;
    let range = DateRange::trailing(anchor().date_naive(), 30);
    let filter = DealFilter::all()
        .with_date_range(range)
        .with_reps([Rep::Carol])
        .with_stages([Stage::Prospecting, Stage::Negotiation]);
    let once = filter.apply(&deals);
    assert_eq!(filter.apply(&once), once);
    Ok(())
}

#[test]
fn histogram_partitions_all_deals() -> Result<()> {
    let deals = generator().generate(1_000, 5)?;
    let bins = aggregate::time_in_stage_histogram(&deals, MAX_HISTOGRAM_BINS);
    assert!(!bins.is_empty() && bins.len() <= MAX_HISTOGRAM_BINS);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), deals.len());
    Ok(())
}

#[test]
fn weekly_volume_is_chronological_and_complete() -> Result<()> {
    let deals = generator().generate(500, 42)?;
    let weeks = aggregate::weekly_volume(&deals);
    assert!(weeks.windows(2).all(|w| w[0].week_ending < w[1].week_ending));
    assert!(weeks.iter().all(|w| w.deals > 0));
    assert_eq!(weeks.iter().map(|w| w.deals).sum::<usize>(), deals.len());
    Ok(())
}

#[test]
fn session_recompute_follows_controls() -> Result<()> {
    let mut session = session(42);
    let mut params = session.default_params();
    params.deal_count = 800;
    params.reps = [Rep::Alice].into_iter().collect();
    params.stalled_threshold_days = 20;
    let dashboard = session.recompute(&params)?;
    assert_eq!(dashboard.rep_counts.len(), 1);
    assert_eq!(dashboard.rep_counts[0].rep, Rep::Alice);
    assert!(dashboard.stalled_deals.iter().all(|d| d.rep == Rep::Alice && d.time_in_stage > 20));

    let unfiltered = generator().generate(800, 42)?;
    let alice = unfiltered.iter().filter(|d| d.rep == Rep::Alice).count();
    assert_eq!(dashboard.kpis.total_deals, alice);
    Ok(())
}

#[test]
fn invalid_controls_are_rejected() {
    let mut session = session(42);
    let params = products_pipeline::DashboardParams {
        deal_count: -20,
        ..session.default_params()
    };
    assert_eq!(
        session.recompute(&params).unwrap_err(),
        PipelineError::NegativeCount(-20)
    );
    let today = anchor().date_naive();
    assert!(matches!(
        DateRange::new(today, today - Duration::days(1)),
        Err(PipelineError::InvalidDateRange { .. })
    ));
}
