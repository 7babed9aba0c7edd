use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use products_pipeline::{DashboardParams, session::DEFAULT_SEED};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub initial_seed: u64,
    pub deal_count_bounds: RangeInclusive<i64>,
    pub default_deal_count: i64,
    pub stalled_days_bounds: RangeInclusive<u32>,
    pub default_stalled_days: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_seed: DEFAULT_SEED,
            deal_count_bounds: 100..=2_000,
            default_deal_count: DashboardParams::DEFAULT_DEAL_COUNT,
            stalled_days_bounds: 10..=60,
            default_stalled_days: DashboardParams::DEFAULT_STALLED_DAYS,
            cors_allowed_origins: vec!["http://localhost:5173".into()],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let initial_seed = parsed(&lookup, "DASHBOARD_SEED")?.unwrap_or(defaults.initial_seed);

        let min_deals =
            parsed(&lookup, "DASHBOARD_MIN_DEALS")?.unwrap_or(*defaults.deal_count_bounds.start());
        let max_deals =
            parsed(&lookup, "DASHBOARD_MAX_DEALS")?.unwrap_or(*defaults.deal_count_bounds.end());
        if min_deals < 0 || min_deals > max_deals {
            return Err(anyhow!(
                "DASHBOARD_MIN_DEALS ({min_deals}) must be non-negative and at most DASHBOARD_MAX_DEALS ({max_deals})"
            ));
        }
        let default_deal_count =
            parsed(&lookup, "DASHBOARD_DEFAULT_DEALS")?.unwrap_or(defaults.default_deal_count);
        let deal_count_bounds = min_deals..=max_deals;
        if !deal_count_bounds.contains(&default_deal_count) {
            return Err(anyhow!(
                "DASHBOARD_DEFAULT_DEALS ({default_deal_count}) must lie within {min_deals}..={max_deals}"
            ));
        }

        let min_stalled = parsed(&lookup, "DASHBOARD_MIN_STALLED_DAYS")?
            .unwrap_or(*defaults.stalled_days_bounds.start());
        let max_stalled = parsed(&lookup, "DASHBOARD_MAX_STALLED_DAYS")?
            .unwrap_or(*defaults.stalled_days_bounds.end());
        if min_stalled > max_stalled {
            return Err(anyhow!(
                "DASHBOARD_MIN_STALLED_DAYS ({min_stalled}) exceeds DASHBOARD_MAX_STALLED_DAYS ({max_stalled})"
            ));
        }
        let default_stalled_days =
            parsed(&lookup, "DASHBOARD_STALLED_DAYS")?.unwrap_or(defaults.default_stalled_days);
        let stalled_days_bounds = min_stalled..=max_stalled;
        if !stalled_days_bounds.contains(&default_stalled_days) {
            return Err(anyhow!(
                "DASHBOARD_STALLED_DAYS ({default_stalled_days}) must lie within {min_stalled}..={max_stalled}"
            ));
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            initial_seed,
            deal_count_bounds,
            default_deal_count,
            stalled_days_bounds,
            default_stalled_days,
            cors_allowed_origins,
        })
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid {key}: {raw:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_dashboard_controls() {
        let config = load(&[]).unwrap();
        assert_eq!(config.initial_seed, 42);
        assert_eq!(config.deal_count_bounds, 100..=2_000);
        assert_eq!(config.default_deal_count, 500);
        assert_eq!(config.stalled_days_bounds, 10..=60);
        assert_eq!(config.default_stalled_days, 30);
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = load(&[
            ("DASHBOARD_SEED", "7"),
            ("DASHBOARD_MAX_DEALS", "5000"),
            ("DASHBOARD_DEFAULT_DEALS", "4000"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ])
        .unwrap();
        assert_eq!(config.initial_seed, 7);
        assert_eq!(config.deal_count_bounds, 100..=5_000);
        assert_eq!(config.default_deal_count, 4_000);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn garbage_numbers_fail_with_context() {
        let err = load(&[("DASHBOARD_SEED", "forty-two")]).unwrap_err();
        assert!(err.to_string().contains("DASHBOARD_SEED"));
    }

    #[test]
    fn inconsistent_bounds_are_rejected() {
        assert!(load(&[("DASHBOARD_MIN_DEALS", "3000")]).is_err());
        assert!(load(&[("DASHBOARD_DEFAULT_DEALS", "50")]).is_err());
        assert!(load(&[("DASHBOARD_STALLED_DAYS", "90")]).is_err());
    }
}
