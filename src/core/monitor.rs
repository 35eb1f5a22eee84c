use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::signals::{self, CurveSignal, TrendSignal, VixSignal};
use crate::config::Config;
use crate::core::event_log::EventLog;
use crate::core::http::JsonSource;
use crate::fetcher::fred::YieldCurveFetcher;
use crate::fetcher::yahoo::{Sp500TrendFetcher, VixFetcher};
use crate::fetcher::IndicatorFetcher;

pub const STARTED_BANNER: &str = "=== Market Trigger Monitor Started ===";
pub const STOPPED_BANNER: &str = "=== Market Trigger Monitor Stopped ===";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    Continue,
    Stop,
}

/// Waits between cycles. The only place a running loop can be interrupted.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, interval: Duration) -> Pacing;
}

pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, interval: Duration) -> Pacing {
        tokio::time::sleep(interval).await;
        Pacing::Continue
    }
}

/// What one cycle classified. `None` means that indicator had no data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleReport {
    pub vix: Option<VixSignal>,
    pub trend: Option<TrendSignal>,
    pub curve: Option<CurveSignal>,
}

pub struct Monitor {
    vix: VixFetcher,
    sp500: Sp500TrendFetcher,
    yield_curve: YieldCurveFetcher,
    events: EventLog,
    interval: Duration,
    pacer: Box<dyn Pacer>,
}

impl Monitor {
    pub fn from_config(config: &Config, source: Arc<dyn JsonSource>, pacer: Box<dyn Pacer>) -> Self {
        let timeout = config.http_timeout();
        Self {
            vix: VixFetcher::new(source.clone(), &config.yahoo_base_url, timeout),
            sp500: Sp500TrendFetcher::new(source.clone(), &config.yahoo_base_url, timeout),
            yield_curve: YieldCurveFetcher::new(
                config.fred_api_key.clone(),
                source,
                &config.fred_base_url,
                timeout,
            ),
            events: EventLog::new(config.log_file.clone()),
            interval: config.check_interval(),
            pacer,
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Fetch, classify and log VIX, then S&P 500, then the yield curve.
    /// An indicator without data is skipped; the others still run.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        if let Some(reading) = self.vix.fetch(&self.events).await?.into_option() {
            report.vix = Some(signals::classify_vix(reading.level));
            self.events.log(&signals::vix_message(&reading))?;
        }

        if let Some(reading) = self.sp500.fetch(&self.events).await?.into_option() {
            report.trend = Some(signals::classify_trend(reading.last_close, reading.ma200));
            self.events.log(&signals::trend_message(&reading))?;
        }

        if let Some(reading) = self.yield_curve.fetch(&self.events).await?.into_option() {
            report.curve = Some(signals::classify_curve(reading.spread));
            self.events.log(&signals::curve_message(&reading))?;
        }

        Ok(report)
    }

    /// Runs until the pacer says stop. Returns early only on an event-log
    /// I/O error, which is fatal.
    pub async fn run(&self) -> Result<u64> {
        self.events.log(STARTED_BANNER)?;
        log::info!(
            "Checking every {}s, logging to {}",
            self.interval.as_secs(),
            self.events.path().display()
        );

        let mut cycles = 0u64;
        loop {
            let report = self.run_cycle().await?;
            cycles += 1;
            if log::log_enabled!(log::Level::Debug) {
                let summary = serde_json::to_string(&report).unwrap_or_default();
                log::debug!("Cycle {} done: {}", cycles, summary);
            }

            if self.pacer.pause(self.interval).await == Pacing::Stop {
                break;
            }
        }
        Ok(cycles)
    }
}
