use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::IndicatorFetcher;
use crate::analysis::technicals::{calculate_sma, valid_closes};
use crate::core::http::JsonSource;
use crate::error::{FetchError, FetchResult};
use crate::models::{TrendReading, VixReading};

pub const VIX_SYMBOL: &str = "^VIX";
pub const SP500_SYMBOL: &str = "^GSPC";
pub const MA_WINDOW: usize = 200;

fn chart_url(base_url: &str, symbol: &str) -> String {
    format!("{}/v8/finance/chart/{}", base_url, symbol)
}

/// Current VIX level from the chart endpoint's `meta` block.
pub struct VixFetcher {
    source: Arc<dyn JsonSource>,
    base_url: String,
    timeout: Duration,
}

impl VixFetcher {
    pub fn new(source: Arc<dyn JsonSource>, base_url: &str, timeout: Duration) -> Self {
        Self { source, base_url: base_url.to_string(), timeout }
    }

    fn parse_market_price(json: &Value) -> FetchResult<f64> {
        json.pointer("/chart/result/0/meta/regularMarketPrice")
            .and_then(Value::as_f64)
            .ok_or_else(|| FetchError::shape("chart.result[0].meta.regularMarketPrice missing"))
    }
}

#[async_trait]
impl IndicatorFetcher for VixFetcher {
    type Reading = VixReading;

    fn label(&self) -> &str {
        "VIX"
    }

    async fn try_fetch(&self) -> FetchResult<VixReading> {
        let url = chart_url(&self.base_url, VIX_SYMBOL);
        let json = self.source.get_json(&url, self.timeout).await?;
        let level = Self::parse_market_price(&json)?;
        log::debug!("VIX level {}", level);
        Ok(VixReading { level })
    }
}

/// S&P 500 last close against its 200-day simple moving average,
/// computed from one year of daily closes.
pub struct Sp500TrendFetcher {
    source: Arc<dyn JsonSource>,
    base_url: String,
    timeout: Duration,
}

impl Sp500TrendFetcher {
    pub fn new(source: Arc<dyn JsonSource>, base_url: &str, timeout: Duration) -> Self {
        Self { source, base_url: base_url.to_string(), timeout }
    }

    fn parse_closes(json: &Value) -> FetchResult<Vec<Option<f64>>> {
        let closes = json
            .pointer("/chart/result/0/indicators/quote/0/close")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::shape("chart.result[0].indicators.quote[0].close missing"))?;

        Ok(closes.iter().map(Value::as_f64).collect())
    }

    pub fn compute_trend(raw: &[Option<f64>]) -> FetchResult<TrendReading> {
        let closes = valid_closes(raw);
        let insufficient = FetchError::InsufficientHistory {
            required: MA_WINDOW,
            available: closes.len(),
        };

        let ma200 = match calculate_sma(&closes, MA_WINDOW) {
            Some(ma) => ma,
            None => return Err(insufficient),
        };
        let last_close = match closes.last() {
            Some(c) => *c,
            None => return Err(insufficient),
        };

        Ok(TrendReading { last_close, ma200 })
    }
}

#[async_trait]
impl IndicatorFetcher for Sp500TrendFetcher {
    type Reading = TrendReading;

    fn label(&self) -> &str {
        "S&P 500 data"
    }

    async fn try_fetch(&self) -> FetchResult<TrendReading> {
        let url = format!("{}?range=1y&interval=1d", chart_url(&self.base_url, SP500_SYMBOL));
        let json = self.source.get_json(&url, self.timeout).await?;
        let raw = Self::parse_closes(&json)?;
        let trend = Self::compute_trend(&raw)?;
        log::debug!("S&P 500 close {:.2}, MA200 {:.2} ({} raw points)", trend.last_close, trend.ma200, raw.len());
        Ok(trend)
    }
}
