use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::IndicatorFetcher;
use crate::core::http::JsonSource;
use crate::error::{FetchError, FetchResult};
use crate::models::YieldCurveReading;

pub const SERIES_2Y: &str = "DGS2";
pub const SERIES_10Y: &str = "DGS10";

/// 2y/10y constant-maturity Treasury yields from FRED. Without an API key
/// the fetcher is disabled.
pub struct YieldCurveFetcher {
    api_key: Option<String>,
    source: Arc<dyn JsonSource>,
    base_url: String,
    timeout: Duration,
}

impl YieldCurveFetcher {
    pub fn new(api_key: Option<String>, source: Arc<dyn JsonSource>, base_url: &str, timeout: Duration) -> Self {
        Self { api_key, source, base_url: base_url.to_string(), timeout }
    }

    fn observations_url(&self, series_id: &str, api_key: &str) -> String {
        format!(
            "{}/fred/series/observations?series_id={}&api_key={}&file_type=json",
            self.base_url, series_id, api_key
        )
    }

    async fn latest_value(&self, series_id: &str, api_key: &str) -> FetchResult<f64> {
        let url = self.observations_url(series_id, api_key);
        let json = self.source.get_json(&url, self.timeout).await?;
        Self::parse_latest_observation(&json).map_err(|e| match e {
            FetchError::DataShape(msg) => FetchError::shape(format!("{}: {}", series_id, msg)),
            other => other,
        })
    }

    /// Value of the last observation. FRED marks missing data with ".",
    /// which fails to parse and is reported like any other bad value.
    fn parse_latest_observation(json: &Value) -> FetchResult<f64> {
        let observations = json["observations"]
            .as_array()
            .ok_or_else(|| FetchError::shape("No observations found in FRED response"))?;

        let last = observations
            .last()
            .ok_or_else(|| FetchError::shape("FRED returned an empty observation list"))?;

        let value_str = last["value"]
            .as_str()
            .ok_or_else(|| FetchError::shape("observation has no value"))?;

        value_str
            .trim()
            .parse::<f64>()
            .map_err(|_| FetchError::shape(format!("could not convert value {:?} to float", value_str)))
    }
}

#[async_trait]
impl IndicatorFetcher for YieldCurveFetcher {
    type Reading = YieldCurveReading;

    fn label(&self) -> &str {
        "yield curve"
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn try_fetch(&self) -> FetchResult<YieldCurveReading> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FetchError::shape("FRED API key is missing"))?;

        // All or nothing: a failed 10y fetch discards a good 2y value.
        let y2 = self.latest_value(SERIES_2Y, api_key).await?;
        let y10 = self.latest_value(SERIES_10Y, api_key).await?;

        let reading = YieldCurveReading::new(y2, y10);
        log::debug!("Yield curve 2y={} 10y={} spread={:.2}", y2, y10, reading.spread);
        Ok(reading)
    }
}
