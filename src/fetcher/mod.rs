use anyhow::Result;
use async_trait::async_trait;

use crate::core::event_log::EventLog;
use crate::error::FetchResult;
use crate::models::FetchOutcome;

pub mod fred;
pub mod yahoo;

/// One market indicator. `try_fetch` may fail in any way; `fetch` is the
/// failure boundary that turns every fetch error into `NoData`.
#[async_trait]
pub trait IndicatorFetcher: Send + Sync {
    type Reading: Send;

    /// Used in error lines: "Error fetching <label>: ..."
    fn label(&self) -> &str;

    /// Disabled fetchers yield `NoData` without touching the network.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn try_fetch(&self) -> FetchResult<Self::Reading>;

    /// Only an event-log write failure escapes as `Err`.
    async fn fetch(&self, events: &EventLog) -> Result<FetchOutcome<Self::Reading>> {
        if !self.is_enabled() {
            log::debug!("{} fetcher disabled, skipping", self.label());
            return Ok(FetchOutcome::NoData);
        }

        match self.try_fetch().await {
            Ok(reading) => Ok(FetchOutcome::Value(reading)),
            Err(e) if !e.is_reportable() => {
                log::debug!("{}: {}", self.label(), e);
                Ok(FetchOutcome::NoData)
            }
            Err(e) => {
                events.log(&format!("Error fetching {}: {}", self.label(), e))?;
                Ok(FetchOutcome::NoData)
            }
        }
    }
}
