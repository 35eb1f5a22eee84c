pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod fetcher;
pub mod models;

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::core::http::BrowserClient;
use crate::core::monitor::{Monitor, TokioPacer, STOPPED_BANNER};

/// Build the production monitor and run it until Ctrl-C or a fatal log error.
pub async fn run(config: Config) -> Result<()> {
    if config.fred_api_key.is_none() {
        log::warn!("FRED_API_KEY not set; yield curve checks are disabled");
    }

    let source = Arc::new(BrowserClient::new());
    let monitor = Monitor::from_config(&config, source, Box::new(TokioPacer));

    run_until(&monitor, tokio::signal::ctrl_c()).await
}

/// Race the monitor against a shutdown signal. A signal that fails to
/// register is logged and ignored; the monitor keeps running.
pub async fn run_until<S>(monitor: &Monitor, shutdown: S) -> Result<()>
where
    S: Future<Output = std::io::Result<()>>,
{
    let shutdown = async {
        match shutdown.await {
            Ok(()) => {}
            Err(e) => {
                log::warn!("Could not listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        result = monitor.run() => {
            result?;
        }
        _ = shutdown => {
            log::info!("Interrupt received, shutting down");
            monitor.events().log(STOPPED_BANNER)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::monitor::{Pacer, Pacing, STARTED_BANNER};
    use crate::fetcher::stub::StubSource;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Lets the loop run `cycles` times, then stops it.
    struct StopAfter {
        cycles: usize,
        seen: std::sync::Mutex<usize>,
    }

    #[async_trait]
    impl Pacer for StopAfter {
        async fn pause(&self, _interval: Duration) -> Pacing {
            let mut seen = self.seen.lock().unwrap();
            *seen += 1;
            if *seen >= self.cycles {
                Pacing::Stop
            } else {
                Pacing::Continue
            }
        }
    }

    fn monitor_with(name: &str, pacer: Box<dyn Pacer>) -> Monitor {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let config = Config {
            log_file: std::env::temp_dir().join(format!("lib_{}_{}_{}.log", name, std::process::id(), nanos)),
            yahoo_base_url: "http://yahoo.test".into(),
            ..Config::default()
        };
        Monitor::from_config(&config, Arc::new(StubSource::new()), pacer)
    }

    #[tokio::test]
    async fn test_failed_signal_registration_keeps_monitor_running() {
        let monitor = monitor_with("signal_err", Box::new(StopAfter { cycles: 2, seen: Default::default() }));
        let broken_signal = async { Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler")) };

        run_until(&monitor, broken_signal).await.unwrap();

        let content = std::fs::read_to_string(monitor.events().path()).unwrap();
        assert!(content.contains(STARTED_BANNER));
        assert_eq!(content.matches("Error fetching VIX").count(), 2);
        assert!(!content.contains(STOPPED_BANNER));
        let _ = std::fs::remove_file(monitor.events().path());
    }

    #[tokio::test]
    async fn test_signal_stops_monitor_with_banner() {
        let monitor = monitor_with("signal_ok", Box::new(TokioPacer));

        run_until(&monitor, async { Ok(()) }).await.unwrap();

        let content = std::fs::read_to_string(monitor.events().path()).unwrap();
        assert!(content.lines().last().unwrap().ends_with(STOPPED_BANNER));
        let _ = std::fs::remove_file(monitor.events().path());
    }
}
