use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only text log mirrored to stdout.
///
/// The file is opened, appended and closed on every write so external
/// rotation or tailing never races a held handle.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one timestamped line. I/O failure here is fatal for the caller.
    pub fn log(&self, message: &str) -> Result<()> {
        self.log_at(Utc::now(), message)
    }

    pub fn log_at(&self, now: DateTime<Utc>, message: &str) -> Result<()> {
        let line = format_line(now, message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write log file {}", self.path.display()))?;

        println!("{}", line);
        Ok(())
    }
}

pub fn format_line(now: DateTime<Utc>, message: &str) -> String {
    format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S UTC"), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_log(name: &str) -> PathBuf {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        std::env::temp_dir().join(format!("event_log_{}_{}_{}.log", name, std::process::id(), nanos))
    }

    #[test]
    fn test_format_line() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_line(ts, "VIX Normal: 14.2"), "[2024-03-05 07:08:09 UTC] VIX Normal: 14.2");
    }

    #[test]
    fn test_appends_in_emission_order() {
        let path = temp_log("order");
        let log = EventLog::new(&path);
        log.log("first").unwrap();
        log.log("second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] first"));
        assert!(lines[1].ends_with("] second"));
        assert!(lines[0].starts_with('['));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let path = std::env::temp_dir().join("no_such_dir_for_event_log").join("x.log");
        let log = EventLog::new(path);
        assert!(log.log("lost").is_err());
    }
}
