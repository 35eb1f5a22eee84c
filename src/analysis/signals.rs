use serde::Serialize;

use crate::models::{TrendReading, VixReading, YieldCurveReading};

// =============================================================================
// THRESHOLDS
// =============================================================================

pub const VIX_CAPITULATION: f64 = 45.0;
pub const VIX_WARNING: f64 = 25.0;
pub const DEEP_INVERSION_SPREAD: f64 = -0.75;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VixSignal {
    Capitulation, // > 45
    CrashWarning, // (25, 45]
    Normal,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    BelowMa200,
    AboveMa200,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CurveSignal {
    DeepInversion,
    NormalOrSteepening,
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

pub fn classify_vix(level: f64) -> VixSignal {
    if level > VIX_CAPITULATION {
        VixSignal::Capitulation
    } else if level > VIX_WARNING {
        VixSignal::CrashWarning
    } else {
        VixSignal::Normal
    }
}

/// Equal to the average counts as above.
pub fn classify_trend(last_close: f64, ma200: f64) -> TrendSignal {
    if last_close < ma200 {
        TrendSignal::BelowMa200
    } else {
        TrendSignal::AboveMa200
    }
}

/// Strict comparison: a spread of exactly -0.75 is not a deep inversion.
pub fn classify_curve(spread: f64) -> CurveSignal {
    if spread < DEEP_INVERSION_SPREAD {
        CurveSignal::DeepInversion
    } else {
        CurveSignal::NormalOrSteepening
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

pub fn vix_message(reading: &VixReading) -> String {
    let v = reading.level;
    match classify_vix(v) {
        VixSignal::Capitulation => format!("VIX ALERT: {} (Possible Capitulation Trigger)", v),
        VixSignal::CrashWarning => format!("VIX Warning: {} (Crash Phase Trigger)", v),
        VixSignal::Normal => format!("VIX Normal: {}", v),
    }
}

pub fn trend_message(reading: &TrendReading) -> String {
    let side = match classify_trend(reading.last_close, reading.ma200) {
        TrendSignal::BelowMa200 => "Below",
        TrendSignal::AboveMa200 => "Above",
    };
    format!(
        "S&P 500 {} 200MA: Price={:.2}, MA200={:.2}",
        side, reading.last_close, reading.ma200
    )
}

pub fn curve_message(reading: &YieldCurveReading) -> String {
    match classify_curve(reading.spread) {
        CurveSignal::DeepInversion => format!(
            "Yield Curve Deep Inversion: 2y={}%, 10y={}%, Spread={:.2}%",
            reading.yield_2y, reading.yield_10y, reading.spread
        ),
        CurveSignal::NormalOrSteepening => {
            format!("Yield Curve Normal/Steepening: Spread={:.2}%", reading.spread)
        }
    }
}
