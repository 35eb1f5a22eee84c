/// Simple moving average over the last `period` values.
/// Returns None when there are fewer than `period` values.
pub fn calculate_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let sum: f64 = data.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

/// Drop missing closes while keeping chronological order.
pub fn valid_closes(raw: &[Option<f64>]) -> Vec<f64> {
    raw.iter().filter_map(|c| *c).filter(|c| c.is_finite()).collect()
}
