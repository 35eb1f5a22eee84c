/// Per-cycle result of one indicator fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Value(T),
    NoData,
}

impl<T> FetchOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Value(v) => Some(v),
            FetchOutcome::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, FetchOutcome::NoData)
    }
}

impl<T> From<Option<T>> for FetchOutcome<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => FetchOutcome::Value(v),
            None => FetchOutcome::NoData,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VixReading {
    pub level: f64,
}

/// Latest S&P 500 close against its 200-day simple moving average
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendReading {
    pub last_close: f64,
    pub ma200: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldCurveReading {
    pub yield_2y: f64,
    pub yield_10y: f64,
    /// 10y - 2y, in percentage points
    pub spread: f64,
}

impl YieldCurveReading {
    pub fn new(yield_2y: f64, yield_10y: f64) -> Self {
        Self { yield_2y, yield_10y, spread: yield_10y - yield_2y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_is_ten_minus_two() {
        let yc = YieldCurveReading::new(4.50, 3.75);
        assert_eq!(yc.spread, -0.75);
    }

    #[test]
    fn test_outcome_from_option() {
        let some: FetchOutcome<i32> = Some(3).into();
        assert_eq!(some.into_option(), Some(3));
        let none: FetchOutcome<i32> = None.into();
        assert!(none.is_no_data());
    }
}
