//! Calendar periods and their classification
//!
//! A period is a (year, month) pair. All month arithmetic happens in UTC: the
//! month window used for cost scans, the day-of-month shown in reports and
//! the "current month" used for cache decisions all agree on the same clock.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Earliest year reports are served for
pub const MIN_REPORT_YEAR: i32 = 1970;
/// Latest year reports are served for
pub const MAX_REPORT_YEAR: i32 = 2100;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

/// Where a period sits relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Past,
    Current,
    Future,
}

impl PeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Current => "current",
            Self::Future => "future",
        }
    }
}

impl std::fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Reject periods outside the years and months reports are served for
    pub fn ensure_reportable(&self) -> Result<()> {
        if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&self.year) {
            return Err(Error::InvalidData(format!(
                "year must be between {} and {}",
                MIN_REPORT_YEAR, MAX_REPORT_YEAR
            )));
        }
        if !(1..=12).contains(&self.month) {
            return Err(Error::InvalidData(
                "month must be between 1 and 12".to_string(),
            ));
        }
        Ok(())
    }

    /// The period containing a given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Classify against `today`'s calendar month
    ///
    /// Any integers are accepted; out-of-range months still order
    /// lexicographically by (year, month).
    pub fn classify(&self, today: NaiveDate) -> PeriodKind {
        let current = (today.year(), today.month());
        match (self.year, self.month).cmp(&current) {
            std::cmp::Ordering::Less => PeriodKind::Past,
            std::cmp::Ordering::Equal => PeriodKind::Current,
            std::cmp::Ordering::Greater => PeriodKind::Future,
        }
    }

    /// Half-open UTC window `[first of month, first of next month)`
    pub fn bounds(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let invalid = || Error::InvalidPeriod {
            year: self.year,
            month: self.month,
        };

        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if self.month == 12 {
            (self.year.checked_add(1).ok_or_else(invalid)?, 1)
        } else {
            (self.year, self.month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;

        Ok((start.and_time(chrono::NaiveTime::MIN), end.and_time(chrono::NaiveTime::MIN)))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Source of "today" for period classification
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, UTC calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_classify() {
        let today = date(2024, 6, 15);
        assert_eq!(Period::new(2024, 6).classify(today), PeriodKind::Current);
        assert_eq!(Period::new(2024, 5).classify(today), PeriodKind::Past);
        assert_eq!(Period::new(2023, 12).classify(today), PeriodKind::Past);
        assert_eq!(Period::new(2024, 7).classify(today), PeriodKind::Future);
        assert_eq!(Period::new(2025, 1).classify(today), PeriodKind::Future);
    }

    #[test]
    fn test_classify_ignores_day_of_month() {
        assert_eq!(
            Period::new(2024, 2).classify(date(2024, 2, 1)),
            PeriodKind::Current
        );
        assert_eq!(
            Period::new(2024, 2).classify(date(2024, 2, 29)),
            PeriodKind::Current
        );
    }

    #[test]
    fn test_classify_out_of_range_values() {
        let today = date(2024, 6, 15);
        assert_eq!(Period::new(2024, 13).classify(today), PeriodKind::Future);
        assert_eq!(Period::new(2024, 0).classify(today), PeriodKind::Past);
        assert_eq!(Period::new(-5, 3).classify(today), PeriodKind::Past);
    }

    #[test]
    fn test_bounds() {
        let (start, end) = Period::new(2024, 2).bounds().unwrap();
        assert_eq!(start, date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end, date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_bounds_december_rolls_year() {
        let (start, end) = Period::new(2023, 12).bounds().unwrap();
        assert_eq!(start.date(), date(2023, 12, 1));
        assert_eq!(end.date(), date(2024, 1, 1));
    }

    #[test]
    fn test_bounds_invalid_month() {
        assert!(matches!(
            Period::new(2024, 13).bounds(),
            Err(Error::InvalidPeriod { year: 2024, month: 13 })
        ));
        assert!(Period::new(2024, 0).bounds().is_err());
    }

    #[test]
    fn test_ensure_reportable() {
        assert!(Period::new(1970, 1).ensure_reportable().is_ok());
        assert!(Period::new(2100, 12).ensure_reportable().is_ok());

        let err = Period::new(1969, 12).ensure_reportable().unwrap_err();
        assert!(err.to_string().contains("year must be between 1970 and 2100"));
        assert!(Period::new(2101, 1).ensure_reportable().is_err());

        let err = Period::new(2024, 13).ensure_reportable().unwrap_err();
        assert!(err.to_string().contains("month must be between 1 and 12"));
        assert!(Period::new(2024, 0).ensure_reportable().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::new(2024, 3).to_string(), "2024-03");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(date(2030, 1, 2));
        assert_eq!(clock.today(), date(2030, 1, 2));
    }
}
