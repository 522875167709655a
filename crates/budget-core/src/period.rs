//! Calendar month periods and month/year rollover projection
//!
//! Budgets are planned per (month, year). Bulk operations such as "apply to
//! future months" need the sequence of the next N periods, carrying the year
//! forward each time the month wraps from December to January.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One calendar month
///
/// `month` is always within 1..=12. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarPeriod {
    year: i32,
    month: u32,
}

impl CalendarPeriod {
    /// Create a period, rejecting months outside 1..=12 and years no date can hold
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidArgument(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        if !(NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&year) {
            return Err(Error::InvalidArgument(format!(
                "year must be between {} and {}, got {}",
                NaiveDate::MIN.year(),
                NaiveDate::MAX.year(),
                year
            )));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The period containing today's local date
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month immediately after this one, `None` past `i32::MAX`
    pub fn next(&self) -> Option<Self> {
        if self.month == 12 {
            Some(Self {
                year: self.year.checked_add(1)?,
                month: 1,
            })
        } else {
            Some(Self {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    /// First day of the month, if the year is representable
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// English month name ("January")
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Human-readable label ("January 2025")
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for CalendarPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Project `count` consecutive periods starting at (`start_month`, `start_year`)
///
/// The first element is the starting period itself. Each following element is
/// the next calendar month; the year increases exactly once per December to
/// January wrap. `count == 0` yields an empty vector.
///
/// Fails with [`Error::InvalidArgument`] when `start_month` is outside 1..=12,
/// `start_year` is outside the calendar chrono can represent, or `count` is
/// negative.
pub fn project_periods(
    start_month: u32,
    start_year: i32,
    count: i32,
) -> Result<Vec<CalendarPeriod>> {
    let start = CalendarPeriod::new(start_month, start_year)?;
    if count < 0 {
        return Err(Error::InvalidArgument(format!(
            "period count must not be negative, got {}",
            count
        )));
    }
    let periods = project_from(start, count as usize);
    if periods.len() != count as usize {
        return Err(Error::InvalidArgument(format!(
            "{} periods from {} run past the last representable year",
            count, start
        )));
    }
    Ok(periods)
}

/// Infallible form of [`project_periods`] for an already-valid start period
///
/// Stops early rather than wrapping if the year would pass `i32::MAX`.
pub fn project_from(start: CalendarPeriod, count: usize) -> Vec<CalendarPeriod> {
    std::iter::successors(Some(start), CalendarPeriod::next)
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(periods: &[CalendarPeriod]) -> Vec<(u32, i32)> {
        periods.iter().map(|p| (p.month(), p.year())).collect()
    }

    #[test]
    fn test_projection_across_year_end() {
        let periods = project_periods(11, 2024, 4).unwrap();
        assert_eq!(
            pairs(&periods),
            vec![(11, 2024), (12, 2024), (1, 2025), (2, 2025)]
        );
    }

    #[test]
    fn test_twelve_periods_from_every_start_month() {
        for start in 1..=12u32 {
            let periods = project_periods(start, 2024, 12).unwrap();
            assert_eq!(periods.len(), 12);
            assert_eq!((periods[0].month(), periods[0].year()), (start, 2024));

            for window in periods.windows(2) {
                let (prev, next) = (window[0], window[1]);
                if prev.month() == 12 {
                    assert_eq!(next.month(), 1);
                    assert_eq!(next.year(), prev.year() + 1);
                } else {
                    assert_eq!(next.month(), prev.month() + 1);
                    assert_eq!(next.year(), prev.year());
                }
            }

            // Twelve consecutive months cover every month exactly once
            let mut months: Vec<u32> = periods.iter().map(|p| p.month()).collect();
            months.sort_unstable();
            assert_eq!(months, (1..=12).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_january_start_stays_in_year() {
        let periods = project_periods(1, 2025, 12).unwrap();
        assert!(periods.iter().all(|p| p.year() == 2025));
        assert_eq!(periods.last().unwrap().month(), 12);
    }

    #[test]
    fn test_zero_count_is_empty() {
        for start in 1..=12u32 {
            assert!(project_periods(start, 2030, 0).unwrap().is_empty());
        }
    }

    #[test]
    fn test_long_projection_wraps_multiple_years() {
        let periods = project_periods(12, 2024, 25).unwrap();
        assert_eq!((periods[1].month(), periods[1].year()), (1, 2025));
        assert_eq!((periods[24].month(), periods[24].year()), (12, 2026));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            project_periods(13, 2024, 1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            project_periods(0, 2024, 1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            project_periods(1, 2024, -1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_next_wraps_december() {
        let dec = CalendarPeriod::new(12, 2024).unwrap();
        assert_eq!(dec.next(), Some(CalendarPeriod::new(1, 2025).unwrap()));
    }

    #[test]
    fn test_year_bounds() {
        assert!(matches!(
            project_periods(12, i32::MAX, 2),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            CalendarPeriod::new(1, i32::MIN),
            Err(Error::InvalidArgument(_))
        ));

        let last_year = NaiveDate::MAX.year();
        let periods = project_periods(12, last_year, 2).unwrap();
        assert_eq!(pairs(&periods), vec![(12, last_year), (1, last_year + 1)]);
        assert_eq!(periods[1].first_day(), None);
    }

    #[test]
    fn test_next_stops_at_i32_max() {
        let last = CalendarPeriod {
            year: i32::MAX,
            month: 12,
        };
        assert_eq!(last.next(), None);
        assert_eq!(project_from(last, 3), vec![last]);
    }

    #[test]
    fn test_contains_and_from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let period = CalendarPeriod::from_date(date);
        assert!(period.contains(date));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()));
        assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2025, 2, 1));
    }

    #[test]
    fn test_display_and_label() {
        let period = CalendarPeriod::new(3, 2025).unwrap();
        assert_eq!(period.to_string(), "2025-03");
        assert_eq!(period.label(), "March 2025");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = CalendarPeriod::new(12, 2024).unwrap();
        let b = CalendarPeriod::new(1, 2025).unwrap();
        assert!(a < b);
    }
}
