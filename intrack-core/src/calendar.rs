//! Calendar grid projection.
//!
//! Pure projection of a date-ordered interview list onto a fixed 6x7
//! month grid. No mutation, no I/O; re-run on every store update and
//! every month navigation.

use chrono::{Datelike, Duration, NaiveDate};

use crate::interview::Interview;

/// Number of cells in the projected grid: six ISO weeks of seven days.
pub const GRID_CELLS: usize = 42;

/// A year-month pair with a validated month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a year-month pair; `None` when the month is out of range,
    /// mirroring chrono's `_opt` constructors.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(YearMonth { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Month is validated in the constructor.
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("YearMonth holds a valid month")
    }

    pub fn next(&self) -> YearMonth {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> YearMonth {
        if self.month == 1 {
            YearMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn days_in_month(&self) -> u32 {
        (self.next().first_day() - self.first_day()).num_days() as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One grid cell: a calendar day and the interviews falling on it.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Leading/trailing overflow cell from the adjacent month. Renderers dim
    /// these without excluding their interviews.
    pub out_of_month: bool,
    pub interviews: Vec<Interview>,
}

/// Project interviews onto the 42-cell grid for `month`.
///
/// The grid starts on the Monday at or before the first of the month
/// (ISO week, so a Sunday first-of-month walks back six days) and runs 42
/// consecutive days. Interviews are bucketed by exact calendar-day equality.
pub fn project(interviews: &[Interview], month: YearMonth) -> Vec<DayBucket> {
    let first = month.first_day();
    let offset = first.weekday().num_days_from_monday() as i64;
    let grid_start = first - Duration::days(offset);

    (0..GRID_CELLS as i64)
        .map(|i| {
            let date = grid_start + Duration::days(i);
            DayBucket {
                date,
                out_of_month: !month.contains(date),
                interviews: interviews
                    .iter()
                    .filter(|iv| iv.date == date)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}
