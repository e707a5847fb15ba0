//! crates/chore_tracker_core/src/calendar.rs
//!
//! Projects chores onto a Sunday-first month grid by due date.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::domain::Chore;
use crate::error::{HouseholdError, HouseholdResult};

/// Six weeks of seven days.
pub const GRID_CELLS: usize = 42;

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

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day: u32,
    /// False for the filler days of the previous and next month.
    pub in_month: bool,
    pub is_today: bool,
    /// Chores due on this day. Always 0 for filler cells.
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    pub fn leading_fillers(&self) -> usize {
        self.cells.iter().take_while(|c| !c.in_month).count()
    }

    pub fn trailing_fillers(&self) -> usize {
        self.cells.iter().rev().take_while(|c| !c.in_month).count()
    }
}

/// The month currently shown, with previous/next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> HouseholdResult<Self> {
        first_of_month(year, month)?;
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }
}

fn first_of_month(year: i32, month: u32) -> HouseholdResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(HouseholdError::InvalidMonth { year, month })
}

fn cell(date: NaiveDate) -> CalendarCell {
    CalendarCell {
        date,
        day: date.day(),
        in_month: false,
        is_today: false,
        task_count: 0,
    }
}

/// Builds the 42-cell grid for `month` of `year`, counting chores by due date.
pub fn month_grid(
    year: i32,
    month: u32,
    chores: &[Chore],
    today: NaiveDate,
) -> HouseholdResult<MonthGrid> {
    let invalid = || HouseholdError::InvalidMonth { year, month };
    let first = first_of_month(year, month)?;
    let next_first = first.checked_add_months(Months::new(1)).ok_or_else(invalid)?;
    let leading = first.weekday().num_days_from_sunday() as u64;
    let grid_start = first.checked_sub_days(Days::new(leading)).ok_or_else(invalid)?;

    let cells = grid_start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| {
            if date < first || date >= next_first {
                return cell(date);
            }
            CalendarCell {
                in_month: true,
                is_today: date == today,
                task_count: chores.iter().filter(|c| c.due_date == date).count(),
                ..cell(date)
            }
        })
        .collect();

    Ok(MonthGrid {
        year,
        month,
        title: format!("{} {}", MONTH_NAMES[(month - 1) as usize], year),
        cells,
    })
}

/// Chores due on a single calendar day.
pub fn day_tasks(chores: &[Chore], date: NaiveDate) -> Vec<&Chore> {
    chores.iter().filter(|c| c.due_date == date).collect()
}
