use chrono::{Datelike, Months, NaiveDate};

pub const DAYS_PER_WEEK: u32 = 7;
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Shape of one month in a Sunday-first, seven column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    /// Weekday of the 1st, 0 = Sunday. Also the number of leading blank cells.
    pub start_day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Blank,
    Day(NaiveDate),
}

pub fn month_grid(date: NaiveDate) -> MonthGrid {
    let first = date.with_day(1).unwrap_or(date);
    let days_in_month = first
        .checked_add_months(Months::new(1))
        .and_then(|next_first| next_first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31);

    MonthGrid {
        year: first.year(),
        month: first.month(),
        days_in_month,
        start_day: first.weekday().num_days_from_sunday(),
    }
}

impl MonthGrid {
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn date_for_day(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.days_in_month {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn cells(&self) -> Vec<GridCell> {
        let blanks = (0..self.start_day).map(|_| GridCell::Blank);
        let days = (1..=self.days_in_month)
            .filter_map(|day| self.date_for_day(day))
            .map(GridCell::Day);
        blanks.chain(days).collect()
    }

    pub fn week_rows(&self) -> u32 {
        (self.start_day + self.days_in_month).div_ceil(DAYS_PER_WEEK)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Moves `date` by whole months. The day is clamped to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}
