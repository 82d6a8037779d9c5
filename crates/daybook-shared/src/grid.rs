use chrono::{
  Datelike,
  Duration,
  NaiveDate
};

use crate::date_key::DateKey;

pub const WEEKDAY_LABELS: [&str; 7] = [
  "Sun", "Mon", "Tue", "Wed", "Thu",
  "Fri", "Sat",
];

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum GridCell {
  /// Leading placeholder before day 1.
  Blank,
  Day {
    day: u32,
    key: DateKey
  }
}

impl GridCell {
  pub fn day(&self) -> Option<u32> {
    match self {
      | GridCell::Blank => None,
      | GridCell::Day {
        day, ..
      } => Some(*day)
    }
  }

  pub fn key(&self) -> Option<DateKey> {
    match self {
      | GridCell::Blank => None,
      | GridCell::Day {
        key, ..
      } => Some(*key)
    }
  }

  pub fn is_blank(&self) -> bool {
    matches!(self, GridCell::Blank)
  }
}

/// Layout of one calendar month,
/// Sunday-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
  first:         NaiveDate,
  start_day:     u32,
  days_in_month: u32,
  cells:         Vec<GridCell>
}

impl MonthGrid {
  pub fn year(&self) -> i32 {
    self.first.year()
  }

  pub fn month(&self) -> u32 {
    self.first.month()
  }

  /// Weekday index of day 1, 0 =
  /// Sunday.
  pub fn start_day(&self) -> u32 {
    self.start_day
  }

  pub fn days_in_month(&self) -> u32 {
    self.days_in_month
  }

  pub fn cells(&self) -> &[GridCell] {
    &self.cells
  }

  pub fn rows(
    &self
  ) -> impl Iterator<Item = &[GridCell]>
  {
    self.cells.chunks(7)
  }

  pub fn title(&self) -> String {
    self.first.format("%B %Y").to_string()
  }

  pub fn day(
    &self,
    day: u32
  ) -> Option<DateKey> {
    if day == 0
      || day > self.days_in_month
    {
      return None;
    }
    self.first
      .with_day(day)
      .map(DateKey::new)
  }

  pub fn contains(
    &self,
    key: DateKey
  ) -> bool {
    let date = key.date();
    date.year() == self.year()
      && date.month() == self.month()
  }
}

#[tracing::instrument]
pub fn build_month_grid(
  today: NaiveDate
) -> MonthGrid {
  let first = today
    .with_day(1)
    .unwrap_or(today);
  let start_day = first
    .weekday()
    .num_days_from_sunday();
  let days = days_in_month(
    today.year(),
    today.month()
  )
  .unwrap_or(today.day());

  let mut cells = Vec::with_capacity(
    (start_day + days) as usize
  );
  cells.extend(
    (0..start_day).map(|_| GridCell::Blank)
  );
  cells.extend((1..=days).filter_map(
    |day| {
      first.with_day(day).map(|date| {
        GridCell::Day {
          day,
          key: DateKey::new(date)
        }
      })
    }
  ));

  tracing::debug!(
    month = %first.format("%Y-%m"),
    start_day,
    days,
    "built month grid"
  );

  MonthGrid {
    first,
    start_day,
    days_in_month: days,
    cells
  }
}

/// `None` when `month` is not 1-12 or
/// the year is out of chrono's range.
pub fn first_day_of_month(
  year: i32,
  month: u32
) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, month, 1)
}

/// `None` when `month` is not 1-12 or
/// the year is out of chrono's range.
pub fn days_in_month(
  year: i32,
  month: u32
) -> Option<u32> {
  first_day_of_month(year, month)?;
  let next_first = if month == 12 {
    first_day_of_month(
      year.checked_add(1)?,
      1
    )?
  } else {
    first_day_of_month(year, month + 1)?
  };
  next_first
    .checked_sub_signed(Duration::days(1))
    .map(|last| last.day())
}
