//! Upcoming-birthday arithmetic.
//!
//! Two windows exist side by side. [`congratulation_date`] looks ahead seven
//! days including today, rolls into next year when this year's date has
//! passed, and moves weekend dates to a Monday. [`notification_due`] only looks
//! at this year's date, excludes today, and never shifts. They answer slightly
//! different questions and are intentionally not unified.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Serialize, Serializer};

use crate::field::Birthday;

/// Output format for congratulation dates.
pub const CONGRATULATION_FORMAT: &str = "%Y.%m.%d";

/// How many days ahead both scans look.
pub const WINDOW_DAYS: i64 = 7;

/// A contact whose birthday falls in the upcoming window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingBirthday {
  pub name:                String,
  #[serde(serialize_with = "serialize_congratulation_date")]
  pub congratulation_date: NaiveDate,
}

impl UpcomingBirthday {
  /// The congratulation date as `YYYY.MM.DD`.
  pub fn formatted_date(&self) -> String {
    self.congratulation_date.format(CONGRATULATION_FORMAT).to_string()
  }
}

fn serialize_congratulation_date<S: Serializer>(
  date: &NaiveDate,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  serializer.collect_str(&date.format(CONGRATULATION_FORMAT))
}

/// The birthday's month and day placed in `year`.
///
/// 29 February falls on 1 March in years without a leap day.
pub fn occurrence_in(birthday: &Birthday, year: i32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
    .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// The date on which to congratulate, if the birthday is 0..=7 days away.
pub fn congratulation_date(birthday: &Birthday, today: NaiveDate) -> Option<NaiveDate> {
  let this_year = occurrence_in(birthday, today.year())?;
  let candidate = if this_year < today {
    occurrence_in(birthday, today.year() + 1)?
  } else {
    this_year
  };

  let days_until = (candidate - today).num_days();
  if !(0..=WINDOW_DAYS).contains(&days_until) {
    return None;
  }

  // Saturday is 5 and Sunday is 6; both move forward by `7 - weekday` days.
  let weekday = candidate.weekday().num_days_from_monday();
  if weekday >= 5 {
    candidate.checked_add_days(Days::new(u64::from(7 - weekday)))
  } else {
    Some(candidate)
  }
}

/// Whether this year's birthday is strictly after today and at most seven
/// days away. Dates already past this year are never considered.
pub fn notification_due(birthday: &Birthday, today: NaiveDate) -> bool {
  let Some(this_year) = occurrence_in(birthday, today.year()) else {
    return false;
  };
  let days_until = (this_year - today).num_days();
  0 < days_until && days_until <= WINDOW_DAYS
}
