//! Year and age conversions
//!
//! A date of birth is the only true date input; everything else is an
//! absolute calendar year. Ages are always derived from the DOB on demand,
//! never stored, using a whole-year convention consistent with the rest of
//! the engine (no birthday-month proration).

use chrono::{Datelike, NaiveDate};

/// Age attained during a calendar year.
pub fn age_at(dob: NaiveDate, year: i32) -> i32 {
    year - dob.year()
}

/// The calendar year in which a person reaches a target age.
pub fn year_for_age(dob: NaiveDate, age: u8) -> i32 {
    dob.year() + i32::from(age)
}

/// Number of years in an inclusive range, zero if inverted.
pub fn years_between(start_year: i32, end_year: i32) -> u32 {
    (end_year - start_year + 1).max(0) as u32
}
