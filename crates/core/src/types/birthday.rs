//! Birth dates and the age derived from them.

use core::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Text formats accepted by [`Birthday::parse`], tried in order.
///
/// ISO 8601 is canonical; the long form matches how the sample roster
/// records birthdays (`September 1, 2011`).
const ACCEPTED_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y"];

/// Errors that can occur when parsing a [`Birthday`] or deriving an age.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BirthdayError {
    /// The input is not a valid calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// The birth date lies after the reference date.
    #[error("birth date is in the future")]
    NegativeAge,
}

/// A client's date of birth.
///
/// ## Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gym_roster_core::Birthday;
///
/// let birthday = Birthday::parse("2000-05-10").unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
/// assert_eq!(birthday.age_on(today).unwrap(), 23);
///
/// assert!(Birthday::parse("2000-02-30").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Parse a birth date from text.
    ///
    /// # Errors
    ///
    /// Returns [`BirthdayError::InvalidDate`] if the input matches none of the
    /// accepted formats or names a day that does not exist.
    pub fn parse(s: &str) -> Result<Self, BirthdayError> {
        let trimmed = s.trim();
        ACCEPTED_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            .map(Self)
            .ok_or_else(|| BirthdayError::InvalidDate(s.to_owned()))
    }

    /// Wrap an already-valid calendar date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole years elapsed between this birth date and `today`.
    ///
    /// The naive year difference is reduced by one when the birthday has not
    /// yet occurred in `today`'s year. A Feb 29 birthday counts as reached on
    /// Mar 1 in non-leap years.
    ///
    /// # Errors
    ///
    /// Returns [`BirthdayError::NegativeAge`] if the birth date is after `today`.
    pub fn age_on(&self, today: NaiveDate) -> Result<u32, BirthdayError> {
        if self.0 > today {
            return Err(BirthdayError::NegativeAge);
        }

        let mut years = today.year() - self.0.year();
        if (today.month(), today.day()) < (self.0.month(), self.0.day()) {
            years -= 1;
        }

        u32::try_from(years).map_err(|_| BirthdayError::NegativeAge)
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
