use std::fmt::{self, Display, Formatter};

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};

use crate::error::{self, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date on which a secret stops being valid.
///
/// Always later than the day it was created on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Expiration(NaiveDate);

impl Expiration {
    /// Parses `YYYY-MM-DD` and checks the date lies strictly after `today`.
    ///
    /// # Errors
    /// Returns an error if the text is not a calendar date or the date is not
    /// in the future.
    pub fn parse(date_str: &str, today: NaiveDate) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT)
            .context(error::InvalidDateFormatSnafu { date_str })?;
        Self::new(date, today)
    }

    /// # Errors
    /// Returns an error if `date` is not after `today`.
    pub fn new(date: NaiveDate, today: NaiveDate) -> Result<Self> {
        snafu::ensure!(date > today, error::ExpirationNotInFutureSnafu { date, today });
        Ok(Self(date))
    }

    /// # Errors
    /// Returns an error if `days` is zero or the date overflows.
    pub fn days_after(today: NaiveDate, days: u32) -> Result<Self> {
        let date = today
            .checked_add_days(Days::new(u64::from(days)))
            .context(error::ExpirationOutOfRangeSnafu { today, days })?;
        Self::new(date, today)
    }

    #[inline]
    #[must_use]
    pub fn today() -> NaiveDate { Local::now().date_naive() }

    #[inline]
    #[must_use]
    pub const fn date(&self) -> NaiveDate { self.0 }
}

impl Display for Expiration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}
