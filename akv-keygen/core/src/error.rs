use chrono::NaiveDate;
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Incorrect date format '{date_str}', should be 'YYYY-MM-DD'"))]
    InvalidDateFormat { date_str: String, source: chrono::ParseError },

    #[snafu(display("Invalid expiration date '{date}', should be in the future (today is {today})"))]
    ExpirationNotInFuture { date: NaiveDate, today: NaiveDate },

    #[snafu(display("Expiration of {days} days from {today} is out of range"))]
    ExpirationOutOfRange { today: NaiveDate, days: u32 },

    #[snafu(display("Invalid tag '{tag}', tags should be 'key=value' pairs separated by ','"))]
    InvalidTag { tag: String },

    #[snafu(display("Invalid tag '{tag}', tag key must not be empty"))]
    EmptyTagKey { tag: String },

    #[snafu(display("Invalid secret identifier '{id}', expected '<vault uri>/secrets/<name>/<version>'"))]
    InvalidSecretId { id: String },
}
