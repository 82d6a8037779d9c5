use std::fmt;
use std::str::FromStr;

use chrono::{
  Datelike,
  NaiveDate
};
use serde::{
  Deserialize,
  Serialize
};
use thiserror::Error;

pub const DATE_KEY_FORMAT: &str =
  "%Y-%m-%d";

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
#[error(
  "invalid date key `{0}`: expected \
   YYYY-MM-DD"
)]
pub struct DateKeyError(pub String);

/// Calendar date keyed by its
/// canonical `YYYY-MM-DD` form.
///
/// Serializes as that string, so it
/// can sit directly in a JSON object
/// key position.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(
  try_from = "String",
  into = "String"
)]
pub struct DateKey(NaiveDate);

impl DateKey {
  pub fn new(date: NaiveDate) -> Self {
    Self(date)
  }

  pub fn date(&self) -> NaiveDate {
    self.0
  }

  pub fn day(&self) -> u32 {
    self.0.day()
  }

  pub fn parse(
    raw: &str
  ) -> Result<Self, DateKeyError> {
    let date = NaiveDate::parse_from_str(
      raw,
      DATE_KEY_FORMAT
    )
    .map_err(|_| {
      DateKeyError(raw.to_string())
    })?;

    // chrono accepts unpadded fields;
    // only the canonical spelling is a
    // key.
    if date
      .format(DATE_KEY_FORMAT)
      .to_string()
      != raw
    {
      return Err(DateKeyError(
        raw.to_string()
      ));
    }

    Ok(Self(date))
  }
}

impl From<NaiveDate> for DateKey {
  fn from(date: NaiveDate) -> Self {
    Self(date)
  }
}

impl fmt::Display for DateKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{}",
      self.0.format(DATE_KEY_FORMAT)
    )
  }
}

impl FromStr for DateKey {
  type Err = DateKeyError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for DateKey {
  type Error = DateKeyError;

  fn try_from(
    value: String
  ) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl From<DateKey> for String {
  fn from(key: DateKey) -> Self {
    key.to_string()
  }
}
