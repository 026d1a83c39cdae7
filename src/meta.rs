//! Defines the [`MetaBlock`] and [`Author`] types and the logic for extracting
//! a meta block from the start of a document. A document looks like this:
//!
//! ````md
//! ```json
//! {"Title": "Hello", "Date": "2021-04-16T00:00:00Z", "Authors": []}
//! ```
//! # Hello
//!
//! World
//! ````
//!
//! Keys are matched without regard to case, and absent or `null` fields take
//! their zero values: an empty string, no authors, and the date `0001-01-01`.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// The token every document must begin with.
pub const META_BLOCK_START: &str = "```json\n";

/// The token closing the meta block. The first occurrence after
/// [`META_BLOCK_START`] wins.
pub const META_BLOCK_END: &str = "```\n";

/// An author of a document.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub mail: String,

    #[serde(deserialize_with = "null_as_default")]
    pub organization: String,

    /// The author's ORCID identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub orcid: String,
}

/// The structured header embedded at the start of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct MetaBlock {
    pub title: String,
    pub date: NaiveDate,
    pub authors: Vec<Author>,
}

/// The meta block as written, before the date is interpreted. Keys have
/// already been lower-cased by [`lowercase_keys`].
#[derive(Deserialize, Default)]
#[serde(default)]
struct Header {
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    date: Option<String>,
    authors: Option<Vec<Option<Author>>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lower-cases the keys of every object in `value`.
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Accepts an RFC 3339 timestamp, keeping the calendar date in the
/// timestamp's own offset, or a bare `YYYY-MM-DD` date. A missing date is
/// `0001-01-01`.
fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    let s = match date {
        None => return NaiveDate::from_ymd_opt(1, 1, 1).ok_or(Error::InvalidDate(String::new())),
        Some(s) => s,
    };
    let date = match DateTime::parse_from_rfc3339(s) {
        Ok(datetime) => datetime.naive_local().date(),
        Err(_) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(s.to_owned()))?,
    };
    if !(0..=9999).contains(&date.year()) {
        return Err(Error::InvalidDate(s.to_owned()));
    }
    Ok(date)
}

impl MetaBlock {
    /// Extracts the meta block from the start of `text`. Returns the parsed
    /// block and the byte offset at which the document body begins.
    pub fn extract(text: &str) -> Result<(MetaBlock, usize)> {
        if !text.starts_with(META_BLOCK_START) {
            return Err(Error::MissingStartFence);
        }
        let json_start = META_BLOCK_START.len();
        match text[json_start..].find(META_BLOCK_END) {
            None => Err(Error::MissingEndFence),
            Some(offset) => {
                let json_stop = json_start + offset;
                let meta_block = MetaBlock::from_json(&text[json_start..json_stop])?;
                Ok((meta_block, json_stop + META_BLOCK_END.len()))
            }
        }
    }

    fn from_json(json: &str) -> Result<MetaBlock> {
        let value = lowercase_keys(serde_json::from_str(json)?);
        let header: Header = Option::<Header>::deserialize(value)?.unwrap_or_default();
        Ok(MetaBlock {
            date: parse_date(header.date.as_deref())?,
            title: header.title,
            authors: header
                .authors
                .unwrap_or_default()
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
        })
    }

    /// The date as `YYYY-MM-DD`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Represents the result of a meta block extraction.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error extracting a [`MetaBlock`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the document doesn't begin with [`META_BLOCK_START`].
    MissingStartFence,

    /// Returned when the starting fence was found but [`META_BLOCK_END`]
    /// wasn't.
    MissingEndFence,

    /// Returned when the block isn't valid JSON of the expected shape.
    DeserializeJson(serde_json::Error),

    /// Returned when the date is neither RFC 3339 nor `YYYY-MM-DD`, or falls
    /// outside of the years 0000-9999.
    InvalidDate(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingStartFence => write!(f, "missing meta code block start"),
            Error::MissingEndFence => write!(f, "missing meta code block end"),
            Error::DeserializeJson(err) => err.fmt(f),
            Error::InvalidDate(date) => write!(f, "invalid date `{}`", date),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingStartFence => None,
            Error::MissingEndFence => None,
            Error::DeserializeJson(err) => Some(err),
            Error::InvalidDate(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_json`] deserialization functions.
    fn from(err: serde_json::Error) -> Error {
        Error::DeserializeJson(err)
    }
}
