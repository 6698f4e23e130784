//! Canonical song entity - normalization, casting, and comparison rules
//!
//! A [`Song`] is the adapter-independent representation of one track's
//! metadata. Adapters construct songs from foreign records (raw key/value
//! maps) through a per-family [`FieldTable`]; once constructed, no foreign
//! field names or encodings survive.

pub mod compare;
pub mod fields;

pub use compare::{decode_rating_token, Operand, STAR};
pub use fields::{Field, FieldTable, JSON_STORE_FIELDS, XML_LIBRARY_FIELDS};

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Wire format for added dates in serialized songs. Matches the JSON store
/// family's date grammar so written stores can be read back.
const DATE_WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Errors raised while normalizing a foreign record into a [`Song`].
#[derive(Debug, Error)]
pub enum SongError {
    /// A required canonical field is missing or empty after field-name
    /// mapping. Fatal for the record.
    #[error("required field '{field}' missing after normalization")]
    MissingField { field: Field },

    /// A present value could not be cast to its canonical type. Absorbed
    /// for optional fields under the lenient constructor.
    #[error("cannot cast '{value}' into field '{field}'")]
    Cast { field: Field, value: String },
}

/// The normalized, adapter-independent representation of one track.
///
/// `rating` uses the canonical 0–100 unit; 20 points per star. `date_added`
/// is parsed with the source family's date grammar, and the raw source text
/// is kept in `date_added_raw` for round-trip fidelity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub name: String,
    pub artist: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub played_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_date"
    )]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added_raw: Option<String>,
}

impl Song {
    /// Build a song from one foreign record.
    ///
    /// Every key is resolved through the field table exactly once; keys
    /// with no canonical counterpart are discarded. Cast failures on
    /// optional fields fall back to the absent value, so one malformed
    /// optional field never discards a record. Fails only when a required
    /// field (name, artist, location) is missing or empty after mapping.
    pub fn from_foreign(
        record: &HashMap<String, String>,
        table: &FieldTable,
    ) -> Result<Song, SongError> {
        Self::build(record, table, false)
    }

    /// Like [`Song::from_foreign`], but cast failures on optional fields
    /// are errors instead of falling back to the absent value.
    pub fn from_foreign_strict(
        record: &HashMap<String, String>,
        table: &FieldTable,
    ) -> Result<Song, SongError> {
        Self::build(record, table, true)
    }

    fn build(
        record: &HashMap<String, String>,
        table: &FieldTable,
        strict: bool,
    ) -> Result<Song, SongError> {
        let mut name = None;
        let mut artist = None;
        let mut location = None;
        let mut genre = None;
        let mut bpm = None;
        let mut rating = None;
        let mut played_count = None;
        let mut year = None;
        let mut date_added = None;
        let mut date_added_raw = None;

        for (key, value) in record {
            let field = match table.resolve(key) {
                Some(field) => field,
                None => continue,
            };
            match field {
                Field::Name => name = non_empty(value),
                Field::Artist => artist = non_empty(value),
                Field::Location => location = non_empty(value),
                Field::Genre => genre = non_empty(value),
                Field::Bpm => bpm = cast_int(field, value, strict)?,
                Field::Rating => {
                    rating = cast_int::<u8>(field, value, strict)?.map(|r| r.min(100))
                }
                Field::PlayedCount => played_count = cast_int(field, value, strict)?,
                Field::Year => year = cast_int(field, value, strict)?,
                Field::DateAdded => {
                    date_added_raw = non_empty(value);
                    date_added = cast_date(field, value, table.datetime_format, strict)?;
                }
            }
        }

        Ok(Song {
            name: name.ok_or(SongError::MissingField { field: Field::Name })?,
            artist: artist.ok_or(SongError::MissingField {
                field: Field::Artist,
            })?,
            location: location.ok_or(SongError::MissingField {
                field: Field::Location,
            })?,
            genre,
            bpm,
            rating,
            played_count,
            year,
            date_added,
            date_added_raw,
        })
    }

    /// Star count under the 5-star projection of the 0–100 rating unit.
    pub fn stars(&self) -> u8 {
        self.rating
            .map(|r| (u16::from(r) * 5 / 100) as u8)
            .unwrap_or(0)
    }

    /// Rating rendered as repeated star glyphs; empty when unrated.
    pub fn stars_display(&self) -> String {
        STAR.to_string().repeat(self.stars() as usize)
    }

    /// True iff `name` and `artist` match after case-insensitive,
    /// whitespace-normalized comparison. Used to match records across
    /// sources that used different capitalization or padding; distinct
    /// from structural equality.
    pub fn same_track(&self, other: &Song) -> bool {
        track_key(&self.name) == track_key(&other.name)
            && track_key(&self.artist) == track_key(&other.artist)
    }

    /// Compare two songs by rating, with the name as tie-break.
    pub fn cmp_by_rating(&self, other: &Song) -> Ordering {
        self.rating
            .unwrap_or(0)
            .cmp(&other.rating.unwrap_or(0))
            .then_with(|| self.name.cmp(&other.name))
    }

    fn compare(&self, operand: &Operand<'_>) -> Option<Ordering> {
        match operand {
            Operand::Year(year) => self.year.map(|own| own.cmp(year)),
            Operand::Stars(stars) => Some(self.stars().cmp(stars)),
            Operand::Song(other) => Some(self.cmp_by_rating(other)),
        }
    }

    /// Equality against an operand; a song with no year never matches a
    /// year operand.
    pub fn matches(&self, operand: &Operand<'_>) -> bool {
        self.compare(operand) == Some(Ordering::Equal)
    }

    /// Greater-or-equal against an operand.
    pub fn at_least(&self, operand: &Operand<'_>) -> bool {
        matches!(
            self.compare(operand),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }

    /// Strictly-less-than against an operand.
    pub fn below(&self, operand: &Operand<'_>) -> bool {
        self.compare(operand) == Some(Ordering::Less)
    }

    /// True when the given canonical field carries no value.
    pub fn field_is_empty(&self, field: Field) -> bool {
        match field {
            Field::Name => self.name.trim().is_empty(),
            Field::Artist => self.artist.trim().is_empty(),
            Field::Location => self.location.trim().is_empty(),
            Field::Genre => self.genre.is_none(),
            Field::Bpm => self.bpm.is_none(),
            Field::Rating => self.rating.is_none(),
            Field::PlayedCount => self.played_count.is_none(),
            Field::Year => self.year.is_none(),
            Field::DateAdded => self.date_added.is_none(),
        }
    }

    /// Clear an optional field. Returns `false` for required fields, which
    /// cannot be cleared.
    pub fn clear_field(&mut self, field: Field) -> bool {
        match field {
            Field::Name | Field::Artist | Field::Location => return false,
            Field::Genre => self.genre = None,
            Field::Bpm => self.bpm = None,
            Field::Rating => self.rating = None,
            Field::PlayedCount => self.played_count = None,
            Field::Year => self.year = None,
            Field::DateAdded => {
                self.date_added = None;
                self.date_added_raw = None;
            }
        }
        true
    }
}

impl fmt::Display for Song {
    /// Fixed-width, human-scannable line: artist, name, year, stars.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.year.map(|y| y.to_string()).unwrap_or_default();
        write!(
            f,
            "{} - {:<40} {:<6} {}",
            self.artist,
            self.name,
            year,
            self.stars_display()
        )
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn cast_int<T: std::str::FromStr>(
    field: Field,
    value: &str,
    strict: bool,
) -> Result<Option<T>, SongError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) if strict => Err(SongError::Cast {
            field,
            value: value.to_string(),
        }),
        Err(_) => Ok(None),
    }
}

fn cast_date(
    field: Field,
    value: &str,
    format: &str,
    strict: bool,
) -> Result<Option<DateTime<Utc>>, SongError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    match NaiveDateTime::parse_from_str(value.trim(), format) {
        Ok(naive) => Ok(Some(naive.and_utc())),
        Err(_) if strict => Err(SongError::Cast {
            field,
            value: value.to_string(),
        }),
        Err(_) => Ok(None),
    }
}

fn track_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn serialize_date<S: Serializer>(
    date: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&date.format(DATE_WIRE_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}
