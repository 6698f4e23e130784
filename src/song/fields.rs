//! Canonical song fields and per-source field-name tables
//!
//! Every source names its fields differently (`Play Count`, `play_count`,
//! `playedCount`). A [`FieldTable`] maps one source family's names onto the
//! canonical [`Field`] set; keys the table does not rename map to themselves.

use std::fmt;

/// The canonical song fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Artist,
    Location,
    Genre,
    Bpm,
    Rating,
    PlayedCount,
    Year,
    DateAdded,
}

impl Field {
    /// Every canonical field, in declaration order.
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Artist,
        Field::Location,
        Field::Genre,
        Field::Bpm,
        Field::Rating,
        Field::PlayedCount,
        Field::Year,
        Field::DateAdded,
    ];

    /// Canonical field name (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Artist => "artist",
            Field::Location => "location",
            Field::Genre => "genre",
            Field::Bpm => "bpm",
            Field::Rating => "rating",
            Field::PlayedCount => "played_count",
            Field::Year => "year",
            Field::DateAdded => "date_added",
        }
    }

    /// Parse a canonical field name. Case-insensitive.
    pub fn parse(s: &str) -> Option<Field> {
        match s.to_lowercase().as_str() {
            "name" => Some(Field::Name),
            "artist" => Some(Field::Artist),
            "location" => Some(Field::Location),
            "genre" => Some(Field::Genre),
            "bpm" => Some(Field::Bpm),
            "rating" => Some(Field::Rating),
            "played_count" => Some(Field::PlayedCount),
            "year" => Some(Field::Year),
            "date_added" => Some(Field::DateAdded),
            _ => None,
        }
    }

    /// A song without this field cannot be represented.
    pub fn is_required(&self) -> bool {
        matches!(self, Field::Name | Field::Artist | Field::Location)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-name table for one adapter family.
///
/// `renames` rewrites already-normalized keys (lowercase, underscores) that
/// still differ from the canonical name. `datetime_format` is the chrono
/// format string for the family's added-date values.
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    renames: &'static [(&'static str, &'static str)],
    pub datetime_format: &'static str,
}

impl FieldTable {
    pub const fn new(
        renames: &'static [(&'static str, &'static str)],
        datetime_format: &'static str,
    ) -> Self {
        Self {
            renames,
            datetime_format,
        }
    }

    /// Resolve one foreign key to a canonical field.
    ///
    /// The key is lowercased with whitespace runs collapsed to underscores,
    /// rewritten through the rename list (identity for keys absent from it),
    /// then matched against the canonical set. Returns `None` for keys with
    /// no canonical counterpart; callers discard those.
    pub fn resolve(&self, foreign_key: &str) -> Option<Field> {
        let key = normalize_key(foreign_key);
        let key = self
            .renames
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| (*to).to_string())
            .unwrap_or(key);
        Field::parse(&key)
    }
}

/// Table for legacy XML library exports (`Play Count`, `Date Added`, ...).
pub const XML_LIBRARY_FIELDS: FieldTable = FieldTable::new(
    &[("play_count", "played_count")],
    "%Y-%m-%dT%H:%M:%SZ",
);

/// Table for the JSON document store, which already uses canonical names.
pub const JSON_STORE_FIELDS: FieldTable = FieldTable::new(&[], "%Y-%m-%dT%H:%M:%S");

fn normalize_key(key: &str) -> String {
    key.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}
