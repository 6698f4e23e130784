//! Legacy XML library reader
//!
//! Reads property-list style library exports: a `Tracks` dictionary whose
//! entries are per-track dictionaries of alternating `<key>`/value
//! elements. Foreign keys like `Play Count` normalize through the XML
//! family field table; keys with no canonical counterpart (`Track ID`,
//! `Persistent ID`, ...) are discarded during construction.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::song::{Song, XML_LIBRARY_FIELDS};

use super::{
    AdapterDescriptor, AdapterError, AdapterKind, ParamKind, ParamSpec, ParamValue,
    ResolvedParams, SongIter, SongReader,
};

pub const NAME: &str = "xml-library";

pub fn descriptor() -> AdapterDescriptor {
    AdapterDescriptor {
        name: NAME,
        kind: AdapterKind::Reader,
        summary: "Read songs from a legacy XML library export",
        params: vec![
            ParamSpec {
                name: "file",
                kind: ParamKind::Path,
                help: "XML library export file",
                default: None,
                required: true,
            },
            ParamSpec {
                name: "limit",
                kind: ParamKind::Int,
                help: "read at most this many songs (0 = unlimited)",
                default: Some(ParamValue::Int(0)),
                required: false,
            },
        ],
    }
}

pub fn build(params: &ResolvedParams) -> Result<Box<dyn SongReader>, AdapterError> {
    let file = params.path("file")?;
    let limit = params.int("limit").unwrap_or(0).max(0) as usize;
    Ok(Box::new(XmlLibraryReader::open(&file, limit)?))
}

/// Reader over one XML library export.
///
/// The file is read and parsed at acquisition; song construction stays
/// lazy. The pass is one-shot: a second call to `songs` yields nothing.
pub struct XmlLibraryReader {
    records: Vec<HashMap<String, String>>,
}

impl XmlLibraryReader {
    /// Open and parse an export, keeping at most `limit` track records
    /// (0 = unlimited).
    pub fn open(path: &Path, limit: usize) -> Result<Self, AdapterError> {
        let text = fs::read_to_string(path)?;
        let document = Document::parse(&text)?;
        let records = collect_track_records(&document, limit)?;
        Ok(Self { records })
    }

    /// Track records parsed from the export, before normalization.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl SongReader for XmlLibraryReader {
    fn songs(&mut self) -> Result<SongIter<'_>, AdapterError> {
        let records = std::mem::take(&mut self.records);
        Ok(Box::new(records.into_iter().map(|record| {
            Song::from_foreign(&record, &XML_LIBRARY_FIELDS).map_err(Into::into)
        })))
    }
}

fn collect_track_records(
    document: &Document,
    limit: usize,
) -> Result<Vec<HashMap<String, String>>, AdapterError> {
    let tracks_key = document
        .descendants()
        .find(|node| node.has_tag_name("key") && node.text().map(str::trim) == Some("Tracks"))
        .ok_or_else(|| {
            AdapterError::Malformed("no Tracks dictionary in library export".to_string())
        })?;
    let tracks_dict = tracks_key
        .next_sibling_element()
        .filter(|node| node.has_tag_name("dict"))
        .ok_or_else(|| {
            AdapterError::Malformed("Tracks key is not followed by a dict".to_string())
        })?;

    let mut records = Vec::new();
    for track in tracks_dict
        .children()
        .filter(|node| node.has_tag_name("dict"))
    {
        records.push(record_from_dict(track));
        if limit != 0 && records.len() == limit {
            break;
        }
    }
    Ok(records)
}

/// Zip alternating `<key>` elements with the value element that follows
/// each of them.
fn record_from_dict(dict: Node) -> HashMap<String, String> {
    let mut record = HashMap::new();
    let mut pending_key: Option<String> = None;
    for child in dict.children().filter(|node| node.is_element()) {
        if child.has_tag_name("key") {
            pending_key = child.text().map(|text| text.trim().to_string());
        } else if let Some(key) = pending_key.take() {
            record.insert(key, element_value(child));
        }
    }
    record
}

fn element_value(node: Node) -> String {
    match node.tag_name().name() {
        "true" => "true".to_string(),
        "false" => "false".to_string(),
        _ => node.text().unwrap_or_default().trim().to_string(),
    }
}
