//! JSON document store adapters
//!
//! The store is a single JSON file holding a top-level array of song
//! objects. The reader flattens each object's values to strings and feeds
//! them through the normal foreign-record construction path, so the store
//! gets no special treatment over any other source. The writer appends
//! (no upsert key): existing records are loaded at acquisition, each
//! `write` appends one, and the whole array is persisted on `finish` -
//! with a best-effort persist on drop so records written before an aborted
//! run stay durable.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::song::{Song, JSON_STORE_FIELDS};

use super::{
    AdapterDescriptor, AdapterError, AdapterKind, ParamKind, ParamSpec, ResolvedParams, SongIter,
    SongReader, SongWriter,
};

pub const READER_NAME: &str = "json-store";
pub const WRITER_NAME: &str = "json-store-out";

pub fn reader_descriptor() -> AdapterDescriptor {
    AdapterDescriptor {
        name: READER_NAME,
        kind: AdapterKind::Reader,
        summary: "Read songs from a JSON document store",
        params: vec![ParamSpec {
            name: "file",
            kind: ParamKind::Path,
            help: "JSON store file",
            default: None,
            required: true,
        }],
    }
}

pub fn writer_descriptor() -> AdapterDescriptor {
    AdapterDescriptor {
        name: WRITER_NAME,
        kind: AdapterKind::Writer,
        summary: "Write songs to a JSON document store (append)",
        params: vec![ParamSpec {
            name: "file",
            kind: ParamKind::Path,
            help: "JSON store file, created if absent",
            default: None,
            required: true,
        }],
    }
}

pub fn build_reader(params: &ResolvedParams) -> Result<Box<dyn SongReader>, AdapterError> {
    Ok(Box::new(JsonStoreReader::open(&params.path("file")?)?))
}

pub fn build_writer(params: &ResolvedParams) -> Result<Box<dyn SongWriter>, AdapterError> {
    Ok(Box::new(JsonStoreWriter::open(params.path("file")?)?))
}

/// Reader over one JSON store file. One-shot, like every reader.
pub struct JsonStoreReader {
    records: Vec<HashMap<String, String>>,
}

impl JsonStoreReader {
    pub fn open(path: &Path) -> Result<Self, AdapterError> {
        let records = load_records(path)?
            .iter()
            .map(flatten_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }
}

impl SongReader for JsonStoreReader {
    fn songs(&mut self) -> Result<SongIter<'_>, AdapterError> {
        let records = std::mem::take(&mut self.records);
        Ok(Box::new(records.into_iter().map(|record| {
            Song::from_foreign(&record, &JSON_STORE_FIELDS).map_err(Into::into)
        })))
    }
}

/// Append-only writer over one JSON store file.
pub struct JsonStoreWriter {
    path: PathBuf,
    records: Vec<Value>,
    dirty: bool,
}

impl JsonStoreWriter {
    /// Acquire the store: existing records are loaded so appends never
    /// clobber them; a missing file starts an empty store.
    pub fn open(path: PathBuf) -> Result<Self, AdapterError> {
        let records = if path.exists() {
            load_records(&path)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            records,
            dirty: false,
        })
    }

    fn persist(&self) -> Result<(), AdapterError> {
        let mut body = serde_json::to_string_pretty(&self.records)?;
        body.push('\n');
        fs::write(&self.path, body)?;
        Ok(())
    }
}

impl SongWriter for JsonStoreWriter {
    fn write(&mut self, song: &Song) -> Result<(), AdapterError> {
        self.records.push(serde_json::to_value(song)?);
        self.dirty = true;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AdapterError> {
        self.persist()?;
        self.dirty = false;
        Ok(())
    }
}

impl Drop for JsonStoreWriter {
    /// Records accepted by `write` stay durable even when the run aborts
    /// before `finish`. Errors here have no propagation path and are
    /// dropped.
    fn drop(&mut self) {
        if self.dirty {
            let _ = self.persist();
        }
    }
}

fn load_records(path: &Path) -> Result<Vec<Value>, AdapterError> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str(&text)? {
        Value::Array(records) => Ok(records),
        _ => Err(AdapterError::Malformed(format!(
            "store {} is not a JSON array",
            path.display()
        ))),
    }
}

/// Flatten one store object to the string map the construction path
/// expects. Nulls and nested values carry no song field and are dropped.
fn flatten_record(value: &Value) -> Result<HashMap<String, String>, AdapterError> {
    let object = value.as_object().ok_or_else(|| {
        AdapterError::Malformed("store entry is not a JSON object".to_string())
    })?;
    let mut record = HashMap::new();
    for (key, value) in object {
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => continue,
        };
        record.insert(key.clone(), text);
    }
    Ok(record)
}
