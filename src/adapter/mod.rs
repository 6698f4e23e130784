//! Adapter contracts - the capability traits every source and destination
//! implements, plus the descriptor metadata the registry and CLI build on
//!
//! A reader acquires its resource at construction and releases it on drop,
//! so every exit path releases. Writers additionally expose [`SongWriter::finish`]
//! so records written before release are durable.

pub mod json_store;
pub mod registry;
pub mod text_report;
pub mod xml_library;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::song::{Song, SongError};

/// Classifies an adapter as a source or a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Reader,
    Writer,
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterKind::Reader => f.write_str("reader"),
            AdapterKind::Writer => f.write_str("writer"),
        }
    }
}

/// Failure surfaced by an adapter at the acquisition, iteration, or write
/// boundary. Adapters fold their internal errors into one of these rather
/// than leaking source-specific error types.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Source data was readable but structurally wrong.
    #[error("malformed source data: {0}")]
    Malformed(String),

    #[error("{0}")]
    Message(String),
}

/// Per-record outcome of a reader pass.
///
/// Normalization failures are per-record and the orchestrator may skip
/// them; adapter failures abort the pass.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    Song(#[from] SongError),
}

/// One lazy, finite pass over a reader's songs.
pub type SongIter<'a> = Box<dyn Iterator<Item = Result<Song, ReadError>> + 'a>;

/// Capability contract for a source adapter.
pub trait SongReader {
    /// Yield one pass over the source's songs, pulled on demand.
    ///
    /// The sequence is one-shot: re-running after exhaustion is
    /// adapter-defined and not guaranteed to restart.
    fn songs(&mut self) -> Result<SongIter<'_>, AdapterError>;

    /// Scan the sequence for a song matching `target` under same-track
    /// equality, without materializing the sequence. Records that fail
    /// normalization cannot match and are skipped.
    fn contains(&mut self, target: &Song) -> Result<bool, AdapterError> {
        for item in self.songs()? {
            match item {
                Ok(song) if song.same_track(target) => return Ok(true),
                Ok(_) | Err(ReadError::Song(_)) => continue,
                Err(ReadError::Adapter(err)) => return Err(err),
            }
        }
        Ok(false)
    }
}

/// Capability contract for a destination adapter.
pub trait SongWriter {
    /// Append or upsert one record. The upsert key, if any, is
    /// adapter-defined and documented per adapter.
    fn write(&mut self, song: &Song) -> Result<(), AdapterError>;

    /// Flush so records written so far survive release of the resource.
    fn finish(&mut self) -> Result<(), AdapterError> {
        Ok(())
    }
}

/// Semantic type of one adapter constructor parameter, mapped onto a typed
/// CLI value parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Int,
    Bool,
    Path,
}

/// A parameter value, resolved from the command line or a declared default.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Path(PathBuf),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Text(_) => ParamKind::Text,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Path(_) => ParamKind::Path,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Declares one constructor parameter surfaced on the command line.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub help: &'static str,
    pub default: Option<ParamValue>,
    pub required: bool,
}

/// Static metadata describing one concrete adapter: its unique name, its
/// kind, a one-line summary used as the CLI group title, and its parameter
/// specifications.
#[derive(Debug, Clone)]
pub struct AdapterDescriptor {
    pub name: &'static str,
    pub kind: AdapterKind,
    pub summary: &'static str,
    pub params: Vec<ParamSpec>,
}

/// Constructor arguments for one adapter instantiation, keyed by the
/// parameter's local name.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParams {
    values: HashMap<String, ParamValue>,
}

impl ResolvedParams {
    pub fn insert(&mut self, name: &str, value: ParamValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Required path parameter; the CLI layer validates presence before
    /// instantiation, so absence here is an adapter contract violation.
    pub fn path(&self, name: &str) -> Result<PathBuf, AdapterError> {
        match self.get(name) {
            Some(ParamValue::Path(path)) => Ok(path.clone()),
            Some(ParamValue::Text(text)) => Ok(PathBuf::from(text)),
            _ => Err(missing(name)),
        }
    }

    pub fn text(&self, name: &str) -> Result<String, AdapterError> {
        match self.get(name) {
            Some(ParamValue::Text(text)) => Ok(text.clone()),
            _ => Err(missing(name)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64, AdapterError> {
        match self.get(name) {
            Some(ParamValue::Int(n)) => Ok(*n),
            _ => Err(missing(name)),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool, AdapterError> {
        match self.get(name) {
            Some(ParamValue::Bool(b)) => Ok(*b),
            _ => Err(missing(name)),
        }
    }
}

fn missing(name: &str) -> AdapterError {
    AdapterError::Message(format!("missing constructor parameter '{}'", name))
}
