//! Plain-text report writer
//!
//! Appends each song's fixed-width display line to a UTF-8 text file.
//! Append-only; no upsert key.

use std::fs::{File, OpenOptions};
use std::io::Write;

use crate::song::Song;

use super::{
    AdapterDescriptor, AdapterError, AdapterKind, ParamKind, ParamSpec, ResolvedParams,
    SongWriter,
};

pub const NAME: &str = "text-report";

pub fn descriptor() -> AdapterDescriptor {
    AdapterDescriptor {
        name: NAME,
        kind: AdapterKind::Writer,
        summary: "Append song lines to a plain-text report file",
        params: vec![ParamSpec {
            name: "file",
            kind: ParamKind::Path,
            help: "report file, created if absent",
            default: None,
            required: true,
        }],
    }
}

pub fn build(params: &ResolvedParams) -> Result<Box<dyn SongWriter>, AdapterError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(params.path("file")?)?;
    Ok(Box::new(TextReportWriter { file }))
}

pub struct TextReportWriter {
    file: File,
}

impl SongWriter for TextReportWriter {
    fn write(&mut self, song: &Song) -> Result<(), AdapterError> {
        writeln!(self.file, "{}", song)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AdapterError> {
        self.file.sync_all()?;
        Ok(())
    }
}
