//! Migration orchestrator - the generic read→filter→write pipeline
//!
//! A [`Migration`] walks the phase machine `Unconfigured → ReaderSelected →
//! WriterSelected → Running → {Completed, Failed}`. Adapter resources live
//! only between configuration and the end of the run; both paths out of
//! `Running` drop them.

mod select;

pub use select::{MigrateOptions, SelectError, SelectedAdapter};

use std::time::Instant;

use thiserror::Error;

use crate::adapter::registry::{AdapterFactory, AdapterRegistry, RegistryError};
use crate::adapter::{AdapterError, AdapterKind, ReadError, SongReader, SongWriter};
use crate::report::MigrationReport;
use crate::song::{Field, Song};

/// Orchestrator phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unconfigured,
    ReaderSelected,
    WriterSelected,
    Running,
    Completed,
    Failed,
}

/// Errors that abort a migration run. Selection and registration errors
/// occur before any resource is acquired; the rest carry the adapter name
/// and, where one exists, the offending record index.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{kind} '{adapter}' failed during acquisition: {source}")]
    Acquire {
        kind: AdapterKind,
        adapter: String,
        #[source]
        source: AdapterError,
    },

    #[error("{kind} '{adapter}' failed at record {index}: {source}")]
    Adapter {
        kind: AdapterKind,
        adapter: String,
        index: usize,
        #[source]
        source: AdapterError,
    },

    #[error("writer '{adapter}' failed while finishing: {source}")]
    Finish {
        adapter: String,
        #[source]
        source: AdapterError,
    },
}

/// Drives one migration run through its phase state machine.
pub struct Migration {
    phase: Phase,
    reader: Option<(String, Box<dyn SongReader>)>,
    writer: Option<(String, Box<dyn SongWriter>)>,
    match_fields: Vec<Field>,
    exclude_fields: Vec<Field>,
}

impl Migration {
    /// Select and instantiate both adapters from resolved options.
    ///
    /// Selection has already been validated; this acquires the resources
    /// through the registry factories, reader first. A factory failure
    /// surfaces as an acquisition error and leaves the run unstarted.
    pub fn configure(
        registry: &AdapterRegistry,
        options: &MigrateOptions,
    ) -> Result<Migration, MigrateError> {
        let mut migration = Migration {
            phase: Phase::Unconfigured,
            reader: None,
            writer: None,
            match_fields: options.match_fields.clone(),
            exclude_fields: options.exclude_fields.clone(),
        };

        let reader = instantiate_reader(registry, &options.reader)?;
        migration.reader = Some((options.reader.name.clone(), reader));
        migration.phase = Phase::ReaderSelected;

        let writer = instantiate_writer(registry, &options.writer)?;
        migration.writer = Some((options.writer.name.clone(), writer));
        migration.phase = Phase::WriterSelected;

        Ok(migration)
    }

    /// Assemble a migration from already-acquired adapters. The CLI path
    /// goes through [`Migration::configure`]; this is the entry point for
    /// embedding the pipeline with hand-built adapters.
    pub fn from_parts(
        reader_name: impl Into<String>,
        reader: Box<dyn SongReader>,
        writer_name: impl Into<String>,
        writer: Box<dyn SongWriter>,
    ) -> Migration {
        Migration {
            phase: Phase::WriterSelected,
            reader: Some((reader_name.into(), reader)),
            writer: Some((writer_name.into(), writer)),
            match_fields: Vec::new(),
            exclude_fields: Vec::new(),
        }
    }

    /// Replace the pipeline filters.
    pub fn with_filters(mut self, match_fields: Vec<Field>, exclude_fields: Vec<Field>) -> Self {
        self.match_fields = match_fields;
        self.exclude_fields = exclude_fields;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the copy loop. See [`Migration::run_with`].
    pub fn run(&mut self) -> Result<MigrationReport, MigrateError> {
        self.run_with(|_, _| {})
    }

    /// Run the copy loop, invoking `observer` with each song about to be
    /// written (after filtering) and its zero-based record index.
    ///
    /// On success the writer is finished, both resources are dropped, and
    /// the phase is `Completed`; on the first unrecoverable adapter error
    /// both resources are dropped and the phase is `Failed`. Records
    /// already accepted by the writer stay durable either way.
    pub fn run_with<F>(&mut self, observer: F) -> Result<MigrationReport, MigrateError>
    where
        F: FnMut(usize, &Song),
    {
        if self.phase != Phase::WriterSelected {
            return Err(SelectError::NotConfigured.into());
        }
        self.phase = Phase::Running;

        let Some((reader_name, reader)) = self.reader.as_mut() else {
            return Err(SelectError::NotConfigured.into());
        };
        let Some((writer_name, writer)) = self.writer.as_mut() else {
            return Err(SelectError::NotConfigured.into());
        };

        let mut report = MigrationReport::new(reader_name.clone(), writer_name.clone());
        let started = Instant::now();

        let outcome = copy_songs(
            reader_name,
            reader.as_mut(),
            writer_name,
            writer.as_mut(),
            &self.match_fields,
            &self.exclude_fields,
            &mut report,
            observer,
        )
        .and_then(|()| {
            writer.finish().map_err(|source| MigrateError::Finish {
                adapter: writer_name.clone(),
                source,
            })
        });

        report.elapsed = started.elapsed();
        self.reader = None;
        self.writer = None;

        match outcome {
            Ok(()) => {
                self.phase = Phase::Completed;
                Ok(report)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                Err(err)
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn copy_songs<F>(
    reader_name: &str,
    reader: &mut dyn SongReader,
    writer_name: &str,
    writer: &mut dyn SongWriter,
    match_fields: &[Field],
    exclude_fields: &[Field],
    report: &mut MigrationReport,
    mut observer: F,
) -> Result<(), MigrateError>
where
    F: FnMut(usize, &Song),
{
    let songs = reader.songs().map_err(|source| MigrateError::Acquire {
        kind: AdapterKind::Reader,
        adapter: reader_name.to_string(),
        source,
    })?;

    for (index, item) in songs.enumerate() {
        match item {
            Ok(song) => {
                report.read += 1;
                if match_fields.iter().any(|field| song.field_is_empty(*field)) {
                    report.filtered += 1;
                    continue;
                }
                let mut song = song;
                for field in exclude_fields {
                    song.clear_field(*field);
                }
                observer(index, &song);
                writer
                    .write(&song)
                    .map_err(|source| MigrateError::Adapter {
                        kind: AdapterKind::Writer,
                        adapter: writer_name.to_string(),
                        index,
                        source,
                    })?;
                report.written += 1;
            }
            // Normalization failures are per-record: skip and count.
            Err(ReadError::Song(_)) => {
                report.read += 1;
                report.skipped += 1;
            }
            Err(ReadError::Adapter(source)) => {
                return Err(MigrateError::Adapter {
                    kind: AdapterKind::Reader,
                    adapter: reader_name.to_string(),
                    index,
                    source,
                });
            }
        }
    }
    Ok(())
}

fn instantiate_reader(
    registry: &AdapterRegistry,
    selected: &SelectedAdapter,
) -> Result<Box<dyn SongReader>, MigrateError> {
    match lookup(registry, selected, AdapterKind::Reader)? {
        AdapterFactory::Reader(build) => {
            build(&selected.params).map_err(|source| MigrateError::Acquire {
                kind: AdapterKind::Reader,
                adapter: selected.name.clone(),
                source,
            })
        }
        AdapterFactory::Writer(_) => Err(SelectError::NoReader.into()),
    }
}

fn instantiate_writer(
    registry: &AdapterRegistry,
    selected: &SelectedAdapter,
) -> Result<Box<dyn SongWriter>, MigrateError> {
    match lookup(registry, selected, AdapterKind::Writer)? {
        AdapterFactory::Writer(build) => {
            build(&selected.params).map_err(|source| MigrateError::Acquire {
                kind: AdapterKind::Writer,
                adapter: selected.name.clone(),
                source,
            })
        }
        AdapterFactory::Reader(_) => Err(SelectError::NoWriter.into()),
    }
}

fn lookup<'a>(
    registry: &'a AdapterRegistry,
    selected: &SelectedAdapter,
    kind: AdapterKind,
) -> Result<&'a AdapterFactory, MigrateError> {
    let entry = registry.get(&selected.name).ok_or(match kind {
        AdapterKind::Reader => SelectError::NoReader,
        AdapterKind::Writer => SelectError::NoWriter,
    })?;
    Ok(&entry.factory)
}
