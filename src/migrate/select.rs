//! Mapping parsed arguments back onto adapter selections
//!
//! Selection is pure descriptor work: it decides which adapters are
//! activated and gathers their constructor parameters, but instantiates
//! nothing - a selection failure must leave every resource unacquired.

use std::path::PathBuf;

use clap::ArgMatches;
use thiserror::Error;

use crate::adapter::registry::{AdapterRegistry, RegisteredAdapter};
use crate::adapter::{AdapterKind, ParamKind, ParamValue, ResolvedParams};
use crate::cli::param_flag;
use crate::song::Field;

/// Startup selection and configuration errors. Fatal before any I/O.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no reader activated - pick exactly one reader adapter")]
    NoReader,

    #[error("no writer activated - pick exactly one writer adapter")]
    NoWriter,

    #[error("multiple {kind}s activated: {}", names.join(", "))]
    Multiple {
        kind: AdapterKind,
        names: Vec<String>,
    },

    #[error("adapter '{adapter}' needs --{adapter}-{param}")]
    MissingParameter { adapter: String, param: String },

    #[error("unknown canonical field '{name}'")]
    UnknownField { name: String },

    #[error("required field '{field}' cannot be excluded")]
    ExcludeRequired { field: Field },

    #[error("migration is not fully configured")]
    NotConfigured,
}

/// One activated adapter with its resolved constructor parameters.
#[derive(Debug)]
pub struct SelectedAdapter {
    pub name: String,
    pub params: ResolvedParams,
}

/// Everything the orchestrator needs, resolved from parsed arguments.
#[derive(Debug)]
pub struct MigrateOptions {
    pub reader: SelectedAdapter,
    pub writer: SelectedAdapter,
    pub match_fields: Vec<Field>,
    pub exclude_fields: Vec<Field>,
    pub report: Option<PathBuf>,
    pub quiet: bool,
}

impl MigrateOptions {
    /// Resolve parsed arguments: exactly one activated adapter per kind,
    /// parameters from matching flags with declared defaults for omitted
    /// ones, and validated pipeline filter lists.
    pub fn from_matches(
        registry: &AdapterRegistry,
        matches: &ArgMatches,
    ) -> Result<MigrateOptions, SelectError> {
        Ok(MigrateOptions {
            reader: select_one(registry, matches, AdapterKind::Reader)?,
            writer: select_one(registry, matches, AdapterKind::Writer)?,
            match_fields: field_list(matches, "match-fields", false)?,
            exclude_fields: field_list(matches, "exclude-fields", true)?,
            report: matches.get_one::<PathBuf>("report").cloned(),
            quiet: matches.get_flag("quiet"),
        })
    }
}

fn select_one(
    registry: &AdapterRegistry,
    matches: &ArgMatches,
    kind: AdapterKind,
) -> Result<SelectedAdapter, SelectError> {
    let activated: Vec<&RegisteredAdapter> = registry
        .iter()
        .filter(|entry| entry.descriptor.kind == kind)
        .filter(|entry| matches.get_flag(entry.descriptor.name))
        .collect();

    match activated.as_slice() {
        [] => Err(match kind {
            AdapterKind::Reader => SelectError::NoReader,
            AdapterKind::Writer => SelectError::NoWriter,
        }),
        [entry] => resolve_params(entry, matches),
        many => Err(SelectError::Multiple {
            kind,
            names: many
                .iter()
                .map(|entry| entry.descriptor.name.to_string())
                .collect(),
        }),
    }
}

fn resolve_params(
    entry: &RegisteredAdapter,
    matches: &ArgMatches,
) -> Result<SelectedAdapter, SelectError> {
    let descriptor = &entry.descriptor;
    let mut params = ResolvedParams::default();
    for spec in &descriptor.params {
        let flag = param_flag(descriptor.name, spec.name);
        let value = extract(matches, &flag, spec.kind).or_else(|| spec.default.clone());
        match value {
            Some(value) => params.insert(spec.name, value),
            None if spec.required => {
                return Err(SelectError::MissingParameter {
                    adapter: descriptor.name.to_string(),
                    param: spec.name.to_string(),
                })
            }
            None => {}
        }
    }
    Ok(SelectedAdapter {
        name: descriptor.name.to_string(),
        params,
    })
}

fn extract(matches: &ArgMatches, flag: &str, kind: ParamKind) -> Option<ParamValue> {
    match kind {
        ParamKind::Text => matches
            .get_one::<String>(flag)
            .map(|value| ParamValue::Text(value.clone())),
        ParamKind::Int => matches.get_one::<i64>(flag).map(|v| ParamValue::Int(*v)),
        ParamKind::Bool => matches.get_one::<bool>(flag).map(|v| ParamValue::Bool(*v)),
        ParamKind::Path => matches
            .get_one::<PathBuf>(flag)
            .map(|value| ParamValue::Path(value.clone())),
    }
}

fn field_list(
    matches: &ArgMatches,
    id: &str,
    forbid_required: bool,
) -> Result<Vec<Field>, SelectError> {
    let mut fields = Vec::new();
    if let Some(values) = matches.get_many::<String>(id) {
        for value in values {
            let field = Field::parse(value).ok_or_else(|| SelectError::UnknownField {
                name: value.clone(),
            })?;
            if forbid_required && field.is_required() {
                return Err(SelectError::ExcludeRequired { field });
            }
            fields.push(field);
        }
    }
    Ok(fields)
}
