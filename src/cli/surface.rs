//! Argument-surface synthesis
//!
//! Turns the adapter registry into a `clap` command: one help group per
//! adapter holding its activation switch and its typed parameter flags,
//! plus the pipeline-wide options. The synthesizer is pure - identical
//! registry contents always produce an identical grammar.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use crate::adapter::registry::AdapterRegistry;
use crate::adapter::{AdapterDescriptor, ParamKind, ParamSpec};

/// Flag name for one adapter parameter. Parameters are prefixed with their
/// adapter's name so same-named parameters of different adapters never
/// collide: `--xml-library-file` vs `--json-store-file`.
pub fn param_flag(adapter: &str, param: &str) -> String {
    format!("{}-{}", adapter, param)
}

/// Build the full command from the registry's descriptors.
pub fn build_command(registry: &AdapterRegistry) -> Command {
    let mut command = Command::new("songport")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Migrate song metadata between music libraries")
        .after_help(usage_notes())
        .arg(
            Arg::new("match-fields")
                .long("match-fields")
                .value_name("FIELDS")
                .value_delimiter(',')
                .help("only migrate songs where these canonical fields are non-empty (comma separated)"),
        )
        .arg(
            Arg::new("exclude-fields")
                .long("exclude-fields")
                .value_name("FIELDS")
                .value_delimiter(',')
                .help("strip these canonical fields from each song before writing (comma separated)"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("write a JSON migration report to this path"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("suppress banner and per-song output"),
        );

    for entry in registry.iter() {
        command = add_adapter_group(command, &entry.descriptor);
    }
    command
}

fn add_adapter_group(mut command: Command, descriptor: &AdapterDescriptor) -> Command {
    // The descriptor's one-line summary is the group title.
    let heading = format!("{} - {}", descriptor.name, descriptor.summary);
    command = command.arg(
        Arg::new(descriptor.name.to_string())
            .long(descriptor.name)
            .action(ArgAction::SetTrue)
            .help(format!(
                "activate the '{}' {}",
                descriptor.name, descriptor.kind
            ))
            .help_heading(heading.clone()),
    );
    for param in &descriptor.params {
        command = command.arg(param_arg(descriptor, param, heading.clone()));
    }
    command
}

fn param_arg(descriptor: &AdapterDescriptor, param: &ParamSpec, heading: String) -> Arg {
    let flag = param_flag(descriptor.name, param.name);
    let mut arg = Arg::new(flag.clone())
        .long(flag)
        .value_name(param.name.to_uppercase())
        .help(param_help(descriptor, param))
        .help_heading(heading);
    arg = match param.kind {
        ParamKind::Text => arg.value_parser(value_parser!(String)),
        ParamKind::Int => arg.value_parser(value_parser!(i64)),
        ParamKind::Bool => arg.value_parser(value_parser!(bool)),
        ParamKind::Path => arg.value_parser(value_parser!(PathBuf)),
    };
    if let Some(default) = &param.default {
        arg = arg.default_value(default.to_string());
    }
    arg
}

fn param_help(descriptor: &AdapterDescriptor, param: &ParamSpec) -> String {
    match &param.default {
        Some(default) => format!(
            "[{}] {} (default: {})",
            descriptor.name, param.help, default
        ),
        None if param.required => format!("[{}] {} (required)", descriptor.name, param.help),
        None => format!("[{}] {}", descriptor.name, param.help),
    }
}

fn usage_notes() -> String {
    let library_hint = dirs::audio_dir()
        .map(|dir| format!("{}", dir.display()))
        .unwrap_or_else(|| "~/Music".to_string());
    format!(
        "Select exactly one reader and one writer by their activation flags; \
each adapter's parameters are prefixed with its name. Library exports are \
commonly found under {}.\n\nExit codes: 0 success, 2 selection or \
configuration error, 3 adapter registration error, 4 adapter I/O failure.",
        library_hint
    )
}
