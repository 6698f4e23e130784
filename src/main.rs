//! Songport: Song Metadata Migration CLI
//!
//! Discovers the registered adapters, synthesizes the argument surface
//! from their descriptors, and drives the generic read→filter→write
//! pipeline between the selected reader and writer.

use anyhow::Result;
use console::style;

use songport::adapter::registry::{AdapterRegistry, RegistryError};
use songport::cli;
use songport::migrate::{MigrateError, MigrateOptions, Migration, SelectError};
use songport::report::export_report;
use songport::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_song_line, print_success,
};

// Distinct exit-code ranges so scripts can tell configuration mistakes
// from runtime failures.
const EXIT_SELECTION: i32 = 2;
const EXIT_REGISTRATION: i32 = 3;
const EXIT_ADAPTER: i32 = 4;

fn main() {
    if let Err(err) = run() {
        eprintln!(
            "{} {}",
            style("✗").red().bold(),
            style(format!("{:#}", err)).red()
        );
        std::process::exit(exit_code(&err));
    }
}

fn run() -> Result<()> {
    let registry = AdapterRegistry::builtin()?;
    let matches = cli::build_command(&registry).get_matches();
    let options = MigrateOptions::from_matches(&registry, &matches)?;
    let quiet = options.quiet;

    if !quiet {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(
            &options.reader.name,
            &options.writer.name,
            &options.match_fields,
            &options.exclude_fields,
        );
    }

    let mut migration = Migration::configure(&registry, &options)?;

    let report = if quiet {
        migration.run()?
    } else {
        let spinner = create_spinner("Migrating songs...");
        let result = migration.run_with(|index, song| {
            spinner.inc(1);
            spinner.suspend(|| print_song_line(index, &song.to_string()));
        });
        match &result {
            Ok(report) if report.skipped > 0 => finish_with_warning(
                &spinner,
                &format!("Migration finished, {} record(s) skipped", report.skipped),
            ),
            Ok(_) => finish_with_success(&spinner, "Migration complete"),
            Err(_) => finish_with_warning(&spinner, "Migration failed"),
        }
        result?
    };

    if let Some(path) = &options.report {
        export_report(&report, path)?;
        if !quiet {
            print_success(&format!("Report written to {}", path.display()));
        }
    }

    if !quiet {
        report.display();
        print_completion();
    }
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<SelectError>().is_some() {
        return EXIT_SELECTION;
    }
    if err.downcast_ref::<RegistryError>().is_some() {
        return EXIT_REGISTRATION;
    }
    if let Some(migrate) = err.downcast_ref::<MigrateError>() {
        return match migrate {
            MigrateError::Select(_) => EXIT_SELECTION,
            MigrateError::Registry(_) => EXIT_REGISTRATION,
            MigrateError::Acquire { .. }
            | MigrateError::Adapter { .. }
            | MigrateError::Finish { .. } => EXIT_ADAPTER,
        };
    }
    EXIT_ADAPTER
}
