//! Terminal styling utilities for a modern, visually appealing CLI

use console::{style, Emoji};

use crate::song::Field;

// Emoji icons with fallbacks for terminals that don't support them
pub static NOTE: Emoji<'_, '_> = Emoji("🎵 ", ">> ");
pub static SOURCE: Emoji<'_, '_> = Emoji("📖 ", "");
pub static DEST: Emoji<'_, '_> = Emoji("💾 ", "");
pub static FILTER: Emoji<'_, '_> = Emoji("🔍 ", "");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ███████╗ ██████╗ ███╗   ██╗ ██████╗ ██████╗  ██████╗ ██████╗ ████████╗
    ██╔════╝██╔═══██╗████╗  ██║██╔════╝ ██╔══██╗██╔═══██╗██╔══██╗╚══██╔══╝
    ███████╗██║   ██║██╔██╗ ██║██║  ███╗██████╔╝██║   ██║██████╔╝   ██║
    ╚════██║██║   ██║██║╚██╗██║██║   ██║██╔═══╝ ██║   ██║██╔══██╗   ██║
    ███████║╚██████╔╝██║ ╚████║╚██████╔╝██║     ╚██████╔╝██║  ██║   ██║
    ╚══════╝ ╚═════╝ ╚═╝  ╚═══╝ ╚═════╝ ╚═╝      ╚═════╝ ╚═╝  ╚═╝   ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("♪").magenta().bold(),
        style("Song metadata, moved between libraries").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the run configuration card
pub fn print_config(
    reader: &str,
    writer: &str,
    match_fields: &[Field],
    exclude_fields: &[Field],
) {
    println!(
        "    {} Source:      {}",
        SOURCE,
        style(reader).yellow().bold()
    );
    println!(
        "    {} Destination: {}",
        DEST,
        style(writer).yellow().bold()
    );
    if !match_fields.is_empty() {
        println!(
            "    {} Match fields:   {}",
            FILTER,
            style(join_fields(match_fields)).yellow()
        );
    }
    if !exclude_fields.is_empty() {
        println!(
            "    {} Exclude fields: {}",
            FILTER,
            style(join_fields(exclude_fields)).yellow()
        );
    }
    println!();
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!(
        "    {} {}",
        style("⚠").yellow().bold(),
        style(message).yellow()
    );
}

/// Print a dim per-song line during the copy loop
pub fn print_song_line(index: usize, line: &str) {
    println!(
        "      {} {}",
        style(format!("{:>5}", index + 1)).dim(),
        style(line).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        NOTE,
        style("Songport migration complete!").green().bold()
    );
    println!();
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
