use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

/// Lists commands grouped by the screen they act on.
pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for (group, entries) in registry.grouped() {
        io::print_info(format!("{}:", group.label()));
        for entry in entries {
            io::print_info(format!("  {:<10} {}", entry.name, entry.description));
        }
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  Description: {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
    if let Some(example) = entry.example {
        io::print_info(format!("  Example: {}", example));
    }
}
