use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Settings,
        "config",
        "View and update preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )
    .with_example("config set items_per_page 20")]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        output_section("Configuration");
        for (key, value) in context.config.entries() {
            io::print_info(format!("  {:<18} {}", key, value));
        }
        io::print_info(format!("  (file: {})", context.config_manager.path().display()));
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            context.config.set_value(&key, &value)?;
            context.persist_config()?;
            if key == "backup_retention" {
                io::print_hint("Backup retention applies from the next start.");
            }
            io::print_success(format!("`{}` updated.", key));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}` (use show or set)",
            other
        ))),
    }
}
