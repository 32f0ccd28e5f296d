use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::cli::ui::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        CommandGroup::Settings,
        "backup",
        "List or restore snapshots of the transactions file",
        "backup [list|restore <name>]",
        cmd_backup,
    )
    .with_example("backup restore transactions_20240105_101500_042.json")]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["list"] => list_backups(context),
        ["restore", name] => restore_backup(context, name),
        _ => Err(CommandError::InvalidArguments(
            "usage: backup [list|restore <name>]".into(),
        )),
    }
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.storage.list_backups()?;
    output_section("Backups");
    if backups.is_empty() {
        io::print_info("No backups yet. One is taken before every change to the ledger.");
        return Ok(());
    }
    let mut table = Table::new(vec![TableColumn::left("Name"), TableColumn::left("Created (UTC)")]);
    for backup in backups {
        let created = backup
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".into());
        table.push_row(vec![backup.name, created]);
    }
    output::raw(table.render());
    Ok(())
}

fn restore_backup(context: &mut ShellContext, name: &str) -> CommandResult {
    if context.can_prompt()
        && !io::confirm_action(
            &context.theme,
            &format!("Replace the current ledger with `{}`?", name),
            false,
        )?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let restored = context.storage.restore_backup(name)?;
    io::print_success(format!(
        "Restored {} transaction(s) from `{}`.",
        restored.len(),
        name
    ));
    context.transactions = restored;
    context.state.finish_edit();
    Ok(())
}
