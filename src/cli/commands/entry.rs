use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::{CommandEntry, CommandGroup};
use crate::cli::state::View;
use crate::cli::ui::table::{Table, TableColumn};
use crate::core::services::TransactionService;
use crate::domain::transaction::{parse_amount, parse_date, parse_decimal, DATE_FORMAT};
use crate::domain::{Transaction, TransactionDraft, TransactionType};

const RECENT_COUNT: usize = 3;
const SAVE_USAGE: &str = "usage: save <YYYY-MM-DD|today> <amount> <party> [particulars] [labels]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandGroup::Entry,
            "form",
            "Show the entry form",
            "form",
            cmd_form,
        ),
        CommandEntry::new(
            CommandGroup::Entry,
            "type",
            "Switch the form between receipt and expenditure",
            "type <receipt|expenditure>",
            cmd_type,
        ),
        CommandEntry::new(
            CommandGroup::Entry,
            "save",
            "Save the form as a new entry, or update the entry being edited",
            "save [<YYYY-MM-DD|today> <amount> <party> [particulars] [labels]]",
            cmd_save,
        )
        .with_example("save today 1500 \"Sharma Traders\" \"March rent\" office"),
        CommandEntry::new(
            CommandGroup::Entry,
            "edit",
            "Load an entry into the form",
            "edit <id>",
            cmd_edit,
        ),
        CommandEntry::new(
            CommandGroup::Entry,
            "cancel",
            "Leave edit mode",
            "cancel",
            cmd_cancel,
        ),
        CommandEntry::new(
            CommandGroup::Entry,
            "delete",
            "Delete an entry",
            "delete <id>",
            cmd_delete,
        ),
        CommandEntry::new(
            CommandGroup::Entry,
            "recent",
            "Show the latest entries",
            "recent",
            cmd_recent,
        ),
        CommandEntry::new(
            CommandGroup::Entry,
            "balance",
            "Show or set the initial opening balance",
            "balance [amount]",
            cmd_balance,
        ),
    ]
}

fn cmd_form(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.state.view = View::Form;
    match context.state.editing() {
        Some(txn) => {
            output_section(format!("Update Transaction {}", txn.short_id()));
            io::print_info(format!("  Type        : {} (fixed)", txn.kind));
            io::print_info(format!("  Date        : {}", txn.date_label()));
            io::print_info(format!("  {:<12}: {}", txn.kind.party_label(), txn.party));
            io::print_info(format!("  Particulars : {}", txn.particulars));
            io::print_info(format!("  Labels      : {}", txn.labels));
            io::print_info(format!("  Amount      : {}", context.format_amount(txn.amount)));
            io::print_hint("`save` applies changes, `cancel` leaves edit mode.");
        }
        None => {
            output_section("New Transaction");
            io::print_info(format!("  Type : {}", context.state.form_type()));
            io::print_info(format!(
                "  Date : {} (today)",
                context.clock.today().format(DATE_FORMAT)
            ));
            io::print_hint("`type <receipt|expenditure>` switches the form; `save` records it.");
        }
    }
    print_recent(context);
    Ok(())
}

fn cmd_type(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: type <receipt|expenditure>".into())
    })?;
    let kind: TransactionType = raw.parse()?;
    context
        .state
        .set_form_type(kind)
        .map_err(CommandError::InvalidArguments)?;
    context.state.view = View::Form;
    io::print_info(format!("Form type: {}.", kind));
    Ok(())
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() {
        if !context.can_prompt() {
            return Err(CommandError::InvalidArguments(SAVE_USAGE.into()));
        }
        prompt_draft(context)?
    } else {
        draft_from_args(context, args)?
    };

    match context.state.editing().cloned() {
        Some(original) => {
            let revised = original.revise(draft)?;
            let updated = TransactionService::update(context.store(), revised)?;
            context.transactions = updated;
            context.state.finish_edit();
            io::print_success(format!("Transaction {} updated.", original.short_id()));
        }
        None => {
            let txn = Transaction::create(draft, context.clock.as_ref())?;
            let label = format!("{} {} saved ({})", txn.kind, context.format_amount(txn.amount), txn.short_id());
            let updated = TransactionService::record(context.store(), txn)?;
            context.transactions = updated;
            io::print_success(format!("{}.", label));
        }
    }
    Ok(())
}

fn draft_from_args(context: &ShellContext, args: &[&str]) -> Result<TransactionDraft, CommandError> {
    if args.len() < 3 || args.len() > 5 {
        return Err(CommandError::InvalidArguments(SAVE_USAGE.into()));
    }
    let date = if args[0].eq_ignore_ascii_case("today") {
        context.clock.today()
    } else {
        parse_date(args[0])?
    };
    let amount = parse_amount(args[1])?;
    let draft = TransactionDraft::new(date, context.state.form_type(), args[2], amount)
        .with_particulars(args.get(3).copied().unwrap_or_default())
        .with_labels(args.get(4).copied().unwrap_or_default());
    draft.validate()?;
    Ok(draft)
}

fn prompt_draft(context: &ShellContext) -> Result<TransactionDraft, CommandError> {
    let editing = context.state.editing();
    let kind = context.state.form_type();
    let amount_initial = editing.map(|txn| txn.amount_label());

    let date = io::prompt_date(
        &context.theme,
        editing.map_or_else(|| context.clock.today(), |txn| txn.date),
    )?;
    let party = io::prompt_text(
        &context.theme,
        kind.party_label(),
        editing.map(|txn| txn.party.as_str()),
    )?;
    let particulars = io::prompt_optional(
        &context.theme,
        "Particulars",
        editing.map(|txn| txn.particulars.as_str()),
    )?;
    let labels = io::prompt_optional(
        &context.theme,
        "Labels",
        editing.map(|txn| txn.labels.as_str()),
    )?;
    let amount = io::prompt_amount(&context.theme, amount_initial.as_deref())?;

    let draft = TransactionDraft::new(date, kind, party, amount)
        .with_particulars(particulars)
        .with_labels(labels);
    draft.validate()?;
    Ok(draft)
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: edit <id>".into()))?;
    let txn = TransactionService::find(&context.transactions, reference)?.clone();
    io::print_info(format!(
        "Editing {} {} ({}).",
        txn.kind,
        txn.short_id(),
        txn.date_label()
    ));
    context.state.begin_edit(txn);
    cmd_form(context, &[])
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.state.finish_edit() {
        Some(txn) => io::print_info(format!("Stopped editing {}.", txn.short_id())),
        None => io::print_info("Nothing is being edited."),
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args
        .first()
        .map(|value| value.trim())
        .ok_or_else(|| CommandError::InvalidArguments("usage: delete <id>".into()))?;
    if !context
        .transactions
        .iter()
        .any(|txn| txn.id.starts_with(reference))
    {
        tracing::warn!(id = reference, "delete requested for unknown id");
        io::print_warning(format!("No transaction with id `{}`; nothing deleted.", reference));
        return Ok(());
    }
    let txn = TransactionService::find(&context.transactions, reference)?.clone();

    if context.can_prompt() {
        let prompt = format!(
            "Delete {} of {} to {} on {}?",
            txn.kind,
            context.format_amount(txn.amount),
            txn.party,
            txn.date_label()
        );
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    let updated = TransactionService::delete(context.store(), &txn.id)?;
    context.transactions = updated;
    if context
        .state
        .editing()
        .is_some_and(|editing| editing.id == txn.id)
    {
        context.state.finish_edit();
    }
    io::print_success(format!("Transaction {} deleted.", txn.short_id()));
    Ok(())
}

fn cmd_recent(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_recent(context);
    Ok(())
}

fn print_recent(context: &ShellContext) {
    output_section("Recent Activity");
    let recent = TransactionService::recent(&context.transactions, RECENT_COUNT);
    if recent.is_empty() {
        io::print_info("No transactions yet.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Type"),
        TableColumn::left("Party").max(24),
        TableColumn::right("Amount"),
    ]);
    for txn in recent {
        table.push_row(vec![
            txn.short_id().to_string(),
            txn.date_label(),
            txn.kind.to_string(),
            txn.party.clone(),
            context.format_amount(txn.amount),
        ]);
    }
    output::raw(table.render());
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        io::print_info(format!(
            "Initial opening balance: {}",
            context.format_amount(context.initial_balance)
        ));
        return Ok(());
    }
    let amount = parse_decimal(&args.join(""))?;
    let saved = TransactionService::set_initial_balance(context.store(), amount)?;
    context.initial_balance = saved;
    io::print_success(format!(
        "Initial opening balance set to {}.",
        context.format_amount(saved)
    ));
    Ok(())
}
