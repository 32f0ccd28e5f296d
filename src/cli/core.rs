//! Shell context: loaded ledger, screen state, settings and command dispatch.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigError, ConfigManager},
    core::{
        services::{ServiceError, SummaryService},
        time::{Clock, SystemClock},
        utils::PathResolver,
    },
    currency::{format_currency, CurrencySettings},
    domain::{DateWindow, LedgerSummary, ReportView, Transaction},
    errors::LedgerError,
    export::ExportError,
    storage::{JsonStorage, TransactionStore},
};

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
use super::state::ShellState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(err) => CommandError::Ledger(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Storage(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub storage: JsonStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub clock: Box<dyn Clock>,
    pub state: ShellState,
    pub transactions: Vec<Transaction>,
    pub initial_balance: Decimal,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir(), Box::new(SystemClock))
    }

    /// Builds a shell over the data directory `base`, reading time from `clock`.
    pub fn with_base_dir(
        mode: CliMode,
        base: PathBuf,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "configuration unreadable; using defaults");
                cli_io::print_warning(format!("Configuration unreadable ({}); using defaults.", err));
                Config::default()
            }
        };
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let storage = JsonStorage::new(Some(base), Some(config.backup_retention))?;
        let transactions = storage.load_transactions();
        let initial_balance = storage.load_initial_balance();
        let state = ShellState::new(DateWindow::month_of(clock.today()));
        tracing::debug!(
            entries = transactions.len(),
            base = %storage.base_dir().display(),
            "shell context ready"
        );

        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            storage,
            config_manager,
            config,
            clock,
            state,
            transactions,
            initial_balance,
            last_command: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        format!("account-master [{}]> ", self.state.prompt_label())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn store(&self) -> &dyn TransactionStore {
        &self.storage
    }

    pub(crate) fn currency(&self) -> CurrencySettings {
        self.config.currency_settings()
    }

    pub(crate) fn format_amount(&self, amount: Decimal) -> String {
        format_currency(amount, &self.currency())
    }

    pub(crate) fn ledger_summary(&self) -> LedgerSummary {
        SummaryService::summarize(&self.transactions, self.state.window, self.initial_balance)
    }

    pub(crate) fn report_view(&self) -> ReportView {
        SummaryService::apply_search(&self.ledger_summary(), self.state.search().unwrap_or(""))
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .into_iter()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true).unwrap_or(true))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Dialoguer(err) if self.mode == CliMode::Interactive => {
                tracing::debug!(error = %err, "prompt aborted");
                self.print_warning("Prompt cancelled.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}
