//! Message shorthands and the dialoguer prompts behind the entry form.

use std::fmt;

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use rust_decimal::Decimal;

use crate::cli::core::CommandError;
use crate::cli::output;
use crate::domain::transaction::{parse_amount, parse_date, DATE_FORMAT};

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Asks until a non-blank value is entered. `initial` pre-fills the editable line.
pub fn prompt_text(
    theme: &ColorfulTheme,
    prompt: &str,
    initial: Option<&str>,
) -> Result<String, CommandError> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|value: &String| -> Result<(), String> {
            if value.trim().is_empty() {
                Err("a value is required".into())
            } else {
                Ok(())
            }
        });
    if let Some(value) = initial.filter(|value| !value.is_empty()) {
        input = input.with_initial_text(value);
    }
    let value = input.interact_text()?;
    Ok(value.trim().to_string())
}

pub fn prompt_optional(
    theme: &ColorfulTheme,
    prompt: &str,
    initial: Option<&str>,
) -> Result<String, CommandError> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true);
    if let Some(value) = initial.filter(|value| !value.is_empty()) {
        input = input.with_initial_text(value);
    }
    let value = input.interact_text()?;
    Ok(value.trim().to_string())
}

/// Entry date, re-asked until it parses as `YYYY-MM-DD`.
pub fn prompt_date(theme: &ColorfulTheme, initial: NaiveDate) -> Result<NaiveDate, CommandError> {
    let text = Input::<String>::with_theme(theme)
        .with_prompt("Date (YYYY-MM-DD)")
        .with_initial_text(initial.format(DATE_FORMAT).to_string())
        .validate_with(|value: &String| parse_date(value).map(|_| ()).map_err(|err| err.to_string()))
        .interact_text()?;
    Ok(parse_date(&text)?)
}

/// Entry amount, re-asked until it is a positive number.
pub fn prompt_amount(theme: &ColorfulTheme, initial: Option<&str>) -> Result<Decimal, CommandError> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt("Amount")
        .validate_with(|value: &String| {
            parse_amount(value).map(|_| ()).map_err(|err| err.to_string())
        });
    if let Some(value) = initial {
        input = input.with_initial_text(value);
    }
    let text = input.interact_text()?;
    Ok(parse_amount(&text)?)
}
