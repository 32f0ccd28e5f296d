//! Amount rendering for reports, sheets and exports.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const INDIAN_LOCALE: &str = "en-IN";
const GROUPING_SEPARATOR: char = ',';

/// Locale and currency pair used when rendering amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub locale: String,
    pub currency: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self::new(INDIAN_LOCALE, "INR")
    }
}

impl CurrencySettings {
    pub fn new(locale: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            currency: currency.into().to_ascii_uppercase(),
        }
    }

    pub fn symbol(&self) -> String {
        symbol_for(&self.currency)
    }

    fn grouping(&self) -> Grouping {
        if self.locale.eq_ignore_ascii_case(INDIAN_LOCALE) {
            Grouping::Indian
        } else {
            Grouping::Thousands
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    Thousands,
    Indian,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        _ => code.into(),
    }
}

/// Formats with two fraction digits, a locale-dependent digit grouping and the currency symbol.
///
/// ```
/// use account_master::currency::{format_currency, CurrencySettings};
/// use rust_decimal::Decimal;
///
/// let settings = CurrencySettings::default();
/// assert_eq!(format_currency(Decimal::new(1234567, 0), &settings), "₹12,34,567.00");
/// ```
pub fn format_currency(amount: Decimal, settings: &CurrencySettings) -> String {
    let rounded = round_cents(amount);
    let body = format_number(rounded.abs(), settings);
    let symbol = settings.symbol();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Grouped two-decimal text without a symbol or sign; the body of `format_currency`.
pub fn format_number(amount: Decimal, settings: &CurrencySettings) -> String {
    let rounded = round_cents(amount);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = match settings.grouping() {
        Grouping::Thousands => group_thousands(int_part),
        Grouping::Indian => group_indian(int_part),
    };
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, GROUPING_SEPARATOR);
        }
        grouped.insert(0, ch);
    }
    grouped
}

// Last three digits, then pairs: 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::new();
    for (count, ch) in head.chars().rev().enumerate() {
        if count != 0 && count % 2 == 0 {
            grouped.insert(0, GROUPING_SEPARATOR);
        }
        grouped.insert(0, ch);
    }
    format!("{}{}{}", grouped, GROUPING_SEPARATOR, tail)
}
