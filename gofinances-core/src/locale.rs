//! Locale-aware currency and date formatting.
//!
//! Only the handful of locales the app ships are supported; each one is a
//! static table of separators, month names and the fixed dashboard phrases.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("unsupported locale: {0}")]
    UnknownLocale(String),

    #[error("invalid timezone: {0}")]
    UnknownTimezone(String),
}

/// Formatting rules and fixed phrases for one locale
#[derive(Debug, PartialEq, Eq)]
pub struct Locale {
    pub tag: &'static str,
    pub currency_symbol: &'static str,
    /// Placed between the symbol and the digits
    pub symbol_spacing: &'static str,
    pub grouping_separator: char,
    pub decimal_separator: char,
    pub month_names: [&'static str; 12],
    /// chrono pattern for the per-row date
    pub short_date_pattern: &'static str,
    /// `{day}` and `{month}` are substituted
    pub day_month_pattern: &'static str,
    pub entries_prefix: &'static str,
    pub expenses_prefix: &'static str,
    pub period_prefix: &'static str,
    pub no_transactions: &'static str,
}

pub static PT_BR: Locale = Locale {
    tag: "pt-BR",
    currency_symbol: "R$",
    symbol_spacing: " ",
    grouping_separator: '.',
    decimal_separator: ',',
    month_names: [
        "janeiro", "fevereiro", "março", "abril", "maio", "junho",
        "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
    ],
    short_date_pattern: "%d/%m/%y",
    day_month_pattern: "{day} de {month}",
    entries_prefix: "Última entrada dia",
    expenses_prefix: "Última saída dia",
    period_prefix: "01 a",
    no_transactions: "Não há transações",
};

pub static EN_US: Locale = Locale {
    tag: "en-US",
    currency_symbol: "$",
    symbol_spacing: "",
    grouping_separator: ',',
    decimal_separator: '.',
    month_names: [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ],
    short_date_pattern: "%m/%d/%y",
    day_month_pattern: "{month} {day}",
    entries_prefix: "Last entry on",
    expenses_prefix: "Last expense on",
    period_prefix: "1 to",
    no_transactions: "No transactions",
};

static LOCALES: [&Locale; 2] = [&PT_BR, &EN_US];

impl Locale {
    /// Look up a built-in locale by BCP 47 tag (case-insensitive, `_` allowed)
    pub fn from_tag(tag: &str) -> Result<&'static Locale, LocaleError> {
        let wanted = tag.trim().replace('_', "-");
        LOCALES
            .iter()
            .copied()
            .find(|l| l.tag.eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| LocaleError::UnknownLocale(tag.to_string()))
    }

    /// Two decimals, half away from zero, grouped, with the currency symbol.
    /// Negative amounts get a leading `-`.
    pub fn format_currency(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let digits = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        format!(
            "{sign}{}{}{}{}{}",
            self.currency_symbol,
            self.symbol_spacing,
            group_digits(int_part, self.grouping_separator),
            self.decimal_separator,
            frac_part
        )
    }

    pub fn month_name(&self, month: u32) -> &'static str {
        self.month_names[(month as usize).saturating_sub(1) % 12]
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Locale plus the time zone dates are displayed in
#[derive(Debug, Clone, Copy)]
pub struct DisplayContext {
    pub locale: &'static Locale,
    pub tz: Tz,
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self {
            locale: &PT_BR,
            tz: Tz::America__Sao_Paulo,
        }
    }
}

impl DisplayContext {
    pub fn new(locale: &'static Locale, tz: Tz) -> Self {
        Self { locale, tz }
    }

    /// Build from config strings, e.g. ("pt-BR", "America/Sao_Paulo")
    pub fn from_names(locale: &str, tz: &str) -> Result<Self, LocaleError> {
        let locale = Locale::from_tag(locale)?;
        let tz: Tz = tz
            .parse()
            .map_err(|_| LocaleError::UnknownTimezone(tz.to_string()))?;
        Ok(Self { locale, tz })
    }

    pub fn currency(&self, amount: Decimal) -> String {
        self.locale.format_currency(amount)
    }

    /// "10 de abril": unpadded day and full month name in the display zone
    pub fn day_month(&self, dt: DateTime<Utc>) -> String {
        let local = dt.with_timezone(&self.tz);
        self.locale
            .day_month_pattern
            .replace("{day}", &local.day().to_string())
            .replace("{month}", self.locale.month_name(local.month()))
    }

    /// "10/04/23"
    pub fn short_date(&self, dt: DateTime<Utc>) -> String {
        dt.with_timezone(&self.tz)
            .format(self.locale.short_date_pattern)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pt_br_currency() {
        assert_eq!(PT_BR.format_currency(Decimal::ZERO), "R$ 0,00");
        assert_eq!(PT_BR.format_currency(Decimal::new(60, 0)), "R$ 60,00");
        assert_eq!(PT_BR.format_currency(Decimal::new(123456, 2)), "R$ 1.234,56");
        assert_eq!(PT_BR.format_currency(Decimal::new(-60, 0)), "-R$ 60,00");
        assert_eq!(PT_BR.format_currency(Decimal::new(1234567891, 1)), "R$ 123.456.789,10");
    }

    #[test]
    fn test_currency_rounds_half_away_from_zero() {
        assert_eq!(PT_BR.format_currency(Decimal::new(1005, 3)), "R$ 1,01");
        assert_eq!(PT_BR.format_currency(Decimal::new(-1005, 3)), "-R$ 1,01");
        // rounds to zero: no stray minus sign
        assert_eq!(PT_BR.format_currency(Decimal::new(-1, 3)), "R$ 0,00");
    }

    #[test]
    fn test_en_us_currency() {
        assert_eq!(EN_US.format_currency(Decimal::new(123456, 2)), "$1,234.56");
        assert_eq!(EN_US.format_currency(Decimal::new(-5, 1)), "-$0.50");
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("pt-BR").unwrap().tag, "pt-BR");
        assert_eq!(Locale::from_tag("pt_br").unwrap().tag, "pt-BR");
        assert_eq!(Locale::from_tag("EN-us").unwrap().tag, "en-US");
        assert_eq!(
            Locale::from_tag("fr-FR").unwrap_err(),
            LocaleError::UnknownLocale("fr-FR".into())
        );
    }

    #[test]
    fn test_day_month_uses_display_zone() {
        let ctx = DisplayContext::default();
        // 02:00 UTC on the 11th is still the 10th in Sao Paulo
        let dt = Utc.with_ymd_and_hms(2023, 4, 11, 2, 0, 0).unwrap();
        assert_eq!(ctx.day_month(dt), "10 de abril");
        assert_eq!(ctx.short_date(dt), "10/04/23");

        let utc = DisplayContext::new(&PT_BR, Tz::UTC);
        assert_eq!(utc.day_month(dt), "11 de abril");
    }

    #[test]
    fn test_day_is_not_padded() {
        let ctx = DisplayContext::new(&EN_US, Tz::UTC);
        let dt = Utc.with_ymd_and_hms(2023, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(ctx.day_month(dt), "March 1");
        assert_eq!(ctx.short_date(dt), "03/01/23");
    }

    #[test]
    fn test_from_names_rejects_bad_zone() {
        let err = DisplayContext::from_names("pt-BR", "Mars/Olympus").unwrap_err();
        assert_eq!(err, LocaleError::UnknownTimezone("Mars/Olympus".into()));
    }
}
