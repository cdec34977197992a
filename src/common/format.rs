// src/common/format.rs

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::middleware::i18n::Locale;

// Horário de Brasília (America/Sao_Paulo, sem horário de verão desde 2019)
const STORE_UTC_OFFSET_SECS: i32 = -3 * 3600;

pub fn store_offset() -> FixedOffset {
    FixedOffset::east_opt(STORE_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

// O "hoje" da loja, não o do servidor.
pub fn local_today() -> NaiveDate {
    Utc::now().with_timezone(&store_offset()).date_naive()
}

/// Valor monetário em reais: `R$ 1.234,50` (pt) ou `R$ 1,234.50` (en).
pub fn format_currency(amount: Decimal, locale: Locale) -> String {
    let (sign, integer, fraction) = split_decimal(amount, 2, locale);
    format!("{sign}R$ {integer}{fraction}")
}

pub fn format_integer(value: u64, locale: Locale) -> String {
    group_thousands(&value.to_string(), locale.messages().thousands_separator)
}

/// Percentual com uma casa decimal: `12,5%`.
pub fn format_percent(value: Decimal, locale: Locale) -> String {
    let (sign, integer, fraction) = split_decimal(value, 1, locale);
    format!("{sign}{integer}{fraction}%")
}

// Quantidades podem ser fracionadas (ex: 1,5 kg). Inteiros saem sem casas.
// Até três casas; zeros à direita saem depois do arredondamento.
pub fn format_quantity(value: Decimal, locale: Locale) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let (sign, integer, fraction) = split_decimal(rounded, rounded.scale(), locale);
    format!("{sign}{integer}{fraction}")
}

pub fn format_datetime(timestamp: DateTime<Utc>, locale: Locale) -> String {
    let local = timestamp.with_timezone(&store_offset());
    match locale {
        Locale::Pt => local.format("%d/%m/%Y %H:%M").to_string(),
        Locale::En => local.format("%Y-%m-%d %H:%M").to_string(),
    }
}

// Retorna (sinal, parte inteira agrupada, separador + casas decimais).
fn split_decimal(value: Decimal, scale: u32, locale: Locale) -> (&'static str, String, String) {
    let messages = locale.messages();
    let rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };

    let abs = rounded.abs();
    let integer_part = abs.trunc();
    let integer = group_thousands(
        &integer_part.to_u128().unwrap_or_default().to_string(),
        messages.thousands_separator,
    );

    if scale == 0 {
        return (sign, integer, String::new());
    }

    let factor = Decimal::from(10u64.pow(scale));
    let digits = ((abs - integer_part) * factor).trunc().to_u64().unwrap_or_default();
    let fraction = format!(
        "{}{:0width$}",
        messages.decimal_separator,
        digits,
        width = scale as usize
    );
    (sign, integer, fraction)
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_uses_brazilian_separators() {
        assert_eq!(format_currency(dec!(1234.5), Locale::Pt), "R$ 1.234,50");
        assert_eq!(format_currency(dec!(0), Locale::Pt), "R$ 0,00");
        assert_eq!(format_currency(dec!(1234567.891), Locale::Pt), "R$ 1.234.567,89");
    }

    #[test]
    fn currency_in_english() {
        assert_eq!(format_currency(dec!(1234.5), Locale::En), "R$ 1,234.50");
    }

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(0.005), Locale::Pt), "R$ 0,01");
        assert_eq!(format_currency(dec!(-10.125), Locale::Pt), "-R$ 10,13");
        assert_eq!(format_currency(dec!(-0.001), Locale::Pt), "R$ 0,00");
    }

    #[test]
    fn integers_and_percentages() {
        assert_eq!(format_integer(0, Locale::Pt), "0");
        assert_eq!(format_integer(1_000, Locale::Pt), "1.000");
        assert_eq!(format_integer(12_345_678, Locale::En), "12,345,678");
        assert_eq!(format_percent(dec!(12.34), Locale::Pt), "12,3%");
        assert_eq!(format_percent(dec!(100), Locale::En), "100.0%");
    }

    #[test]
    fn quantities_drop_trailing_zeros() {
        assert_eq!(format_quantity(dec!(3.000), Locale::Pt), "3");
        assert_eq!(format_quantity(dec!(1.50), Locale::Pt), "1,5");
        assert_eq!(format_quantity(dec!(1200), Locale::Pt), "1.200");
    }

    #[test]
    fn quantities_are_trimmed_after_rounding() {
        assert_eq!(format_quantity(dec!(1.0004), Locale::Pt), "1");
        assert_eq!(format_quantity(dec!(2.99995), Locale::Pt), "3");
        assert_eq!(format_quantity(dec!(0.1254), Locale::Pt), "0,125");
        assert_eq!(format_quantity(dec!(-0.0004), Locale::Pt), "0");
    }

    #[test]
    fn datetime_is_shown_in_store_time() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 2, 30, 0).unwrap();
        assert_eq!(format_datetime(ts, Locale::Pt), "04/03/2024 23:30");
        assert_eq!(format_datetime(ts, Locale::En), "2024-03-04 23:30");
    }
}
