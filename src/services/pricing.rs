use serde::Deserialize;

use crate::models::{Activity, NO_PRICE_TEXT};

/// Rupiah display style for card prices
///
/// Amounts are always rounded to whole rupiah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceStyle {
    /// ISO currency code with comma grouping, e.g. `IDR 300,000`
    #[default]
    Iso,
    /// Indonesian locale, e.g. `Rp 300.000`
    Local,
}

impl PriceStyle {
    fn prefix(self) -> &'static str {
        match self {
            PriceStyle::Iso => "IDR",
            PriceStyle::Local => "Rp",
        }
    }

    fn group_separator(self) -> char {
        match self {
            PriceStyle::Iso => ',',
            PriceStyle::Local => '.',
        }
    }

    /// Formats a single rupiah amount
    pub fn format(self, amount: f64) -> String {
        let rounded = amount.round();
        let sign = if rounded < 0.0 { "-" } else { "" };
        let digits = group_digits(rounded.abs() as u64, self.group_separator());
        format!("{}{} {}", sign, self.prefix(), digits)
    }
}

/// Price text for an activity card
///
/// `"-"` without packages, a single price when every package costs the same
/// (after rounding), otherwise `"<min> - <max>"`.
pub fn price_text(activity: &Activity, style: PriceStyle) -> String {
    match activity.price_range() {
        None => NO_PRICE_TEXT.to_string(),
        Some((min, max)) if min.round() == max.round() => style.format(min),
        Some((min, max)) => format!("{} - {}", style.format(min), style.format(max)),
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
