use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// The only currency plans are priced in.
pub const INR: &str = "INR";

/// A monetary value in the smallest unit of its currency (paise for INR).
///
/// Amounts travel over the wire as integers to avoid floating-point rounding;
/// conversion to major units only happens for display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnits(pub u64);

impl MinorUnits {
    pub const ZERO: Self = Self(0);

    /// Scales a whole major-unit price (rupees) into minor units.
    pub fn from_major(major: u64) -> Self {
        Self(major * 100)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The amount in major units with two fractional digits.
    pub fn to_major(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), 2)
    }
}

impl Add for MinorUnits {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_major())
    }
}

/// Formats a major-unit amount for the given currency.
///
/// INR uses the rupee sign and Indian digit grouping (lakh/crore); any other
/// currency falls back to `<CODE> <amount>` with plain two-decimal output.
pub fn format_currency(major: Decimal, currency: &str) -> String {
    let rounded = major.round_dp(2);
    if !currency.eq_ignore_ascii_case(INR) {
        return format!("{} {:.2}", currency.to_uppercase(), rounded);
    }

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((&text, "00"));

    let grouped = group_indian(whole);
    let sign = if negative { "-" } else { "" };
    format!("{sign}₹{grouped}.{fraction}")
}

/// Formats an amount held in minor units.
pub fn format_minor(amount: MinorUnits, currency: &str) -> String {
    format_currency(amount.to_major(), currency)
}

// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
