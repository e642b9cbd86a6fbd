//! Non-negative numeric amounts (kilograms, prices, costs).
//!
//! # Invariants
//! - An `Amount` is always finite and `>= 0`.
//! - Absent, null, negative, non-finite and non-numeric inputs collapse to zero.
//! - Numeric strings use leading-number semantics: `"120 kg"` reads as `120`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::ops::Add;

static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

/// Quantity, price or cost that can never go negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    /// Normalizes a raw value; anything that is not a positive finite number is zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    /// Parses free-form user input.
    pub fn parse(input: &str) -> Self {
        Self::new(parse_leading_number(input).unwrap_or(0.0))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Subtraction floored at zero.
    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount::new(self.0 - other.0)
    }

    pub fn min(self, other: Amount) -> Amount {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self::new(f64::from(value))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::new(self.0 + rhs.0)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        Ok(Amount::new(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        Ok(Amount::new(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount::new(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        Ok(Amount::parse(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Amount, D::Error> {
        Amount::deserialize(deserializer)
    }
}

/// Deserializes an amount that must be present and non-null.
///
/// Used for fields whose absence would mean an inconsistent record, such as
/// the closing price of a sold crop.
pub(crate) fn deserialize_required<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(value) => Ok(Amount::new(value)),
        None => Err(de::Error::custom("required amount is null")),
    }
}

/// Reads the leading decimal number of `input`, ignoring trailing text.
///
/// Returns `None` when the input does not start with a number.
pub fn parse_leading_number(input: &str) -> Option<f64> {
    LEADING_NUMBER_RE
        .find(input)
        .and_then(|matched| matched.as_str().trim().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::{parse_leading_number, Amount};

    #[test]
    fn leading_number_ignores_units_and_whitespace() {
        assert_eq!(parse_leading_number(" 120 kg"), Some(120.0));
        assert_eq!(parse_leading_number("12.5kg"), Some(12.5));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("kg 12"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn invalid_and_negative_values_become_zero() {
        assert_eq!(Amount::parse("abc"), Amount::ZERO);
        assert_eq!(Amount::new(-4.0), Amount::ZERO);
        assert_eq!(Amount::new(f64::NAN), Amount::ZERO);
        assert_eq!(Amount::new(f64::INFINITY), Amount::ZERO);
        assert_eq!(Amount::parse("-3").get(), 0.0);
    }

    #[test]
    fn deserializes_null_strings_and_numbers() {
        let values: Vec<Amount> =
            serde_json::from_str(r#"[null, "42.5", 7, -1, "n/a"]"#).unwrap();
        let raw: Vec<f64> = values.into_iter().map(Amount::get).collect();
        assert_eq!(raw, vec![0.0, 42.5, 7.0, 0.0, 0.0]);
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let left = Amount::new(3.0);
        assert_eq!(left.saturating_sub(Amount::new(5.0)), Amount::ZERO);
        assert_eq!(left.saturating_sub(Amount::new(1.0)).get(), 2.0);
    }
}
