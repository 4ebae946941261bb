//! Fixed-point decimal with exactly two fractional digits
//!
//! Measurements cross the storage boundary as decimal text ("30.75"), never as
//! binary floats. `Decimal2` keeps the value as a count of hundredths so the text
//! form is exact, and converts to `f64` only for display and computation.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest magnitude accepted, matching a NUMERIC(8, 2) column (999999.99)
pub const MAX_HUNDREDTHS: i64 = 99_999_999;

/// Errors produced while converting into a `Decimal2`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("value is empty")]
    Empty,

    #[error("'{0}' is not a decimal number")]
    Invalid(String),

    #[error("value is not a finite number")]
    NotFinite,

    #[error("'{0}' exceeds the maximum of 999999.99")]
    OutOfRange(String),
}

/// Decimal number stored as hundredths
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal2(i64);

impl Decimal2 {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Scale factor between the stored integer and the decimal value
    pub const SCALE: i64 = 100;

    /// Build from a raw count of hundredths
    pub fn from_hundredths(hundredths: i64) -> Result<Self, DecimalError> {
        if hundredths.abs() > MAX_HUNDREDTHS {
            return Err(DecimalError::OutOfRange(format!("{}", hundredths as f64 / 100.0)));
        }
        Ok(Self(hundredths))
    }

    /// Raw count of hundredths
    pub fn hundredths(self) -> i64 {
        self.0
    }

    /// Round a float to two decimal digits.
    ///
    /// The float is first rendered as its shortest round-trip decimal text and
    /// that text is rounded half away from zero. `123.455` therefore becomes
    /// `123.46` even though its binary value sits slightly below the midpoint.
    pub fn from_f64(value: f64) -> Result<Self, DecimalError> {
        if !value.is_finite() {
            return Err(DecimalError::NotFinite);
        }
        format!("{}", value).parse()
    }

    /// Convert to a float for display or computation
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// True when the value is greater than zero
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// True when the value is below zero
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl FromStr for Decimal2 {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(DecimalError::Empty);
        }

        let (negative, unsigned) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(DecimalError::Invalid(text.to_string()));
        }

        let int_digits = int_part.trim_start_matches('0');
        // More than 6 significant integer digits can never fit
        if int_digits.len() > 6 {
            return Err(DecimalError::OutOfRange(text.to_string()));
        }
        let whole: i64 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| DecimalError::Invalid(text.to_string()))?
        };

        let frac = frac_part.as_bytes();
        let digit = |i: usize| frac.get(i).map(|b| i64::from(b - b'0')).unwrap_or(0);
        let mut hundredths = whole * 100 + digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            hundredths += 1;
        }

        if hundredths > MAX_HUNDREDTHS {
            return Err(DecimalError::OutOfRange(text.to_string()));
        }

        Ok(Self(if negative { -hundredths } else { hundredths }))
    }
}

impl fmt::Display for Decimal2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl TryFrom<f64> for Decimal2 {
    type Error = DecimalError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl From<Decimal2> for f64 {
    fn from(value: Decimal2) -> Self {
        value.to_f64()
    }
}

// Serialized as a JSON number, the shape callers of the API expect
impl Serialize for Decimal2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Decimal2 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Decimal2::from_f64(value).map_err(de::Error::custom),
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(text: &str) -> Decimal2 {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(d("30.75").to_string(), "30.75");
        assert_eq!(d("6.5").to_string(), "6.50");
        assert_eq!(d("15").to_string(), "15.00");
        assert_eq!(d(".5").to_string(), "0.50");
        assert_eq!(d("0").to_string(), "0.00");
        assert_eq!(d("-1.05").to_string(), "-1.05");
        assert_eq!(d("007.10").to_string(), "7.10");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(d("123.456").to_string(), "123.46");
        assert_eq!(d("123.454").to_string(), "123.45");
        assert_eq!(d("123.455").to_string(), "123.46");
        assert_eq!(d("0.125").to_string(), "0.13");
        assert_eq!(d("-0.125").to_string(), "-0.13");
        assert_eq!(d("9.999").to_string(), "10.00");
    }

    #[test]
    fn test_from_f64_uses_decimal_text() {
        assert_eq!(Decimal2::from_f64(123.456).unwrap().to_string(), "123.46");
        assert_eq!(Decimal2::from_f64(123.455).unwrap().to_string(), "123.46");
        assert_eq!(Decimal2::from_f64(100.5).unwrap().to_string(), "100.50");
        assert_eq!(Decimal2::from_f64(0.0).unwrap(), Decimal2::ZERO);
        assert_eq!(Decimal2::from_f64(-0.0).unwrap(), Decimal2::ZERO);
        assert_eq!(Decimal2::from_f64(1e-7).unwrap(), Decimal2::ZERO);
    }

    #[test]
    fn test_to_f64_is_exact_for_two_digits() {
        assert_eq!(d("30.75").to_f64(), 30.75);
        assert_eq!(d("67.89").to_f64(), 67.89);
        assert_eq!(d("9.12").to_f64(), 9.12);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!("".parse::<Decimal2>(), Err(DecimalError::Empty));
        assert!(matches!("abc".parse::<Decimal2>(), Err(DecimalError::Invalid(_))));
        assert!(matches!("1.2.3".parse::<Decimal2>(), Err(DecimalError::Invalid(_))));
        assert!(matches!("-".parse::<Decimal2>(), Err(DecimalError::Invalid(_))));
        assert!(matches!("1e5".parse::<Decimal2>(), Err(DecimalError::Invalid(_))));
        assert_eq!(Decimal2::from_f64(f64::NAN), Err(DecimalError::NotFinite));
        assert_eq!(Decimal2::from_f64(f64::INFINITY), Err(DecimalError::NotFinite));
    }

    #[test]
    fn test_range_limit() {
        assert_eq!(d("999999.99").hundredths(), MAX_HUNDREDTHS);
        assert!(matches!("999999.995".parse::<Decimal2>(), Err(DecimalError::OutOfRange(_))));
        assert!(matches!("1000000".parse::<Decimal2>(), Err(DecimalError::OutOfRange(_))));
        assert!(Decimal2::from_hundredths(MAX_HUNDREDTHS + 1).is_err());
    }

    #[test]
    fn test_serde_number_and_text() {
        let value: Decimal2 = serde_json::from_str("12.345").unwrap();
        assert_eq!(value.to_string(), "12.35");

        let value: Decimal2 = serde_json::from_str("\"5.25\"").unwrap();
        assert_eq!(value.to_string(), "5.25");

        assert_eq!(serde_json::to_string(&d("30.75")).unwrap(), "30.75");
    }

    proptest! {
        /// Text produced by Display always parses back to the same value
        #[test]
        fn display_parses_back(hundredths in -MAX_HUNDREDTHS..=MAX_HUNDREDTHS) {
            let value = Decimal2::from_hundredths(hundredths).unwrap();
            prop_assert_eq!(value.to_string().parse::<Decimal2>().unwrap(), value);
        }

        /// Rounding never moves a value by more than half a hundredth
        #[test]
        fn rounding_error_is_bounded(value in 0.0f64..999_999.99) {
            let rounded = Decimal2::from_f64(value).unwrap();
            prop_assert!((rounded.to_f64() - value).abs() <= 0.005 + 1e-9);
        }
    }
}
