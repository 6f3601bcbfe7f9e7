use std::collections::BTreeMap;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use thiserror::Error;

/// Fuel label as it appears on the station page → current price.
/// Iteration order is the lexicographic order of the label.
pub type PriceTable = BTreeMap<String, Price>;

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub street: String,
    pub prices: PriceTable,
}

/// An exact decimal price, kept in thousandths of a Euro so comparisons
/// against alarm limits never suffer from float noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

#[derive(Error, Debug, PartialEq, Eq)]
#[error("not a decimal price: {0:?}")]
pub struct ParsePriceError(String);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn millis(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Price(self.0.abs())
    }

    /// Rounded to whole cents, half away from zero on the exact value.
    pub fn cents(self) -> i64 {
        let cents = (self.0.abs() + 5) / 10;
        if self.0 < 0 { -cents } else { cents }
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Price) -> Price {
        Price(self.0 - rhs.0)
    }
}

/// Always two decimals.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.abs();
        write!(f, "{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}

/// Accepts `digits` or `digits.digits`. Digits past the third decimal are
/// rounded half-up into the thousandths.
impl FromStr for Price {
    type Err = ParsePriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePriceError(s.to_string());
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (s, None),
        };

        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || frac_part.is_some_and(|f| !all_digits(f)) {
            return Err(err());
        }

        let whole: i64 = int_part.parse().map_err(|_| err())?;
        let mut millis = whole.checked_mul(1000).ok_or_else(err)?;

        if let Some(frac) = frac_part {
            let digits: Vec<i64> = frac.bytes().map(|b| i64::from(b - b'0')).collect();
            let digit = |i: usize| digits.get(i).copied().unwrap_or(0);
            let mut fraction = digit(0) * 100 + digit(1) * 10 + digit(2);
            if digit(3) >= 5 {
                fraction += 1;
            }
            millis = millis.checked_add(fraction).ok_or_else(err)?;
        }

        Ok(Price(millis))
    }
}
