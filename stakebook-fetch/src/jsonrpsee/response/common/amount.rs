//! Common types for handling coin and smallest-unit amounts.

use std::fmt;

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::chain::error::ParseError;

/// An exact amount in the chain's smallest unit.
///
/// Backed by a 256-bit integer so no decimal amount the node can report overflows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub U256);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(U256::zero());

    /// Construct from integer smallest units.
    pub fn from_units(units: u64) -> Self {
        Amount(U256::from(units))
    }

    /// Returns the amount as a `u64`, if it fits.
    pub fn as_u64(&self) -> Option<u64> {
        if self.0 > U256::from(u64::MAX) {
            None
        } else {
            Some(self.0.low_u64())
        }
    }

    /// Converts a decimal coin amount such as `"1.50000000"` into smallest units.
    ///
    /// `decimals` is the number of fractional digits in one coin. Fractional digits past
    /// `decimals` are truncated. An empty string or a lone `.` is zero. A leading `+` is
    /// accepted; a leading `-`, exponents and other non-digit characters are refused.
    pub fn from_decimal_str(amount: &str, decimals: u32) -> Result<Self, ParseError> {
        let invalid = |reason| ParseError::InvalidAmount {
            amount: amount.to_string(),
            reason,
        };

        let s = amount.trim();
        if s.is_empty() {
            return Ok(Amount::ZERO);
        }
        if s.starts_with('-') {
            return Err(invalid("negative amount"));
        }

        let s = match s.strip_prefix('+') {
            Some("") => return Err(invalid("no digits")),
            Some(rest) => rest,
            None => s,
        };

        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        if !int.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("not a decimal numeral"));
        }

        let decimals = decimals as usize;
        let mut digits = String::with_capacity(int.len() + decimals);
        digits.push_str(int);
        if frac.len() >= decimals {
            digits.push_str(&frac[..decimals]);
        } else {
            digits.push_str(frac);
            digits.extend(std::iter::repeat('0').take(decimals - frac.len()));
        }
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Amount::ZERO);
        }

        U256::from_dec_str(digits)
            .map(Amount)
            .map_err(|_| invalid("overflow"))
    }

    /// Renders the amount as a decimal coin string with exactly `decimals` fractional digits.
    pub fn to_decimal_string(&self, decimals: u32) -> String {
        let decimals = decimals as usize;
        let units = self.0.to_string();
        if decimals == 0 {
            return units;
        }
        let padded = if units.len() <= decimals {
            format!("{}{}", "0".repeat(decimals + 1 - units.len()), units)
        } else {
            units
        };
        let (int, frac) = padded.split_at(padded.len() - decimals);
        format!("{int}.{frac}")
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Amount::from_units(units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        // Decimal string, JSON numbers cannot hold the full range.
        ser.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IntLike {
            U64(u64),
            Str(String),
        }

        match IntLike::deserialize(de)? {
            IntLike::U64(u) => Ok(Amount::from_units(u)),
            IntLike::Str(s) => {
                let s = s.trim();
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(de::Error::custom("expected integer smallest units"));
                }
                U256::from_dec_str(s)
                    .map(Amount)
                    .map_err(|_| de::Error::custom("overflow"))
            }
        }
    }
}

/// A decimal coin amount exactly as the node reported it.
///
/// Accepts a JSON string or number. Only lives on the wire types; it is converted to
/// [`Amount`] during normalisation and not carried further.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecimalAmount(pub String);

impl DecimalAmount {
    /// Converts into smallest units.
    pub fn to_amount(&self, decimals: u32) -> Result<Amount, ParseError> {
        Amount::from_decimal_str(&self.0, decimals)
    }
}

impl Serialize for DecimalAmount {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DecimalAmount {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct DecimalVisitor;

        impl de::Visitor<'_> for DecimalVisitor {
            type Value = DecimalAmount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal amount as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(DecimalAmount(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(DecimalAmount(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(DecimalAmount(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(DecimalAmount(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                if !v.is_finite() {
                    return Err(E::custom("invalid amount"));
                }
                // f64 Display never uses exponent notation.
                Ok(DecimalAmount(v.to_string()))
            }
        }

        de.deserialize_any(DecimalVisitor)
    }
}
