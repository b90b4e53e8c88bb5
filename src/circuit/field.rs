use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One circuit input value. All values the encoder produces fit in 128 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldElement(pub u128);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement(0);

    pub fn value(&self) -> u128 {
        self.0
    }

    /// Big-endian integer value of exactly 16 bytes.
    pub fn from_be_chunk(chunk: &[u8; 16]) -> Self {
        FieldElement(u128::from_be_bytes(*chunk))
    }

    pub fn to_be_chunk(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl From<u128> for FieldElement {
    fn from(value: u128) -> Self {
        FieldElement(value)
    }
}

impl From<u32> for FieldElement {
    fn from(value: u32) -> Self {
        FieldElement(value as u128)
    }
}

impl From<u8> for FieldElement {
    fn from(value: u8) -> Self {
        FieldElement(value as u128)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldParseError {
    #[error("field element is empty")]
    Empty,
    #[error("field element {0:?} is not a decimal integer")]
    NotDecimal(String),
    #[error("field element {0:?} does not fit in 128 bits")]
    Overflow(String),
}

impl FromStr for FieldElement {
    type Err = FieldParseError;

    /// Decimal digits only; leading zeros are accepted and dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FieldParseError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldParseError::NotDecimal(s.to_string()));
        }
        s.parse::<u128>()
            .map(FieldElement)
            .map_err(|_| FieldParseError::Overflow(s.to_string()))
    }
}

// Decimal strings on the wire: JSON numbers lose precision above 2^53 in
// most clients, and every stored-hash half is a full 128-bit value.
impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct FieldElementVisitor;

impl<'de> Visitor<'de> for FieldElementVisitor {
    type Value = FieldElement;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal string or a non-negative integer below 2^64")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(FieldElement(v as u128))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(FieldElement(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(|v| FieldElement(v as u128))
            .map_err(|_| E::custom(format!("field element {v} is negative")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(E::custom(format!(
            "field element {v} is not an exact integer; send values above 2^64 as decimal strings"
        )))
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldElementVisitor)
    }
}
