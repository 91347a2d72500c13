use crate::core::shape::{self, ShapeReport};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest value a [`Digit`] may hold.
pub const MAX_DIGIT: u8 = 13;

/// Marker closing the arithmetic part of a thought.
pub const EQUALS_SYMBOL: &str = "=";

/// Marker standing in for the value a thought produces.
pub const PLACEHOLDER_SYMBOL: &str = "@";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a digit between 0 and 13")]
pub struct DigitError(pub String);

/// A symbolic digit in `0..=13`.
///
/// JSON accepts either an integer or the canonical decimal string ("0".."13");
/// serialization always writes the integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Result<Self, DigitError> {
        if value <= MAX_DIGIT {
            Ok(Self(value))
        } else {
            Err(DigitError(value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Every digit in ascending order.
    pub fn all() -> impl Iterator<Item = Digit> {
        (0..=MAX_DIGIT).map(Digit)
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, DigitError> {
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .filter(|v| *v <= u64::from(MAX_DIGIT))
                .map(|v| Digit(v as u8))
                .ok_or_else(|| DigitError(n.to_string())),
            serde_json::Value::String(s) => s.parse(),
            other => Err(DigitError(other.to_string())),
        }
    }
}

impl FromStr for Digit {
    type Err = DigitError;

    /// Only canonical spellings parse: no sign, no leading zeros, no padding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s == "0" || !s.starts_with('0'));
        if !canonical {
            return Err(DigitError(s.to_string()));
        }
        s.parse::<u8>()
            .ok()
            .and_then(|v| Digit::new(v).ok())
            .ok_or_else(|| DigitError(s.to_string()))
    }
}

impl TryFrom<serde_json::Value> for Digit {
    type Error = DigitError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Digit::from_json(&value)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not one of + - * /")]
pub struct OperatorError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

impl FromStr for Operator {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| OperatorError(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `[Digit, Operator, Digit, "=", "@"]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Thought {
    pub lhs: Digit,
    pub operator: Operator,
    pub rhs: Digit,
}

impl Thought {
    pub fn new(lhs: Digit, operator: Operator, rhs: Digit) -> Self {
        Self { lhs, operator, rhs }
    }
}

impl Serialize for Thought {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            self.lhs,
            self.operator,
            self.rhs,
            EQUALS_SYMBOL,
            PLACEHOLDER_SYMBOL,
        )
            .serialize(serializer)
    }
}

impl TryFrom<serde_json::Value> for Thought {
    type Error = ShapeReport;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        shape::check_thought("thought", &value).map_err(ShapeReport::from)
    }
}

impl fmt::Display for Thought {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.lhs, self.operator, self.rhs, EQUALS_SYMBOL, PLACEHOLDER_SYMBOL
        )
    }
}

/// `["@", Digit, Digit]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Left(pub Digit, pub Digit);

impl Serialize for Left {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (PLACEHOLDER_SYMBOL, self.0, self.1).serialize(serializer)
    }
}

impl TryFrom<serde_json::Value> for Left {
    type Error = ShapeReport;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        shape::check_left("left", &value).map_err(ShapeReport::from)
    }
}

/// `[Digit, Digit]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Unused(pub Digit, pub Digit);

impl Serialize for Unused {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.0, self.1).serialize(serializer)
    }
}

impl TryFrom<serde_json::Value> for Unused {
    type Error = ShapeReport;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        shape::check_unused("unused", &value).map_err(ShapeReport::from)
    }
}

/// The full record: one thought step plus the two auxiliary sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ThoughtResult {
    pub thought: Thought,
    pub left: Left,
    pub unused: Unused,
}

impl TryFrom<serde_json::Value> for ThoughtResult {
    type Error = ShapeReport;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        shape::check_record("", &value)
    }
}
