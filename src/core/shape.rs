//! Structural validation of untyped JSON against the thought shape.
//!
//! Checks are field-by-field membership and arity tests. Every mismatch is
//! collected with a path such as `thought[2]` or `[1].left[0]` so callers see
//! all problems at once.

use crate::domain::model::{
    Digit, Left, Operator, Thought, ThoughtResult, Unused, EQUALS_SYMBOL, PLACEHOLDER_SYMBOL,
};
use crate::utils::error::{Result, ThoughtError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const THOUGHT_ARITY: usize = 5;
pub const LEFT_ARITY: usize = 3;
pub const UNUSED_ARITY: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    DigitOutOfDomain { found: String },
    UnknownOperator { found: String },
    WrongArity { expected: usize, actual: usize },
    MarkerMismatch { expected: &'static str, found: String },
    NotASequence { found: String },
    NotARecord { found: String },
    MissingField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeViolation {
    pub path: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl ShapeViolation {
    fn new(path: &str, kind: ViolationKind) -> Self {
        let path = if path.is_empty() { "$" } else { path };
        Self {
            path: path.to_string(),
            kind,
        }
    }
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::DigitOutOfDomain { found } => {
                write!(f, "{}: {} is not a digit between 0 and 13", self.path, found)
            }
            ViolationKind::UnknownOperator { found } => {
                write!(f, "{}: {} is not one of + - * /", self.path, found)
            }
            ViolationKind::WrongArity { expected, actual } => write!(
                f,
                "{}: expected {} elements, found {}",
                self.path, expected, actual
            ),
            ViolationKind::MarkerMismatch { expected, found } => {
                write!(f, "{}: expected marker \"{}\", found {}", self.path, expected, found)
            }
            ViolationKind::NotASequence { found } => {
                write!(f, "{}: expected an array, found {}", self.path, found)
            }
            ViolationKind::NotARecord { found } => {
                write!(f, "{}: expected an object, found {}", self.path, found)
            }
            ViolationKind::MissingField => write!(f, "{}: field is missing", self.path),
        }
    }
}

/// Every violation found in one value (or one document).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShapeReport {
    pub violations: Vec<ShapeViolation>,
}

impl ShapeReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeViolation> {
        self.violations.iter()
    }

    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    fn extend(&mut self, other: Vec<ShapeViolation>) {
        self.violations.extend(other);
    }
}

impl From<ShapeViolation> for ShapeReport {
    fn from(violation: ShapeViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

impl From<Vec<ShapeViolation>> for ShapeReport {
    fn from(violations: Vec<ShapeViolation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ShapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return f.write_str("no violations");
        }
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ShapeReport {}

/// Machine-readable outcome printed by `validate --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    pub violations: Vec<ShapeViolation>,
}

impl ValidationSummary {
    pub fn passed(records: usize) -> Self {
        Self {
            valid: true,
            records: Some(records),
            violations: Vec::new(),
        }
    }

    pub fn failed(report: &ShapeReport) -> Self {
        Self {
            valid: false,
            records: None,
            violations: report.violations.clone(),
        }
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

pub fn check_digit(path: &str, value: &Value) -> std::result::Result<Digit, ShapeViolation> {
    Digit::from_json(value).map_err(|_| {
        ShapeViolation::new(
            path,
            ViolationKind::DigitOutOfDomain {
                found: value.to_string(),
            },
        )
    })
}

pub fn check_operator(path: &str, value: &Value) -> std::result::Result<Operator, ShapeViolation> {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            ShapeViolation::new(
                path,
                ViolationKind::UnknownOperator {
                    found: value.to_string(),
                },
            )
        })
}

pub fn check_marker(
    path: &str,
    value: &Value,
    expected: &'static str,
) -> std::result::Result<(), ShapeViolation> {
    if value.as_str() == Some(expected) {
        Ok(())
    } else {
        Err(ShapeViolation::new(
            path,
            ViolationKind::MarkerMismatch {
                expected,
                found: value.to_string(),
            },
        ))
    }
}

/// Returns the elements when `value` is an array of exactly `arity` items.
fn check_sequence<'a>(
    path: &str,
    value: &'a Value,
    arity: usize,
) -> std::result::Result<&'a [Value], ShapeViolation> {
    let items = value.as_array().ok_or_else(|| {
        ShapeViolation::new(
            path,
            ViolationKind::NotASequence {
                found: value.to_string(),
            },
        )
    })?;
    if items.len() != arity {
        return Err(ShapeViolation::new(
            path,
            ViolationKind::WrongArity {
                expected: arity,
                actual: items.len(),
            },
        ));
    }
    Ok(items.as_slice())
}

/// Collects the error half of each check into `violations`.
fn keep<T>(
    violations: &mut Vec<ShapeViolation>,
    check: std::result::Result<T, ShapeViolation>,
) -> Option<T> {
    match check {
        Ok(v) => Some(v),
        Err(e) => {
            violations.push(e);
            None
        }
    }
}

pub fn check_thought(
    path: &str,
    value: &Value,
) -> std::result::Result<Thought, Vec<ShapeViolation>> {
    let items = check_sequence(path, value, THOUGHT_ARITY).map_err(|e| vec![e])?;
    let mut violations = Vec::new();

    let lhs = keep(&mut violations, check_digit(&index(path, 0), &items[0]));
    let operator = keep(&mut violations, check_operator(&index(path, 1), &items[1]));
    let rhs = keep(&mut violations, check_digit(&index(path, 2), &items[2]));
    keep(&mut violations, check_marker(&index(path, 3), &items[3], EQUALS_SYMBOL));
    keep(&mut violations, check_marker(&index(path, 4), &items[4], PLACEHOLDER_SYMBOL));

    match (lhs, operator, rhs) {
        (Some(lhs), Some(operator), Some(rhs)) if violations.is_empty() => {
            Ok(Thought::new(lhs, operator, rhs))
        }
        _ => Err(violations),
    }
}

pub fn check_left(path: &str, value: &Value) -> std::result::Result<Left, Vec<ShapeViolation>> {
    let items = check_sequence(path, value, LEFT_ARITY).map_err(|e| vec![e])?;
    let mut violations = Vec::new();

    keep(&mut violations, check_marker(&index(path, 0), &items[0], PLACEHOLDER_SYMBOL));
    let first = keep(&mut violations, check_digit(&index(path, 1), &items[1]));
    let second = keep(&mut violations, check_digit(&index(path, 2), &items[2]));

    match (first, second) {
        (Some(first), Some(second)) if violations.is_empty() => Ok(Left(first, second)),
        _ => Err(violations),
    }
}

pub fn check_unused(path: &str, value: &Value) -> std::result::Result<Unused, Vec<ShapeViolation>> {
    let items = check_sequence(path, value, UNUSED_ARITY).map_err(|e| vec![e])?;
    let mut violations = Vec::new();

    let first = keep(&mut violations, check_digit(&index(path, 0), &items[0]));
    let second = keep(&mut violations, check_digit(&index(path, 1), &items[1]));

    match (first, second) {
        (Some(first), Some(second)) => Ok(Unused(first, second)),
        _ => Err(violations),
    }
}

fn require<'a>(
    object: &'a serde_json::Map<String, Value>,
    prefix: &str,
    name: &str,
    report: &mut ShapeReport,
) -> Option<&'a Value> {
    let found = object.get(name);
    if found.is_none() {
        report
            .violations
            .push(ShapeViolation::new(&join(prefix, name), ViolationKind::MissingField));
    }
    found
}

/// Checks one record; `prefix` is prepended to every reported path.
pub fn check_record(
    prefix: &str,
    value: &Value,
) -> std::result::Result<ThoughtResult, ShapeReport> {
    let object = value.as_object().ok_or_else(|| {
        ShapeReport::from(ShapeViolation::new(
            prefix,
            ViolationKind::NotARecord {
                found: value.to_string(),
            },
        ))
    })?;

    let mut report = ShapeReport::default();
    let thought_value = require(object, prefix, "thought", &mut report);
    let left_value = require(object, prefix, "left", &mut report);
    let unused_value = require(object, prefix, "unused", &mut report);

    let thought = thought_value.and_then(|v| match check_thought(&join(prefix, "thought"), v) {
        Ok(t) => Some(t),
        Err(e) => {
            report.extend(e);
            None
        }
    });
    let left = left_value.and_then(|v| match check_left(&join(prefix, "left"), v) {
        Ok(l) => Some(l),
        Err(e) => {
            report.extend(e);
            None
        }
    });
    let unused = unused_value.and_then(|v| match check_unused(&join(prefix, "unused"), v) {
        Ok(u) => Some(u),
        Err(e) => {
            report.extend(e);
            None
        }
    });

    match (thought, left, unused) {
        (Some(thought), Some(left), Some(unused)) => Ok(ThoughtResult {
            thought,
            left,
            unused,
        }),
        _ => Err(report),
    }
}

/// Validates a value against the `ThoughtResult` shape.
pub fn validate_value(value: &Value) -> ShapeReport {
    match check_record("", value) {
        Ok(_) => ShapeReport::default(),
        Err(report) => report,
    }
}

pub fn parse_result(value: &Value) -> Result<ThoughtResult> {
    check_record("", value).map_err(ThoughtError::Shape)
}

/// Parses JSON text holding either one record or an array of records.
pub fn parse_document(text: &str) -> Result<Vec<ThoughtResult>> {
    let value: Value = serde_json::from_str(text)?;

    let Value::Array(items) = &value else {
        return Ok(vec![parse_result(&value)?]);
    };

    let mut report = ShapeReport::default();
    let mut results = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match check_record(&format!("[{}]", i), item) {
            Ok(result) => results.push(result),
            Err(e) => report.extend(e.violations),
        }
    }

    if report.is_valid() {
        Ok(results)
    } else {
        Err(ThoughtError::Shape(report))
    }
}
