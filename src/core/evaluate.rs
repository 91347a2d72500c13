use crate::domain::model::{Digit, Operator, Thought};
use crate::utils::error::{Result, ThoughtError};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Outcome of one thought step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Whole(i64),
    /// Result of true division; always printed with a fractional part.
    Fraction(f64),
}

impl Default for Number {
    fn default() -> Self {
        Number::Whole(0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Whole(n) => write!(f, "{}", n),
            Number::Fraction(x) if x.fract() == 0.0 => write!(f, "{:.1}", x),
            Number::Fraction(x) => write!(f, "{}", x),
        }
    }
}

pub fn evaluate(thought: &Thought) -> Result<Number> {
    let lhs = i64::from(thought.lhs.value());
    let rhs = i64::from(thought.rhs.value());

    match thought.operator {
        Operator::Add => Ok(Number::Whole(lhs + rhs)),
        Operator::Subtract => Ok(Number::Whole(lhs - rhs)),
        Operator::Multiply => Ok(Number::Whole(lhs * rhs)),
        Operator::Divide if rhs == 0 => Err(ThoughtError::EvaluationError {
            message: format!("division by zero in '{}'", thought),
        }),
        Operator::Divide => Ok(Number::Fraction(lhs as f64 / rhs as f64)),
    }
}

fn expression_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\[\s*"?(\d+)"?,\s*"?([/+\-*])"?,\s*"?(\d+)"#)
            .expect("expression pattern is valid")
    })
}

/// Finds the single `[digit, op, digit` prefix in free text. Operands and the
/// operator may be quoted, so both raw and JSON spellings match.
///
/// Returns `None` when there is no match, more than one match, or an operand
/// outside the digit domain.
pub fn extract_expression(text: &str) -> Option<Thought> {
    let mut matches = expression_pattern().captures_iter(text);
    let caps = matches.next()?;
    if matches.next().is_some() {
        return None;
    }

    let operand = |s: &str| s.parse::<u8>().ok().and_then(|v| Digit::new(v).ok());
    let lhs = operand(&caps[1])?;
    let operator = caps[2].parse().ok()?;
    let rhs = operand(&caps[3])?;
    Some(Thought::new(lhs, operator, rhs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thought(lhs: u8, op: &str, rhs: u8) -> Thought {
        Thought::new(
            Digit::new(lhs).unwrap(),
            op.parse().unwrap(),
            Digit::new(rhs).unwrap(),
        )
    }

    #[test]
    fn test_evaluate_operators() {
        assert_eq!(evaluate(&thought(3, "+", 4)).unwrap(), Number::Whole(7));
        assert_eq!(evaluate(&thought(2, "-", 9)).unwrap(), Number::Whole(-7));
        assert_eq!(evaluate(&thought(13, "*", 13)).unwrap(), Number::Whole(169));
        assert_eq!(evaluate(&thought(13, "/", 4)).unwrap(), Number::Fraction(3.25));
    }

    #[test]
    fn test_division_by_zero() {
        let err = evaluate(&thought(5, "/", 0)).unwrap_err();
        assert!(matches!(err, ThoughtError::EvaluationError { .. }));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Whole(7).to_string(), "7");
        assert_eq!(Number::Fraction(3.25).to_string(), "3.25");
        assert_eq!(Number::Fraction(2.0).to_string(), "2.0");
        assert_eq!(Number::default().to_string(), "0");
    }

    #[test]
    fn test_extract_expression() {
        let text = r#"{"thought": [13, "/", 4, "=", "@"]}{"action": 0}"#;
        assert_eq!(extract_expression(text), Some(thought(13, "/", 4)));

        let spaced = "[ 3,   *, 5";
        assert_eq!(extract_expression(spaced), Some(thought(3, "*", 5)));

        let quoted = r#"["12", "-", "2"]"#;
        assert_eq!(extract_expression(quoted), Some(thought(12, "-", 2)));
    }

    #[test]
    fn test_extract_requires_exactly_one_match() {
        assert_eq!(extract_expression("no expression here"), None);
        assert_eq!(extract_expression("[1, +, 2 and [3, -, 4"), None);
    }

    #[test]
    fn test_extract_rejects_operands_outside_domain() {
        assert_eq!(extract_expression("[14, +, 2"), None);
        assert_eq!(extract_expression("[1, +, 99999999999"), None);
    }
}
