use crate::domain::model::{Digit, Operator, EQUALS_SYMBOL, MAX_DIGIT, PLACEHOLDER_SYMBOL};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const GRAMMAR: &str = r#"type Digit = "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" | "10" | "11" | "12" | "13";
type Operator = "+" | "-" | "*" | "/";
type Result = {
    "thought": [Digit, Operator, Digit, "=", "@"],
    "left": ["@", Digit, Digit],
    "unused": [Digit, Digit],
};
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SchemaFormat {
    #[default]
    Json,
    Grammar,
}

/// TypeScript-style declaration of the shape.
pub fn grammar() -> &'static str {
    GRAMMAR
}

fn tuple(items: Vec<Value>) -> Value {
    let len = items.len();
    json!({
        "type": "array",
        "prefixItems": items,
        "items": false,
        "minItems": len,
        "maxItems": len,
    })
}

/// JSON Schema (draft 2020-12) for a `ThoughtResult` record.
pub fn json_schema() -> Value {
    let digit_strings: Vec<String> = Digit::all().map(|d| d.to_string()).collect();
    let operators: Vec<&str> = Operator::ALL.iter().map(|op| op.symbol()).collect();
    let digit = json!({ "$ref": "#/$defs/digit" });
    let operator = json!({ "$ref": "#/$defs/operator" });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "ThoughtResult",
        "type": "object",
        "required": ["thought", "left", "unused"],
        "properties": {
            "thought": tuple(vec![
                digit.clone(),
                operator,
                digit.clone(),
                json!({ "const": EQUALS_SYMBOL }),
                json!({ "const": PLACEHOLDER_SYMBOL }),
            ]),
            "left": tuple(vec![
                json!({ "const": PLACEHOLDER_SYMBOL }),
                digit.clone(),
                digit.clone(),
            ]),
            "unused": tuple(vec![digit.clone(), digit]),
        },
        "$defs": {
            "digit": {
                "description": "0 to 13 as a JSON integer literal or its canonical string; \
                    numbers written with a fraction (3.0) are rejected by the validator",
                "oneOf": [
                    { "type": "integer", "minimum": 0, "maximum": MAX_DIGIT },
                    { "type": "string", "enum": digit_strings },
                ]
            },
            "operator": { "type": "string", "enum": operators },
        },
    })
}

pub fn render(format: SchemaFormat) -> Result<String> {
    match format {
        SchemaFormat::Json => Ok(serde_json::to_string_pretty(&json_schema())?),
        SchemaFormat::Grammar => Ok(grammar().to_string()),
    }
}
