//! Strict decoding of adjudicator output.
//!
//! The response must be exactly one JSON object (optionally inside a single
//! ```json fence) with `verdict`, `confidence` and `reasoning` and nothing else.
//! Anything looser is rejected rather than guessed at.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::verdict::VerdictLabel;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("adjudicator returned an empty response")]
    Empty,

    #[error("adjudicator response is not a single JSON object: {0}")]
    Malformed(String),

    #[error("verdict label {0:?} is not one of True, False, Unverifiable")]
    InvalidLabel(String),

    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("adjudicator reasoning is empty")]
    EmptyReasoning,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVerdict {
    verdict: String,
    confidence: f64,
    reasoning: String,
}

/// A validated adjudicator answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjudicatedVerdict {
    pub label: VerdictLabel,
    pub confidence: f64,
    pub reasoning: String,
}

/// Decode a raw adjudicator response.
pub fn decode_verdict(response: &str) -> Result<AdjudicatedVerdict, DecodeError> {
    let body = strip_fence(response.trim())?;
    if body.is_empty() {
        return Err(DecodeError::Empty);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(DecodeError::Malformed(format!(
            "expected an object, found {}",
            json_kind(&value)
        )));
    }
    let raw: RawVerdict =
        serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let label = match raw.verdict.as_str() {
        "True" => VerdictLabel::True,
        "False" => VerdictLabel::False,
        "Unverifiable" => VerdictLabel::Unverifiable,
        _ => return Err(DecodeError::InvalidLabel(raw.verdict)),
    };
    if !raw.confidence.is_finite() || !(0.0..=1.0).contains(&raw.confidence) {
        return Err(DecodeError::ConfidenceOutOfRange(raw.confidence));
    }
    if raw.reasoning.trim().is_empty() {
        return Err(DecodeError::EmptyReasoning);
    }

    Ok(AdjudicatedVerdict {
        label,
        confidence: raw.confidence,
        reasoning: raw.reasoning,
    })
}

/// Remove one surrounding ``` / ```json fence, if present.
fn strip_fence(text: &str) -> Result<&str, DecodeError> {
    let Some(rest) = text.strip_prefix("```") else {
        return Ok(text);
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let Some(inner) = rest.strip_suffix("```") else {
        return Err(DecodeError::Malformed("unterminated code fence".into()));
    };
    if inner.contains("```") {
        return Err(DecodeError::Malformed("more than one code fence".into()));
    }
    Ok(inner.trim())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_object() {
        let verdict = decode_verdict(
            r#"{"verdict": "False", "confidence": 0.9, "reasoning": "The tower is in Paris."}"#,
        )
        .unwrap();
        assert_eq!(verdict.label, VerdictLabel::False);
        assert_eq!(verdict.confidence, 0.9);
        assert_eq!(verdict.reasoning, "The tower is in Paris.");
    }

    #[test]
    fn decodes_fenced_object() {
        let response = "```json\n{\"verdict\": \"True\", \"confidence\": 0.8, \"reasoning\": \"Supported.\"}\n```";
        assert_eq!(decode_verdict(response).unwrap().label, VerdictLabel::True);
        let response = "```\n{\"verdict\": \"Unverifiable\", \"confidence\": 0.0, \"reasoning\": \"Unrelated.\"}\n```";
        assert_eq!(
            decode_verdict(response).unwrap().label,
            VerdictLabel::Unverifiable
        );
    }

    #[test]
    fn rejects_prose_and_trailing_text() {
        assert!(matches!(
            decode_verdict("Sure! Here is the verdict: True"),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_verdict(r#"{"verdict": "True", "confidence": 0.7, "reasoning": "ok"} thanks"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_verdict(r#"["True", 0.7, "ok"]"#),
            Err(DecodeError::Malformed(_))
        ));
        assert_eq!(decode_verdict("   "), Err(DecodeError::Empty));
    }

    #[test]
    fn rejects_unknown_and_missing_fields() {
        assert!(matches!(
            decode_verdict(r#"{"verdict": "True", "confidence": 0.7, "reasoning": "ok", "source": "x"}"#),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            decode_verdict(r#"{"verdict": "True", "confidence": 0.7}"#),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_bad_label_confidence_and_reasoning() {
        assert_eq!(
            decode_verdict(r#"{"verdict": "Error", "confidence": 0.0, "reasoning": "x"}"#),
            Err(DecodeError::InvalidLabel("Error".into()))
        );
        assert_eq!(
            decode_verdict(r#"{"verdict": "true", "confidence": 0.9, "reasoning": "x"}"#),
            Err(DecodeError::InvalidLabel("true".into()))
        );
        assert_eq!(
            decode_verdict(r#"{"verdict": "True", "confidence": 1.5, "reasoning": "x"}"#),
            Err(DecodeError::ConfidenceOutOfRange(1.5))
        );
        assert_eq!(
            decode_verdict(r#"{"verdict": "True", "confidence": 0.9, "reasoning": "  "}"#),
            Err(DecodeError::EmptyReasoning)
        );
    }
}
