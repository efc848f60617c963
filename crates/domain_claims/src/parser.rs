//! Model output parsing
//!
//! The model is told to answer with a bare JSON object, but it does not
//! always listen. The parser therefore removes one outer code fence, if
//! present, and then decodes strictly. There is no fallback that guesses
//! fields out of prose: a summary that was partly made up by the parser is
//! worse than a visible failure.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::summary::{ClaimSummary, SummaryField};

/// Why model output was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text is not a JSON object, or a field has the wrong type
    #[error("malformed output: {reason}")]
    Malformed { reason: String },

    /// The object lacks one or more required fields, or they are blank
    #[error("incomplete output: missing or empty {missing:?}")]
    Incomplete { missing: Vec<SummaryField> },
}

/// Decodes raw model text into a [`ClaimSummary`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses raw model output
    ///
    /// Fields other than the four summary fields are ignored. A field that is
    /// missing, `null`, or only whitespace is reported as incomplete; every
    /// such field is listed, not just the first.
    pub fn parse(&self, raw: &str) -> Result<ClaimSummary, ParseError> {
        let payload = strip_code_fence(raw);
        if payload.is_empty() {
            return Err(ParseError::Malformed {
                reason: "model returned no content".to_string(),
            });
        }

        let value: Value = serde_json::from_str(payload).map_err(|e| ParseError::Malformed {
            reason: format!("not valid JSON: {}", e),
        })?;

        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ParseError::Malformed {
                    reason: format!("expected a JSON object, got {}", json_type(&other)),
                })
            }
        };

        let mut missing = Vec::new();
        let mut values: [String; 4] = Default::default();
        for (slot, field) in values.iter_mut().zip(SummaryField::ALL) {
            match read_field(&object, field)? {
                Some(text) => *slot = text,
                None => missing.push(field),
            }
        }

        if !missing.is_empty() {
            return Err(ParseError::Incomplete { missing });
        }

        let [overall_summary, customer_summary, adjuster_summary, recommended_next_step] = values;
        Ok(ClaimSummary {
            overall_summary,
            customer_summary,
            adjuster_summary,
            recommended_next_step,
        })
    }
}

/// Reads one summary field; `Ok(None)` means absent or blank
fn read_field(object: &Map<String, Value>, field: SummaryField) -> Result<Option<String>, ParseError> {
    match object.get(field.key()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(ParseError::Malformed {
            reason: format!(
                "field {} must be a string, got {}",
                field.key(),
                json_type(other)
            ),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Markdown fence characters; a fence is a run of at least three of one of them
const FENCE_MARKERS: [char; 2] = ['`', '~'];
const MIN_FENCE_RUN: usize = 3;

/// Removes surrounding whitespace and one outer markdown code fence
///
/// Both backtick and tilde fences are recognised. The opening fence may carry
/// a language tag (```` ```json ````), either on its own line or directly in
/// front of the payload. A leading byte order mark counts as whitespace. Only
/// the outermost wrapper is removed; fences inside the payload are left alone.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = trim_wrapper(raw);

    for marker in FENCE_MARKERS {
        let opening = text.len() - text.trim_start_matches(marker).len();
        let closing = text.len() - text.trim_end_matches(marker).len();
        if opening < MIN_FENCE_RUN && closing < MIN_FENCE_RUN {
            continue;
        }
        if opening == text.len() {
            return "";
        }

        let mut body = text;
        if closing >= MIN_FENCE_RUN {
            body = &body[..body.len() - closing];
        }
        if opening >= MIN_FENCE_RUN {
            // The tag runs up to the line break or the first payload character
            body = body[opening..].trim_start_matches(is_tag_char);
        }
        return trim_wrapper(body);
    }

    text
}

fn trim_wrapper(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"overallSummary":"o","customerSummary":"c","adjusterSummary":"a","recommendedNextStep":"n"}"#;

    #[test]
    fn test_strip_plain_json_is_identity() {
        assert_eq!(strip_code_fence(VALID), VALID);
    }

    #[test]
    fn test_strip_json_fence() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(strip_code_fence(&fenced), VALID);
    }

    #[test]
    fn test_strip_bare_fence_with_whitespace() {
        let fenced = format!("  \n```\n{}\n```  \n", VALID);
        assert_eq!(strip_code_fence(&fenced), VALID);
    }

    #[test]
    fn test_strip_single_line_fence() {
        let fenced = format!("```json{}```", VALID);
        assert_eq!(strip_code_fence(&fenced), VALID);
    }

    #[test]
    fn test_strip_tilde_fence() {
        let fenced = format!("~~~json\n{}\n~~~", VALID);
        assert_eq!(strip_code_fence(&fenced), VALID);
    }

    #[test]
    fn test_strip_tag_on_payload_line() {
        let fenced = format!("```json {}\n```", VALID);
        assert_eq!(strip_code_fence(&fenced), VALID);
    }

    #[test]
    fn test_strip_byte_order_mark() {
        let prefixed = format!("\u{feff}{}", VALID);
        assert_eq!(strip_code_fence(&prefixed), VALID);

        let fenced = format!("\u{feff}```json\r\n{}\r\n```", VALID);
        assert_eq!(strip_code_fence(&fenced), VALID);
    }

    #[test]
    fn test_strip_only_outer_fence() {
        let nested = format!("~~~\n```json\n{}\n```\n~~~", VALID);
        assert_eq!(strip_code_fence(&nested), format!("```json\n{}\n```", VALID));
    }

    #[test]
    fn test_strip_longer_fence_run() {
        let fenced = format!("````json\n{}\n````", VALID);
        assert_eq!(strip_code_fence(&fenced), VALID);
    }

    #[test]
    fn test_parse_valid() {
        let summary = ResponseParser::new().parse(VALID).unwrap();
        assert_eq!(summary.overall_summary, "o");
        assert_eq!(summary.recommended_next_step, "n");
    }

    #[test]
    fn test_non_string_field_is_malformed() {
        let raw = r#"{"overallSummary":1,"customerSummary":"c","adjusterSummary":"a","recommendedNextStep":"n"}"#;
        let error = ResponseParser::new().parse(raw).unwrap_err();
        assert!(matches!(error, ParseError::Malformed { .. }));
    }

    #[test]
    fn test_null_field_is_incomplete() {
        let raw = r#"{"overallSummary":null,"customerSummary":"c","adjusterSummary":"a","recommendedNextStep":"n"}"#;
        let error = ResponseParser::new().parse(raw).unwrap_err();
        assert_eq!(
            error,
            ParseError::Incomplete {
                missing: vec![SummaryField::OverallSummary]
            }
        );
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(
            ResponseParser::new().parse("   "),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            ResponseParser::new().parse("```json\n```"),
            Err(ParseError::Malformed { .. })
        ));
    }
}
