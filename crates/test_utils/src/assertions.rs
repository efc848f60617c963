//! Custom Test Assertions
//!
//! Assertion helpers for summaries and summarization errors that print the
//! offending value when they fail.

use std::fmt::Debug;

use domain_claims::{ClaimSummary, ErrorKind, SummarizationError, SummaryField};

/// Asserts that every summary field is present and non-blank
///
/// # Panics
///
/// Panics naming the first blank field
pub fn assert_summary_complete(summary: &ClaimSummary) {
    for field in SummaryField::ALL {
        assert!(
            !summary.field(field).trim().is_empty(),
            "Summary field {} is blank: {:?}",
            field,
            summary
        );
    }
}

/// Asserts that a summarization failed with the expected kind
///
/// Returns the error for further inspection.
pub fn assert_error_kind<T: Debug>(
    result: Result<T, SummarizationError>,
    expected: ErrorKind,
) -> SummarizationError {
    match result {
        Ok(value) => panic!("Expected {} error, got Ok({:?})", expected, value),
        Err(error) => {
            assert_eq!(
                error.kind(),
                expected,
                "Expected {} error, got {}: {}",
                expected,
                error.kind(),
                error
            );
            error
        }
    }
}

/// Asserts that `prompt` carries `needle`, showing the prompt on failure
pub fn assert_prompt_contains(prompt: &str, needle: &str) {
    assert!(
        prompt.contains(needle),
        "Prompt does not contain {:?}:\n{}",
        needle,
        prompt
    );
}
