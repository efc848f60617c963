//! Property-Based Test Generators
//!
//! Proptest strategies for claim ids, note text, and summaries.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::ClaimId;
use domain_claims::{ClaimNote, ClaimSummary};

/// Strategy for valid claim ids such as `C17` or `CLM-2024-000123`
pub fn claim_id_strategy() -> impl Strategy<Value = ClaimId> {
    "[A-Z]{1,4}(-[0-9]{1,6}){0,2}".prop_map(|raw| {
        ClaimId::new(raw).expect("generated claim id is valid")
    })
}

/// Strategy for non-blank single-line text
pub fn summary_text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ,.'!?-]{0,120}"
}

/// Strategy for text that contains characters JSON must escape
pub fn awkward_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        summary_text_strategy(),
        "[a-z]{1,10}\"[a-z]{1,10}",
        "[a-z]{1,10}\n[a-z]{1,10}",
        "[a-z]{1,10}\\\\[a-z]{1,10}",
        "[a-z]{1,10} ``` [a-z]{1,10}",
        Just("Ünïcødé ✓ naïve café".to_string()),
    ]
}

/// Strategy for complete claim summaries
pub fn claim_summary_strategy() -> impl Strategy<Value = ClaimSummary> {
    (
        awkward_text_strategy(),
        awkward_text_strategy(),
        awkward_text_strategy(),
        awkward_text_strategy(),
    )
        .prop_map(|(overall, customer, adjuster, next)| ClaimSummary {
            overall_summary: overall,
            customer_summary: customer,
            adjuster_summary: adjuster,
            recommended_next_step: next,
        })
}

/// Strategy for the ways a model wraps its JSON
///
/// Yields `(prefix, suffix)` pairs: none, backtick and tilde fences with or
/// without a language tag, CRLF line breaks, a byte order mark and plain
/// surrounding whitespace.
pub fn wrapper_strategy() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        Just((String::new(), String::new())),
        Just(("```\n".to_string(), "\n```".to_string())),
        Just(("```json\n".to_string(), "\n```".to_string())),
        Just(("```JSON\n".to_string(), "\n```\n".to_string())),
        Just(("  \n".to_string(), "\n\t ".to_string())),
        Just(("\n```json\n".to_string(), "\n```  ".to_string())),
        Just(("~~~json\n".to_string(), "\n~~~".to_string())),
        Just(("```json ".to_string(), "\n```".to_string())),
        Just(("```json\r\n".to_string(), "\r\n```\r\n".to_string())),
        Just(("\u{feff}".to_string(), String::new())),
    ]
}

/// Strategy for timestamps within 2024
pub fn timestamp_2024_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..365 * 24 * 60).prop_map(|minutes| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    })
}

/// Strategy for a claim's notes, possibly empty
pub fn notes_strategy(claim_id: ClaimId) -> impl Strategy<Value = Vec<ClaimNote>> {
    proptest::collection::vec(
        (summary_text_strategy(), proptest::option::of(timestamp_2024_strategy())),
        0..8,
    )
    .prop_map(move |items| {
        items
            .into_iter()
            .map(|(text, at)| {
                let note = ClaimNote::new(claim_id.clone(), text);
                match at {
                    Some(at) => note.recorded_at(at),
                    None => note,
                }
            })
            .collect()
    })
}
