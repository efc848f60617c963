//! Property tests for model output parsing

use proptest::prelude::*;

use domain_claims::{ParseError, ResponseParser, SummaryField};
use test_utils::{claim_summary_strategy, wrapper_strategy, ModelOutputBuilder, ModelOutputFixtures};

fn field_strategy() -> impl Strategy<Value = SummaryField> {
    proptest::sample::select(SummaryField::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_wrapped_summary_parses_back(
        summary in claim_summary_strategy(),
        (prefix, suffix) in wrapper_strategy(),
    ) {
        let raw = format!("{}{}{}", prefix, ModelOutputFixtures::json_for(&summary), suffix);

        let parsed = ResponseParser::new().parse(&raw).unwrap();
        prop_assert_eq!(parsed, summary);
    }

    #[test]
    fn test_missing_field_is_incomplete(
        summary in claim_summary_strategy(),
        field in field_strategy(),
    ) {
        let raw = ModelOutputBuilder::from_summary(&summary).without(field).build();

        let error = ResponseParser::new().parse(&raw).unwrap_err();
        prop_assert_eq!(error, ParseError::Incomplete { missing: vec![field] });
    }

    #[test]
    fn test_blank_field_is_incomplete(
        summary in claim_summary_strategy(),
        field in field_strategy(),
        blank in "[ \t\n]{0,4}",
    ) {
        let raw = ModelOutputBuilder::from_summary(&summary).with_value(field, blank).build();

        let error = ResponseParser::new().parse(&raw).unwrap_err();
        prop_assert_eq!(error, ParseError::Incomplete { missing: vec![field] });
    }

    #[test]
    fn test_extra_fields_are_ignored(
        summary in claim_summary_strategy(),
        key in "[a-z]{1,12}",
        value in any::<i64>(),
    ) {
        let raw = ModelOutputBuilder::from_summary(&summary).with_extra(&key, value).build();

        let parsed = ResponseParser::new().parse(&raw).unwrap();
        prop_assert_eq!(parsed, summary);
    }

    #[test]
    fn test_non_string_field_is_malformed(
        summary in claim_summary_strategy(),
        field in field_strategy(),
        value in any::<i64>(),
    ) {
        let raw = ModelOutputBuilder::from_summary(&summary).with_value(field, value).build();

        let error = ResponseParser::new().parse(&raw).unwrap_err();
        prop_assert!(matches!(error, ParseError::Malformed { .. }), "got {:?}", error);
    }

    #[test]
    fn test_prose_never_parses(text in "[A-Za-z][A-Za-z ,.!?]{0,80}") {
        let error = ResponseParser::new().parse(&text).unwrap_err();
        prop_assert!(matches!(error, ParseError::Malformed { .. }), "got {:?}", error);
    }
}

#[test]
fn test_all_fields_missing_are_listed_in_order() {
    let error = ResponseParser::new().parse("{}").unwrap_err();
    assert_eq!(
        error,
        ParseError::Incomplete {
            missing: SummaryField::ALL.to_vec()
        }
    );
}

#[test]
fn test_tagged_fence_from_builder() {
    let raw = ModelOutputBuilder::from_summary(&ModelOutputFixtures::fender_summary())
        .fenced("json")
        .build();

    let parsed = ResponseParser::new().parse(&raw).unwrap();
    assert_eq!(parsed, ModelOutputFixtures::fender_summary());
}
