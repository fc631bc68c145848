use daybrief_common::{BriefError, Report};

/// Which report contract a flow expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Every validated report is persisted.
    SingleReport,
    /// The model may answer `{"found": false}`: a legitimate "nothing
    /// worth reporting today", not a validation failure.
    FilteredDiscovery,
}

/// Outcome of validating raw model output.
#[derive(Debug, Clone)]
pub enum Verdict {
    Report(Report),
    NothingFound,
}

/// Strict-parse raw model output against the report contract.
///
/// Any failure here is a contract breach by the model, not provider
/// flakiness; callers must not route it back through retry/failover.
pub fn validate(raw: &str, mode: ReportMode) -> Result<Verdict, BriefError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| BriefError::SchemaViolation(format!("response is not valid JSON: {e}")))?;

    if mode == ReportMode::FilteredDiscovery
        && value.get("found").and_then(|v| v.as_bool()) == Some(false)
    {
        return Ok(Verdict::NothingFound);
    }

    let report: Report = serde_json::from_value(value)
        .map_err(|e| BriefError::SchemaViolation(format!("missing or mistyped field: {e}")))?;
    Ok(Verdict::Report(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_report_json;

    #[test]
    fn well_formed_report_validates_in_both_modes() {
        let raw = sample_report_json();
        for mode in [ReportMode::SingleReport, ReportMode::FilteredDiscovery] {
            match validate(&raw, mode).unwrap() {
                Verdict::Report(report) => {
                    assert_eq!(report.headline, "Rates held steady");
                    assert!(report.found.is_none());
                }
                Verdict::NothingFound => panic!("should be a report"),
            }
        }
    }

    #[test]
    fn found_false_is_a_clean_terminal_state_in_discovery_mode() {
        let verdict = validate(r#"{"found": false}"#, ReportMode::FilteredDiscovery).unwrap();
        assert!(matches!(verdict, Verdict::NothingFound));
    }

    #[test]
    fn found_false_alone_is_a_violation_in_single_report_mode() {
        let err = validate(r#"{"found": false}"#, ReportMode::SingleReport).unwrap_err();
        assert!(matches!(err, BriefError::SchemaViolation(_)));
    }

    #[test]
    fn non_json_is_a_schema_violation() {
        let err = validate("Sure! Here is your report:", ReportMode::SingleReport).unwrap_err();
        assert!(matches!(err, BriefError::SchemaViolation(_)));
    }

    #[test]
    fn missing_required_block_is_a_schema_violation() {
        let raw = r#"{"headline": "no video block", "app_opportunity": {"insight": "x", "action": "y"}}"#;
        let err = validate(raw, ReportMode::SingleReport).unwrap_err();
        assert!(matches!(err, BriefError::SchemaViolation(_)));
    }

    #[test]
    fn found_true_report_keeps_the_flag_for_the_deciding_stage() {
        let raw = sample_report_json().replacen('{', r#"{"found": true,"#, 1);
        match validate(&raw, ReportMode::FilteredDiscovery).unwrap() {
            Verdict::Report(report) => assert_eq!(report.found, Some(true)),
            Verdict::NothingFound => panic!("found:true must validate as a report"),
        }
    }
}
