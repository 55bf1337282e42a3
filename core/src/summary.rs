//! Validation results and the routing of findings into them.

use serde::Serialize;

/// Findings collected over one validation run.
///
/// Findings are grouped by severity. Routing a finding never changes
/// [`valid`](Self::valid); callers fold the boolean results of checks in with
/// [`record_outcome`](Self::record_outcome), and
/// [`flush_aggregator`](crate::flush_aggregator) clears it when strict
/// warnings were aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Overall verdict.
    pub valid: bool,
    /// Fatal findings.
    pub errors: Vec<String>,
    /// Advisory findings escalated by strict mode.
    pub strict_warnings: Vec<String>,
    /// Advisory findings.
    pub warnings: Vec<String>,
    /// Whether the run was strict.
    pub strict: bool,
}

impl ValidationSummary {
    /// Empty, valid summary.
    pub fn new(strict: bool) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            strict_warnings: Vec::new(),
            warnings: Vec::new(),
            strict,
        }
    }

    /// `true` if any fatal finding was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// `true` if anything at all was recorded.
    pub fn has_findings(&self) -> bool {
        self.has_errors() || !self.strict_warnings.is_empty() || !self.warnings.is_empty()
    }

    /// Folds a check's result into [`valid`](Self::valid). A passing result
    /// never restores validity.
    pub fn record_outcome(&mut self, ok: bool) {
        self.valid &= ok;
    }
}

impl Default for ValidationSummary {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Appends `message` to the bucket selected by `is_error` and `strict`.
///
/// Errors always go to `errors`; other findings go to `strict_warnings` in
/// strict mode and to `warnings` otherwise.
pub fn route_message(
    message: impl Into<String>,
    is_error: bool,
    strict: bool,
    summary: &mut ValidationSummary,
) {
    let message = message.into();
    if is_error {
        summary.errors.push(message);
    } else if strict {
        summary.strict_warnings.push(message);
    } else {
        summary.warnings.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_table() {
        let mut summary = ValidationSummary::new(true);
        route_message("e1", true, true, &mut summary);
        route_message("e2", true, false, &mut summary);
        route_message("sw", false, true, &mut summary);
        route_message("w", false, false, &mut summary);

        assert_eq!(summary.errors, vec!["e1", "e2"]);
        assert_eq!(summary.strict_warnings, vec!["sw"]);
        assert_eq!(summary.warnings, vec!["w"]);
        assert!(summary.valid);
    }

    #[test]
    fn test_new_summary_is_empty_and_valid() {
        let summary = ValidationSummary::new(false);
        assert!(summary.valid);
        assert!(!summary.has_findings());
        assert!(!summary.strict);
    }

    #[test]
    fn test_record_outcome_is_sticky() {
        let mut summary = ValidationSummary::default();
        summary.record_outcome(true);
        assert!(summary.valid);
        summary.record_outcome(false);
        summary.record_outcome(true);
        assert!(!summary.valid);
    }

    #[test]
    fn test_serializes_all_buckets() {
        let mut summary = ValidationSummary::new(false);
        route_message("careful", false, false, &mut summary);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["warnings"][0], "careful");
        assert_eq!(json["valid"], true);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
