//! # Validation Profiles
//!
//! A [`ValidationProfile`] is the configuration surface of the validator.
//! The default profile implements RFC 7946 as written: coordinate ranges are
//! unchecked (the RFC permits other CRSs by prior arrangement) and every
//! SHOULD-level recommendation surfaces as a Warning.
//!
//! The [`ValidationProfile::strict`] preset targets GIS interoperability:
//! WGS84 range checks are on and the discouraged-construct warnings are
//! escalated to errors.
//!
//! Profiles deserialize from YAML or JSON:
//!
//! ```yaml
//! max_depth: 16
//! check_coordinate_ranges: true
//! escalate: [RingNotClosed, WindingOrder]
//! ```

use std::collections::BTreeSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostic::{DiagnosticKind, Diagnostics, Severity};
use crate::error::ProfileError;

/// Default GeometryCollection nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default FeatureCollection size at which parallel validation kicks in.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Knobs controlling one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationProfile {
    /// Maximum GeometryCollection nesting depth. The outermost collection is depth 1.
    pub max_depth: usize,
    /// Enforce longitude ∈ [-180, 180] and latitude ∈ [-90, 90].
    pub check_coordinate_ranges: bool,
    /// Warning kinds recorded as errors.
    pub escalate: BTreeSet<DiagnosticKind>,
    /// Minimum feature count for parallel FeatureCollection validation.
    /// Only consulted when the `parallel` feature of the validator is enabled.
    pub parallel_threshold: usize,
    /// Checked between top-level Features; once passed, validation stops.
    #[serde(skip)]
    pub deadline: Option<Instant>,
}

impl Default for ValidationProfile {
    fn default() -> Self {
        Self::rfc7946()
    }
}

impl ValidationProfile {
    /// RFC 7946 as written.
    pub fn rfc7946() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            check_coordinate_ranges: false,
            escalate: BTreeSet::new(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            deadline: None,
        }
    }

    /// WGS84 ranges enforced; SHOULD-level recommendations become errors.
    pub fn strict() -> Self {
        Self {
            check_coordinate_ranges: true,
            escalate: [
                DiagnosticKind::RingNotClosed,
                DiagnosticKind::WindingOrder,
                DiagnosticKind::ExcessPositionElements,
                DiagnosticKind::EmptyCoordinates,
            ]
            .into_iter()
            .collect(),
            ..Self::rfc7946()
        }
    }

    /// Set the GeometryCollection nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable WGS84 range checks.
    pub fn with_coordinate_ranges(mut self, enabled: bool) -> Self {
        self.check_coordinate_ranges = enabled;
        self
    }

    /// Escalate one warning kind to error severity.
    pub fn escalating(mut self, kind: DiagnosticKind) -> Self {
        self.escalate.insert(kind);
        self
    }

    /// Stop validating Features once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the parallel validation threshold.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true once the deadline, if any, has passed.
    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// A fresh aggregator applying this profile's escalations.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::with_escalation(self.escalate.clone())
    }

    /// Parse a profile from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Yaml`] for malformed YAML or unknown fields and
    /// [`ProfileError::InvalidSetting`] for out-of-range values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.check()
    }

    /// Parse a profile from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Json`] for shape errors and
    /// [`ProfileError::InvalidSetting`] for out-of-range values.
    pub fn from_json_value(value: &Value) -> Result<Self, ProfileError> {
        let profile = Self::deserialize(value)?;
        profile.check()
    }

    fn check(self) -> Result<Self, ProfileError> {
        if self.max_depth == 0 {
            return Err(ProfileError::InvalidSetting {
                field: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(kind) = self
            .escalate
            .iter()
            .find(|k| k.default_severity() != Severity::Warning)
        {
            return Err(ProfileError::InvalidSetting {
                field: "escalate",
                reason: format!("{kind} is already an error"),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::JsonPath;
    use std::time::Duration;

    #[test]
    fn test_default_is_rfc7946() {
        let p = ValidationProfile::default();
        assert_eq!(p.max_depth, 64);
        assert!(!p.check_coordinate_ranges);
        assert!(p.escalate.is_empty());
        assert!(p.deadline.is_none());
    }

    #[test]
    fn test_strict_escalates_all_warning_kinds() {
        let p = ValidationProfile::strict();
        assert!(p.check_coordinate_ranges);
        for kind in DiagnosticKind::all() {
            if kind.default_severity() == Severity::Warning {
                assert!(p.escalate.contains(kind), "{kind} not escalated");
            }
        }
    }

    #[test]
    fn test_yaml_profile() {
        let p = ValidationProfile::from_yaml_str(
            "max_depth: 8\ncheck_coordinate_ranges: true\nescalate: [WindingOrder]\n",
        )
        .unwrap();
        assert_eq!(p.max_depth, 8);
        assert!(p.check_coordinate_ranges);
        assert!(p.escalate.contains(&DiagnosticKind::WindingOrder));
        assert_eq!(p.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn test_yaml_rejects_unknown_field() {
        let err = ValidationProfile::from_yaml_str("max_dpeth: 8\n").unwrap_err();
        assert!(matches!(err, ProfileError::Yaml(_)));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = ValidationProfile::from_json_value(&serde_json::json!({"max_depth": 0}))
            .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::InvalidSetting { field: "max_depth", .. }
        ));
    }

    #[test]
    fn test_escalating_an_error_kind_rejected() {
        let err = ValidationProfile::from_json_value(&serde_json::json!({
            "escalate": ["WrongArity"]
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::InvalidSetting { field: "escalate", .. }
        ));
    }

    #[test]
    fn test_deadline_passed() {
        let past = ValidationProfile::rfc7946().with_deadline(Instant::now());
        assert!(past.deadline_passed());
        let future = ValidationProfile::rfc7946()
            .with_deadline(Instant::now() + Duration::from_secs(3600));
        assert!(!future.deadline_passed());
        assert!(!ValidationProfile::rfc7946().deadline_passed());
    }

    #[test]
    fn test_profile_diagnostics_apply_escalation() {
        let p = ValidationProfile::rfc7946().escalating(DiagnosticKind::RingNotClosed);
        let mut diags = p.diagnostics();
        diags.report(&JsonPath::root(), DiagnosticKind::RingNotClosed, "open");
        assert!(!diags.is_valid());
    }
}
