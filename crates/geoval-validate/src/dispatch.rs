//! # Top-level Dispatcher
//!
//! Entry point for external callers. Reads the root `type` member and routes
//! the document to the geometry, Feature or FeatureCollection validator.
//!
//! ## Short-circuit Policy
//!
//! Only an un-interpretable root stops validation early, with exactly one
//! diagnostic:
//!
//! - root is not an object, or has no `type` → `MissingType`
//! - root `type` is not one of the nine RFC 7946 names → `UnknownType`
//!
//! Everything past that point accumulates a complete diagnostic set.

use geoval_core::{
    DiagnosticKind, Diagnostics, GeoJson, GeoJsonType, JsonPath, ValidationProfile,
    ValidationResult,
};
use serde_json::{Map, Value};

use crate::feature::{check_feature_collection_object, check_feature_object};
use crate::geometry::check_geometry_object;
use crate::position::type_name;

/// Validate a document with the RFC 7946 default profile.
pub fn validate(value: &Value) -> ValidationResult {
    validate_with(value, &ValidationProfile::default())
}

/// Validate a document with an explicit profile.
#[tracing::instrument(level = "debug", skip_all, fields(max_depth = profile.max_depth))]
pub fn validate_with(value: &Value, profile: &ValidationProfile) -> ValidationResult {
    let root = JsonPath::root();
    let mut diags = profile.diagnostics();

    let document = match root_type(value, &root, &mut diags) {
        Some((object, GeoJsonType::Geometry(kind))) => {
            check_geometry_object(object, kind, &root, 0, profile, &mut diags).map(GeoJson::Geometry)
        }
        Some((object, GeoJsonType::Feature)) => {
            check_feature_object(object, &root, profile, &mut diags).map(GeoJson::Feature)
        }
        Some((object, GeoJsonType::FeatureCollection)) => {
            check_feature_collection_object(object, &root, profile, &mut diags)
                .map(GeoJson::FeatureCollection)
        }
        None => None,
    };

    tracing::debug!(
        errors = diags.error_count(),
        warnings = diags.warning_count(),
        "validation finished"
    );
    ValidationResult::from_diagnostics(diags, document)
}

fn root_type<'a>(
    value: &'a Value,
    root: &JsonPath,
    diags: &mut Diagnostics,
) -> Option<(&'a Map<String, Value>, GeoJsonType)> {
    let Some(object) = value.as_object() else {
        diags.report(
            root,
            DiagnosticKind::MissingType,
            format!("expected a GeoJSON object, found {}", type_name(value)),
        );
        return None;
    };
    let Some(type_value) = object.get("type") else {
        diags.report(root, DiagnosticKind::MissingType, "object has no \"type\" member");
        return None;
    };
    let parsed = type_value
        .as_str()
        .map(|name| name.parse::<GeoJsonType>().map_err(|e| e.to_string()))
        .unwrap_or_else(|| {
            Err(format!(
                "\"type\" must be a string, found {}",
                type_name(type_value)
            ))
        });
    match parsed {
        Ok(t) => Some((object, t)),
        Err(message) => {
            diags.report(&root.member("type"), DiagnosticKind::UnknownType, message);
            None
        }
    }
}

/// A reusable validator bound to one profile.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    profile: ValidationProfile,
}

impl Validator {
    /// Bind a validator to `profile`.
    pub fn new(profile: ValidationProfile) -> Self {
        Self { profile }
    }

    /// A validator using [`ValidationProfile::strict`].
    pub fn strict() -> Self {
        Self::new(ValidationProfile::strict())
    }

    /// The bound profile.
    pub fn profile(&self) -> &ValidationProfile {
        &self.profile
    }

    /// Validate a document.
    pub fn validate(&self, value: &Value) -> ValidationResult {
        validate_with(value, &self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_root() {
        for v in [json!(null), json!([1, 2]), json!("Point"), json!(3)] {
            let r = validate(&v);
            assert!(!r.valid);
            assert_eq!(r.diagnostics.len(), 1);
            assert_eq!(r.diagnostics[0].kind, DiagnosticKind::MissingType);
        }
    }

    #[test]
    fn test_missing_type_short_circuits() {
        let r = validate(&json!({"coordinates": "garbage", "bbox": 5}));
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].kind, DiagnosticKind::MissingType);
        assert!(r.diagnostics[0].path.is_root());
    }

    #[test]
    fn test_unknown_type_short_circuits() {
        for t in [json!("Topology"), json!("point"), json!(1), json!(null)] {
            let r = validate(&json!({"type": t, "coordinates": "garbage"}));
            assert!(!r.valid);
            assert_eq!(r.diagnostics.len(), 1, "{t}");
            assert_eq!(r.diagnostics[0].kind, DiagnosticKind::UnknownType);
            assert_eq!(r.diagnostics[0].path.to_string(), "type");
        }
    }

    #[test]
    fn test_routes_each_root_kind() {
        let r = validate(&json!({"type": "Point", "coordinates": [0, 0]}));
        assert!(r.valid);
        assert!(matches!(r.document, Some(GeoJson::Geometry(_))));

        let r = validate(&json!({"type": "Feature", "geometry": null, "properties": null}));
        assert!(r.valid);
        assert!(matches!(r.document, Some(GeoJson::Feature(_))));

        let r = validate(&json!({"type": "FeatureCollection", "features": []}));
        assert!(r.valid);
        assert!(matches!(r.document, Some(GeoJson::FeatureCollection(_))));
    }

    #[test]
    fn test_root_bbox_validated() {
        let r = validate(&json!({
            "type": "FeatureCollection",
            "features": [],
            "bbox": [0, 10, 1, -10]
        }));
        assert!(!r.valid);
        assert_eq!(r.diagnostics[0].kind, DiagnosticKind::InvertedRange);
        assert_eq!(r.diagnostics[0].path.to_string(), "bbox");
    }

    #[test]
    fn test_strict_validator_escalates() {
        let open_ring = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]
        });
        assert!(validate(&open_ring).valid);
        let r = Validator::strict().validate(&open_ring);
        assert!(!r.valid);
        assert!(r.has_kind(DiagnosticKind::RingNotClosed));
    }
}
