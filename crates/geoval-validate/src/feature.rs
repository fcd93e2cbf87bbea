//! # Feature and FeatureCollection Validator
//!
//! Validates the envelopes around geometries (RFC 7946 §3.2, §3.3) and
//! delegates the `geometry` member to the geometry validator.
//!
//! ## Feature Members
//!
//! - `geometry`: required; a geometry object or `null`.
//! - `properties`: required; an object or `null`.
//! - `id`: optional; a string or a number.
//!
//! ## Collections
//!
//! Features in a collection are independent: a bad Feature is reported
//! under `features[i]` and its siblings are still checked. When the caller
//! sets a deadline it is checked before each Feature; once passed, a single
//! `BudgetExceeded` diagnostic is recorded and the rest of the collection is
//! skipped.

use geoval_core::{
    foreign_members, Diagnostic, DiagnosticKind, Diagnostics, Dimensions, Feature,
    FeatureCollection, FeatureId, JsonPath, ValidationProfile,
};
use serde_json::{Map, Value};

use crate::bbox::check_bbox;
use crate::geometry::{check_geometry, raw_dimensions};
use crate::position::type_name;

/// Validate a Feature object at `path` with the default profile.
pub fn validate_feature(value: &Value, path: &JsonPath) -> (Option<Feature>, Vec<Diagnostic>) {
    validate_feature_with(value, path, &ValidationProfile::default())
}

/// Validate a Feature object at `path` with an explicit profile.
pub fn validate_feature_with(
    value: &Value,
    path: &JsonPath,
    profile: &ValidationProfile,
) -> (Option<Feature>, Vec<Diagnostic>) {
    let mut diags = profile.diagnostics();
    let feature = check_feature(value, path, profile, &mut diags);
    (feature, diags.into_vec())
}

/// Validate a FeatureCollection object at `path` with the default profile.
pub fn validate_feature_collection(
    value: &Value,
    path: &JsonPath,
) -> (Option<FeatureCollection>, Vec<Diagnostic>) {
    validate_feature_collection_with(value, path, &ValidationProfile::default())
}

/// Validate a FeatureCollection object at `path` with an explicit profile.
pub fn validate_feature_collection_with(
    value: &Value,
    path: &JsonPath,
    profile: &ValidationProfile,
) -> (Option<FeatureCollection>, Vec<Diagnostic>) {
    let mut diags = profile.diagnostics();
    let collection = check_feature_collection(value, path, profile, &mut diags);
    (collection, diags.into_vec())
}

/// Require `type` to equal `expected`. Member checks continue either way.
fn check_type_member(
    object: &Map<String, Value>,
    expected: &str,
    path: &JsonPath,
    diags: &mut Diagnostics,
) {
    match object.get("type") {
        None => diags.report(
            path,
            DiagnosticKind::MissingType,
            format!("{expected} has no \"type\" member"),
        ),
        Some(Value::String(name)) if name == expected => {}
        Some(Value::String(name)) => diags.report(
            &path.member("type"),
            DiagnosticKind::InvalidType,
            format!("expected type {expected:?}, found {name:?}"),
        ),
        Some(other) => diags.report(
            &path.member("type"),
            DiagnosticKind::InvalidType,
            format!("\"type\" must be a string, found {}", type_name(other)),
        ),
    }
}

pub(crate) fn check_feature(
    value: &Value,
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<Feature> {
    let Some(object) = value.as_object() else {
        diags.report(
            path,
            DiagnosticKind::NotAnObject,
            format!("feature must be an object, found {}", type_name(value)),
        );
        return None;
    };
    let mark = diags.mark();
    check_type_member(object, "Feature", path, diags);
    let checked = check_feature_object(object, path, profile, diags);
    checked.filter(|_| !diags.has_errors_since(mark))
}

/// Validate a Feature whose `type` has already been checked.
pub(crate) fn check_feature_object(
    object: &Map<String, Value>,
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<Feature> {
    let mark = diags.mark();

    let geometry = match object.get("geometry") {
        None => {
            diags.report(
                path,
                DiagnosticKind::MissingMember,
                "feature has no \"geometry\" member",
            );
            None
        }
        Some(Value::Null) => None,
        Some(g) => check_geometry(g, &path.member("geometry"), 0, profile, diags),
    };

    let properties = match object.get("properties") {
        None => {
            diags.report(
                path,
                DiagnosticKind::MissingMember,
                "feature has no \"properties\" member",
            );
            None
        }
        Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(other) => {
            diags.report(
                &path.member("properties"),
                DiagnosticKind::InvalidProperties,
                format!("\"properties\" must be an object or null, found {}", type_name(other)),
            );
            None
        }
    };

    let id = match object.get("id") {
        None => None,
        Some(Value::String(s)) => Some(FeatureId::String(s.clone())),
        Some(Value::Number(n)) => Some(FeatureId::Number(n.clone())),
        Some(other) => {
            diags.report(
                &path.member("id"),
                DiagnosticKind::InvalidId,
                format!("\"id\" must be a string or number, found {}", type_name(other)),
            );
            None
        }
    };

    let dims = match &geometry {
        Some(g) => g.value.dimensions(),
        None => geometry_dimensions(object, profile),
    };
    let bbox = check_bbox(object, path, dims, diags);

    if diags.has_errors_since(mark) {
        return None;
    }
    Some(Feature {
        geometry,
        properties,
        id,
        bbox,
        foreign_members: foreign_members(object, &["geometry", "properties", "id"]),
    })
}

pub(crate) fn check_feature_collection(
    value: &Value,
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<FeatureCollection> {
    let Some(object) = value.as_object() else {
        diags.report(
            path,
            DiagnosticKind::NotAnObject,
            format!("feature collection must be an object, found {}", type_name(value)),
        );
        return None;
    };
    let mark = diags.mark();
    check_type_member(object, "FeatureCollection", path, diags);
    let checked = check_feature_collection_object(object, path, profile, diags);
    checked.filter(|_| !diags.has_errors_since(mark))
}

/// Validate a FeatureCollection whose `type` has already been checked.
pub(crate) fn check_feature_collection_object(
    object: &Map<String, Value>,
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<FeatureCollection> {
    let mark = diags.mark();

    let features = match object.get("features") {
        None => {
            diags.report(
                path,
                DiagnosticKind::MissingMember,
                "feature collection has no \"features\" member",
            );
            Vec::new()
        }
        Some(Value::Array(items)) => check_features(items, &path.member("features"), profile, diags),
        Some(other) => {
            diags.report(
                &path.member("features"),
                DiagnosticKind::NotAnArray,
                format!("\"features\" must be an array, found {}", type_name(other)),
            );
            Vec::new()
        }
    };

    let dims = match object.get("features").and_then(Value::as_array) {
        // Rejected Features are missing from `features`; read their raw geometry.
        Some(items) if features.len() < items.len() => items
            .iter()
            .filter_map(|item| item.as_object())
            .filter_map(|item| geometry_dimensions(item, profile))
            .max(),
        _ => features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(|g| g.value.dimensions())
            .max(),
    };
    let bbox = check_bbox(object, path, dims, diags);

    if diags.has_errors_since(mark) {
        return None;
    }
    Some(FeatureCollection {
        features,
        bbox,
        foreign_members: foreign_members(object, &["features"]),
    })
}

fn geometry_dimensions(
    feature: &Map<String, Value>,
    profile: &ValidationProfile,
) -> Option<Dimensions> {
    raw_dimensions(feature.get("geometry")?, profile.max_depth)
}

/// Result of checking one collection member; `None` once the deadline passed.
type Outcome = Option<(Option<Feature>, Diagnostics)>;

fn check_member(item: &Value, path: &JsonPath, profile: &ValidationProfile) -> Outcome {
    if profile.deadline_passed() {
        return None;
    }
    let mut local = profile.diagnostics();
    let feature = check_feature(item, path, profile, &mut local);
    Some((feature, local))
}

fn check_features(
    items: &[Value],
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Vec<Feature> {
    let outcomes = collect_outcomes(items, path, profile);

    let mut features = Vec::with_capacity(items.len());
    for (i, outcome) in outcomes.into_iter().enumerate() {
        let Some((feature, local)) = outcome else {
            tracing::warn!(
                %path,
                index = i,
                total = items.len(),
                "deadline passed; stopping feature validation"
            );
            diags.report(
                &path.index(i),
                DiagnosticKind::BudgetExceeded,
                format!(
                    "deadline passed after {i} of {} features; remaining features not validated",
                    items.len()
                ),
            );
            break;
        };
        diags.append(local);
        features.extend(feature);
    }
    features
}

#[cfg(not(feature = "parallel"))]
fn collect_outcomes(items: &[Value], path: &JsonPath, profile: &ValidationProfile) -> Vec<Outcome> {
    sequential_outcomes(items, path, profile)
}

#[cfg(feature = "parallel")]
fn collect_outcomes(items: &[Value], path: &JsonPath, profile: &ValidationProfile) -> Vec<Outcome> {
    use rayon::prelude::*;

    if items.len() < profile.parallel_threshold {
        return sequential_outcomes(items, path, profile);
    }
    tracing::debug!(%path, features = items.len(), "validating features in parallel");
    // `collect` on an indexed parallel iterator preserves input order.
    items
        .par_iter()
        .enumerate()
        .map(|(i, item)| check_member(item, &path.index(i), profile))
        .collect()
}

fn sequential_outcomes(items: &[Value], path: &JsonPath, profile: &ValidationProfile) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let outcome = check_member(item, &path.index(i), profile);
        let stop = outcome.is_none();
        outcomes.push(outcome);
        if stop {
            break;
        }
    }
    outcomes
}
