//! # Bounding Box Model
//!
//! A `bbox` member is an array of `2n` numbers: the n lower bounds followed
//! by the n upper bounds, n being the dimensionality of the object's
//! positions (RFC 7946 §5).
//!
//! ## Antimeridian
//!
//! The first axis is exempt from the min ≤ max rule: RFC 7946 §5.2 encodes
//! a box crossing the antimeridian as `west > east`, e.g.
//! `[170, -10, -170, 10]`. Every other axis must satisfy min ≤ max.

use geoval_core::{BBox, Diagnostic, DiagnosticKind, Diagnostics, Dimensions, JsonPath};
use serde_json::{Map, Value};

use crate::position::{finite_number, type_name};

/// Validate a `bbox` value against a known dimensionality.
///
/// Pure: diagnostics are relative to `value`.
///
/// # Errors
///
/// - `NotAnArray` if `value` is not an array.
/// - `DimensionMismatch` if it is a well-formed box of the other dimensionality.
/// - `WrongArity` for any other length ≠ `2 × expected`.
/// - `NonNumericElement` if an element is not a finite number.
/// - `InvertedRange` if min > max on any axis but the first.
pub fn validate_bbox(value: &Value, expected: Dimensions) -> Result<BBox, Diagnostic> {
    let items = bbox_items(value)?;
    let expected_len = 2 * expected.count();
    if items.len() != expected_len {
        return Err(match Dimensions::from_bbox_len(items.len()) {
            Some(found) => Diagnostic::relative(
                DiagnosticKind::DimensionMismatch,
                format!("bbox is {found} but the coordinates are {expected}"),
            ),
            None => Diagnostic::relative(
                DiagnosticKind::WrongArity,
                format!(
                    "bbox for {expected} coordinates must have {expected_len} elements, found {}",
                    items.len()
                ),
            ),
        });
    }
    build(items, expected)
}

/// Validate a `bbox` whose dimensionality cannot be inferred from positions.
///
/// Used for objects without any positions (null geometry, empty collection):
/// either a 2D or a 3D box is accepted.
///
/// # Errors
///
/// As [`validate_bbox`], with `WrongArity` for any length other than 4 or 6.
pub fn validate_bbox_unconstrained(value: &Value) -> Result<BBox, Diagnostic> {
    let items = bbox_items(value)?;
    let dims = Dimensions::from_bbox_len(items.len()).ok_or_else(|| {
        Diagnostic::relative(
            DiagnosticKind::WrongArity,
            format!("bbox must have 4 or 6 elements, found {}", items.len()),
        )
    })?;
    build(items, dims)
}

fn bbox_items(value: &Value) -> Result<&Vec<Value>, Diagnostic> {
    value.as_array().ok_or_else(|| {
        Diagnostic::relative(
            DiagnosticKind::NotAnArray,
            format!("bbox must be an array, found {}", type_name(value)),
        )
    })
}

fn build(items: &[Value], dims: Dimensions) -> Result<BBox, Diagnostic> {
    let mut numbers = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let n = finite_number(item).ok_or_else(|| {
            Diagnostic::relative(
                DiagnosticKind::NonNumericElement,
                format!("bbox element {i} must be a finite number, found {}", type_name(item)),
            )
            .at(&JsonPath::root().index(i))
        })?;
        numbers.push(n);
    }

    let n = dims.count();
    let (mins, maxs) = numbers.split_at(n);
    // Axis 0 is longitude and may wrap across the antimeridian.
    for axis in 1..n {
        if mins[axis] > maxs[axis] {
            return Err(Diagnostic::relative(
                DiagnosticKind::InvertedRange,
                format!(
                    "bbox axis {axis} has min {} greater than max {}",
                    mins[axis], maxs[axis]
                ),
            ));
        }
    }

    Ok(BBox::from_corners(mins.to_vec(), maxs.to_vec()))
}

/// Validate the `bbox` member of `object`, if present.
///
/// `dims` is the dimensionality of the object's positions, or `None` when
/// it has none.
pub(crate) fn check_bbox(
    object: &Map<String, Value>,
    path: &JsonPath,
    dims: Option<Dimensions>,
    diags: &mut Diagnostics,
) -> Option<BBox> {
    let value = object.get("bbox")?;
    let result = match dims {
        Some(d) => validate_bbox(value, d),
        None => validate_bbox_unconstrained(value),
    };
    match result {
        Ok(bbox) => Some(bbox),
        Err(d) => {
            diags.push(d.at(&path.member("bbox")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_2d_and_3d() {
        let b = validate_bbox(&json!([-10, -10, 10, 10]), Dimensions::Xy).unwrap();
        assert_eq!(b.mins(), &[-10.0, -10.0]);
        assert_eq!(b.maxs(), &[10.0, 10.0]);
        let b = validate_bbox(&json!([0, 0, 0, 1, 1, 100]), Dimensions::Xyz).unwrap();
        assert_eq!(b.dimensions(), Dimensions::Xyz);
    }

    #[test]
    fn test_antimeridian_crossing_allowed() {
        let b = validate_bbox(&json!([170, -10, -170, 10]), Dimensions::Xy).unwrap();
        assert!(b.crosses_antimeridian());
    }

    #[test]
    fn test_inverted_latitude_rejected() {
        let err = validate_bbox(&json!([10, 10, -10, -10]), Dimensions::Xy).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::InvertedRange);
    }

    #[test]
    fn test_inverted_altitude_rejected() {
        let err = validate_bbox(&json!([0, 0, 50, 1, 1, 10]), Dimensions::Xyz).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::InvertedRange);
        assert!(err.message.contains("axis 2"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = validate_bbox(&json!([0, 0, 0, 1, 1, 1]), Dimensions::Xy).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::DimensionMismatch);
        let err = validate_bbox(&json!([0, 0, 1, 1]), Dimensions::Xyz).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::DimensionMismatch);
    }

    #[test]
    fn test_wrong_arity() {
        let err = validate_bbox(&json!([0, 0, 1]), Dimensions::Xy).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::WrongArity);
        let err = validate_bbox_unconstrained(&json!([0, 0, 1, 1, 2])).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::WrongArity);
    }

    #[test]
    fn test_non_numeric_and_not_array() {
        let err = validate_bbox(&json!([0, null, 1, 1]), Dimensions::Xy).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NonNumericElement);
        assert_eq!(err.path.to_string(), "[1]");
        let err = validate_bbox(&json!("0,0,1,1"), Dimensions::Xy).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::NotAnArray);
    }

    #[test]
    fn test_check_bbox_anchors_path() {
        let obj = json!({"bbox": [0, 5, 1, 1]});
        let mut diags = Diagnostics::new();
        let out = check_bbox(
            obj.as_object().unwrap(),
            &JsonPath::root().member("geometry"),
            Some(Dimensions::Xy),
            &mut diags,
        );
        assert!(out.is_none());
        let items = diags.into_vec();
        assert_eq!(items[0].path.to_string(), "geometry.bbox");
        assert_eq!(items[0].kind, DiagnosticKind::InvertedRange);
    }

    #[test]
    fn test_check_bbox_absent() {
        let obj = json!({});
        let mut diags = Diagnostics::new();
        assert!(check_bbox(obj.as_object().unwrap(), &JsonPath::root(), None, &mut diags).is_none());
        assert!(diags.is_empty());
    }
}
