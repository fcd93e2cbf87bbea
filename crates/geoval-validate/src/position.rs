//! # Position Model
//!
//! A position is an array of two or three finite numbers: longitude,
//! latitude and an optional altitude (RFC 7946 §3.1.1).
//!
//! ## Excess Elements
//!
//! RFC 7946 permits, but discourages, positions with more than three
//! elements. [`validate_position`] accepts them and uses the first three;
//! the geometry walker reports the excess as an `ExcessPositionElements`
//! warning so a strict profile can reject it.

use geoval_core::{Diagnostic, DiagnosticKind, Diagnostics, JsonPath, Position, ValidationProfile};
use serde_json::Value;

/// Fewest elements a position may have.
pub const MIN_POSITION_LEN: usize = 2;

/// Most elements a position is interpreted with.
pub const MAX_POSITION_LEN: usize = 3;

/// Longitude bounds used by strict range checks.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Latitude bounds used by strict range checks.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Read a finite number out of a JSON value.
pub(crate) fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

/// Validate a single coordinate tuple.
///
/// Pure: the returned diagnostic, if any, is relative to `value` and must be
/// re-anchored by the caller with [`Diagnostic::at`].
///
/// # Errors
///
/// - `NotAnArray` if `value` is not an array.
/// - `WrongArity` if it has fewer than two elements.
/// - `NonNumericElement` if any of the first three elements is not a finite number.
pub fn validate_position(value: &Value) -> Result<Position, Diagnostic> {
    let items = value.as_array().ok_or_else(|| {
        Diagnostic::relative(
            DiagnosticKind::NotAnArray,
            format!("position must be an array, found {}", type_name(value)),
        )
    })?;

    if items.len() < MIN_POSITION_LEN {
        return Err(Diagnostic::relative(
            DiagnosticKind::WrongArity,
            format!(
                "position must have {MIN_POSITION_LEN} or {MAX_POSITION_LEN} elements, found {}",
                items.len()
            ),
        ));
    }

    let mut coords = [0.0_f64; MAX_POSITION_LEN];
    let used = items.len().min(MAX_POSITION_LEN);
    for (i, item) in items.iter().take(used).enumerate() {
        coords[i] = finite_number(item).ok_or_else(|| {
            Diagnostic::relative(
                DiagnosticKind::NonNumericElement,
                format!(
                    "position element {i} must be a finite number, found {}",
                    type_name(item)
                ),
            )
            .at(&JsonPath::root().index(i))
        })?;
    }

    Ok(if used == MAX_POSITION_LEN {
        Position::xyz(coords[0], coords[1], coords[2])
    } else {
        Position::xy(coords[0], coords[1])
    })
}

/// Validate a position in document context, recording findings at `path`.
///
/// On top of [`validate_position`] this reports excess elements and, when
/// the profile asks for it, WGS84 range violations.
pub(crate) fn check_position(
    value: &Value,
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<Position> {
    let position = match validate_position(value) {
        Ok(p) => p,
        Err(d) => {
            diags.push(d.at(path));
            return None;
        }
    };

    let len = value.as_array().map_or(0, Vec::len);
    if len > MAX_POSITION_LEN {
        diags.report(
            path,
            DiagnosticKind::ExcessPositionElements,
            format!("position has {len} elements; elements after the third are ignored"),
        );
    }

    if profile.check_coordinate_ranges {
        check_axis(position.x, "longitude", LONGITUDE_RANGE, &path.index(0), diags);
        check_axis(position.y, "latitude", LATITUDE_RANGE, &path.index(1), diags);
    }

    Some(position)
}

fn check_axis(
    value: f64,
    axis: &str,
    (min, max): (f64, f64),
    path: &JsonPath,
    diags: &mut Diagnostics,
) {
    if !(min..=max).contains(&value) {
        diags.report(
            path,
            DiagnosticKind::OutOfRange,
            format!("{axis} {value} outside [{min}, {max}]"),
        );
    }
}

/// Validate every element of `items` as a position.
///
/// Returns `None` if any element failed; all failures are reported.
pub(crate) fn check_positions(
    items: &[Value],
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<Vec<Position>> {
    let mut positions = Vec::with_capacity(items.len());
    let mut complete = true;
    for (i, item) in items.iter().enumerate() {
        match check_position(item, &path.index(i), profile, diags) {
            Some(p) => positions.push(p),
            None => complete = false,
        }
    }
    complete.then_some(positions)
}

/// JSON type name for messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
