//! # Geometry Validator
//!
//! Type-dispatched validation of the seven RFC 7946 geometry kinds.
//!
//! ## Coordinate Nesting
//!
//! | kind | `coordinates` |
//! |---|---|
//! | Point | position |
//! | MultiPoint, LineString | array of positions |
//! | MultiLineString, Polygon | array of arrays of positions |
//! | MultiPolygon | array of Polygon coordinate arrays |
//! | GeometryCollection | no coordinates; `geometries` array of geometry objects |
//!
//! ## Depth Invariant
//!
//! GeometryCollections nest without bound in the grammar. Every recursive
//! call carries an explicit collection depth; a collection deeper than
//! `ValidationProfile::max_depth` is reported as `TooDeeplyNested` and not
//! descended, so adversarial nesting is rejected deterministically instead
//! of by stack exhaustion.
//!
//! ## Partial Failure
//!
//! A bad member deep inside a collection never stops validation of its
//! siblings. The typed geometry is returned only when its subtree recorded
//! no error.

use geoval_core::{
    foreign_members, Diagnostic, DiagnosticKind, Diagnostics, Dimensions, GeoJsonType, Geometry,
    GeometryKind, GeometryValue, JsonPath, Position, ValidationProfile,
};
use serde_json::{Map, Value};

use crate::bbox::check_bbox;
use crate::position::{check_position, check_positions, type_name, validate_position};
use crate::ring::{check_ring, RingRole};

/// Fewest positions a LineString may have (RFC 7946 §3.1.4).
pub const MIN_LINE_STRING_LEN: usize = 2;

/// Validate a geometry object at `path` with the default profile.
///
/// Returns the typed geometry (or `None` on error, or for an empty
/// `coordinates` array, which denotes a null geometry) together with every
/// finding in the subtree.
pub fn validate_geometry(
    value: &Value,
    path: &JsonPath,
) -> (Option<Geometry>, Vec<Diagnostic>) {
    validate_geometry_with(value, path, &ValidationProfile::default())
}

/// Validate a geometry object at `path` with an explicit profile.
pub fn validate_geometry_with(
    value: &Value,
    path: &JsonPath,
    profile: &ValidationProfile,
) -> (Option<Geometry>, Vec<Diagnostic>) {
    let mut diags = profile.diagnostics();
    let geometry = check_geometry(value, path, 0, profile, &mut diags);
    (geometry, diags.into_vec())
}

/// Read the `type` member of a nested geometry object.
fn geometry_kind(
    object: &Map<String, Value>,
    path: &JsonPath,
    diags: &mut Diagnostics,
) -> Option<GeometryKind> {
    let Some(type_value) = object.get("type") else {
        diags.report(path, DiagnosticKind::MissingType, "geometry has no \"type\" member");
        return None;
    };
    let type_path = path.member("type");
    let Some(name) = type_value.as_str() else {
        diags.report(
            &type_path,
            DiagnosticKind::InvalidType,
            format!("\"type\" must be a string, found {}", type_name(type_value)),
        );
        return None;
    };
    match name.parse::<GeoJsonType>() {
        Ok(GeoJsonType::Geometry(kind)) => Some(kind),
        Ok(other) => {
            diags.report(
                &type_path,
                DiagnosticKind::InvalidType,
                format!("expected a geometry, found a {other}"),
            );
            None
        }
        Err(_) => {
            diags.report(
                &type_path,
                DiagnosticKind::InvalidType,
                format!("{name:?} is not a geometry type"),
            );
            None
        }
    }
}

/// Validate a geometry object.
///
/// `depth` is the number of GeometryCollections enclosing `value`.
pub(crate) fn check_geometry(
    value: &Value,
    path: &JsonPath,
    depth: usize,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<Geometry> {
    let Some(object) = value.as_object() else {
        diags.report(
            path,
            DiagnosticKind::NotAnObject,
            format!("geometry must be an object, found {}", type_name(value)),
        );
        return None;
    };
    let kind = geometry_kind(object, path, diags)?;
    check_geometry_object(object, kind, path, depth, profile, diags)
}

/// Validate a geometry object whose `type` has already been read.
pub(crate) fn check_geometry_object(
    object: &Map<String, Value>,
    kind: GeometryKind,
    path: &JsonPath,
    depth: usize,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<Geometry> {
    let mark = diags.mark();
    let levels = profile.max_depth.saturating_sub(depth);

    let (value, known_member) = match kind {
        GeometryKind::GeometryCollection => {
            let depth = depth + 1;
            if depth > profile.max_depth {
                tracing::warn!(
                    %path,
                    depth,
                    max_depth = profile.max_depth,
                    "geometry collection nesting limit reached"
                );
                diags.report(
                    path,
                    DiagnosticKind::TooDeeplyNested,
                    format!(
                        "geometry collection nested {depth} deep exceeds the limit of {}",
                        profile.max_depth
                    ),
                );
                return None;
            }
            (check_collection_members(object, path, depth, profile, diags), "geometries")
        }
        _ => (check_coordinates(object, kind, path, profile, diags), "coordinates"),
    };

    // A rejected subtree is missing from `value`; size the bbox from the raw input.
    let dims = if diags.has_errors_since(mark) {
        object_dimensions(object, kind, levels)
    } else {
        value.as_ref().and_then(GeometryValue::dimensions)
    };
    let bbox = check_bbox(object, path, dims, diags);

    if diags.has_errors_since(mark) {
        return None;
    }
    value.map(|value| Geometry {
        value,
        bbox,
        foreign_members: foreign_members(object, &[known_member]),
    })
}

/// Validate the `geometries` member of a GeometryCollection.
///
/// Members that are null geometries (empty `coordinates`) are left out of
/// the typed collection, so its indices follow the input only when no
/// member is null.
fn check_collection_members(
    object: &Map<String, Value>,
    path: &JsonPath,
    depth: usize,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<GeometryValue> {
    let Some(members) = object.get("geometries") else {
        diags.report(
            path,
            DiagnosticKind::MissingMember,
            "geometry collection has no \"geometries\" member",
        );
        return None;
    };
    let members_path = path.member("geometries");
    let Some(items) = members.as_array() else {
        diags.report(
            &members_path,
            DiagnosticKind::NotAnArray,
            format!("\"geometries\" must be an array, found {}", type_name(members)),
        );
        return None;
    };

    let geometries = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| check_geometry(item, &members_path.index(i), depth, profile, diags))
        .collect();
    Some(GeometryValue::GeometryCollection(geometries))
}

fn check_coordinates(
    object: &Map<String, Value>,
    kind: GeometryKind,
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<GeometryValue> {
    let Some(coordinates) = object.get("coordinates") else {
        diags.report(
            path,
            DiagnosticKind::MissingCoordinates,
            format!("{kind} has no \"coordinates\" member"),
        );
        return None;
    };
    let coords_path = path.member("coordinates");
    let Some(items) = coordinates.as_array() else {
        diags.report(
            &coords_path,
            DiagnosticKind::NotAnArray,
            format!("\"coordinates\" must be an array, found {}", type_name(coordinates)),
        );
        return None;
    };
    if items.is_empty() {
        diags.report(
            &coords_path,
            DiagnosticKind::EmptyCoordinates,
            format!("empty coordinates; {kind} treated as a null geometry"),
        );
        return None;
    }

    match kind {
        GeometryKind::Point => {
            check_position(coordinates, &coords_path, profile, diags).map(GeometryValue::Point)
        }
        GeometryKind::MultiPoint => {
            check_positions(items, &coords_path, profile, diags).map(GeometryValue::MultiPoint)
        }
        GeometryKind::LineString => {
            check_line_string(items, &coords_path, profile, diags).map(GeometryValue::LineString)
        }
        GeometryKind::MultiLineString => each_array(items, &coords_path, diags, |_, line, p, d| {
            check_line_string(line, p, profile, d)
        })
        .map(GeometryValue::MultiLineString),
        GeometryKind::Polygon => {
            check_polygon(items, &coords_path, profile, diags).map(GeometryValue::Polygon)
        }
        GeometryKind::MultiPolygon => each_array(items, &coords_path, diags, |_, poly, p, d| {
            check_polygon(poly, p, profile, d)
        })
        .map(GeometryValue::MultiPolygon),
        // Handled by `check_collection_members`.
        GeometryKind::GeometryCollection => None,
    }
}

/// Apply `check` to every element of `items`, each of which must be an array.
///
/// `check` receives the element's index in `items`. Returns `None` if any
/// element failed; every element is still visited.
fn each_array<T>(
    items: &[Value],
    path: &JsonPath,
    diags: &mut Diagnostics,
    mut check: impl FnMut(usize, &[Value], &JsonPath, &mut Diagnostics) -> Option<T>,
) -> Option<Vec<T>> {
    let mut out = Vec::with_capacity(items.len());
    let mut complete = true;
    for (i, item) in items.iter().enumerate() {
        let item_path = path.index(i);
        let Some(inner) = item.as_array() else {
            diags.report(
                &item_path,
                DiagnosticKind::NotAnArray,
                format!("expected an array, found {}", type_name(item)),
            );
            complete = false;
            continue;
        };
        match check(i, inner, &item_path, diags) {
            Some(v) => out.push(v),
            None => complete = false,
        }
    }
    complete.then_some(out)
}

fn check_line_string(
    items: &[Value],
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<Vec<Position>> {
    if items.len() < MIN_LINE_STRING_LEN {
        diags.report(
            path,
            DiagnosticKind::TooFewPositions,
            format!(
                "line string must have at least {MIN_LINE_STRING_LEN} positions, found {}",
                items.len()
            ),
        );
    }
    check_positions(items, path, profile, diags)
}

fn check_polygon(
    items: &[Value],
    path: &JsonPath,
    profile: &ValidationProfile,
    diags: &mut Diagnostics,
) -> Option<Vec<Vec<Position>>> {
    each_array(items, path, diags, |i, ring, ring_path, d| {
        let positions = check_positions(ring, ring_path, profile, d)?;
        check_ring(&positions, RingRole::at(i), ring_path, d);
        Some(positions)
    })
}

/// Array levels between `coordinates` and a single position.
fn coordinate_nesting(kind: GeometryKind) -> usize {
    match kind {
        GeometryKind::Point | GeometryKind::GeometryCollection => 0,
        GeometryKind::MultiPoint | GeometryKind::LineString => 1,
        GeometryKind::MultiLineString | GeometryKind::Polygon => 2,
        GeometryKind::MultiPolygon => 3,
    }
}

/// Highest dimensionality among the well-formed positions of an unchecked
/// geometry, whether or not the rest of the geometry is valid.
///
/// Used to size a `bbox` when the typed geometry was rejected. `levels` is
/// the number of GeometryCollections that may still be entered.
pub(crate) fn raw_dimensions(value: &Value, levels: usize) -> Option<Dimensions> {
    let object = value.as_object()?;
    let kind = object.get("type")?.as_str()?.parse::<GeometryKind>().ok()?;
    object_dimensions(object, kind, levels)
}

fn object_dimensions(
    object: &Map<String, Value>,
    kind: GeometryKind,
    levels: usize,
) -> Option<Dimensions> {
    match kind {
        GeometryKind::GeometryCollection => {
            let levels = levels.checked_sub(1)?;
            object
                .get("geometries")?
                .as_array()?
                .iter()
                .filter_map(|member| raw_dimensions(member, levels))
                .max()
        }
        _ => position_dimensions(object.get("coordinates")?, coordinate_nesting(kind)),
    }
}

fn position_dimensions(value: &Value, nesting: usize) -> Option<Dimensions> {
    if nesting == 0 {
        return validate_position(value).ok().map(|p| p.dimensions());
    }
    value
        .as_array()?
        .iter()
        .filter_map(|v| position_dimensions(v, nesting - 1))
        .max()
}
