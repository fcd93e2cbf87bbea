//! # GeoJSON Object Model
//!
//! Typed representation of the RFC 7946 grammar. Values of these types are
//! only ever produced by the validator from a document that passed the
//! corresponding checks, so each type carries its invariants by construction:
//!
//! - [`Position`] holds two or three finite numbers.
//! - [`BBox`] holds one (min, max) pair per dimension, with min ≤ max on
//!   every axis except longitude.
//! - [`GeometryValue`] is a closed sum over the seven geometry kinds; the
//!   coordinate nesting depth is fixed per variant.
//!
//! Members beyond those RFC 7946 names ("foreign members") are kept in an
//! explicit [`ForeignMembers`] bag so vendor extensions survive without
//! weakening the typed members.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Number, Value};

use crate::error::GeovalError;

/// Members of a GeoJSON object that the grammar does not name.
pub type ForeignMembers = Map<String, Value>;

/// Coordinate dimensionality of a position or bbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimensions {
    /// Longitude, latitude.
    Xy,
    /// Longitude, latitude, altitude.
    Xyz,
}

impl Dimensions {
    /// Number of axes.
    pub fn count(&self) -> usize {
        match self {
            Self::Xy => 2,
            Self::Xyz => 3,
        }
    }

    /// Dimensionality for a bbox array length, if the length is legal.
    pub fn from_bbox_len(len: usize) -> Option<Self> {
        match len {
            4 => Some(Self::Xy),
            6 => Some(Self::Xyz),
            _ => None,
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.count())
    }
}

/// A single coordinate tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Easting / longitude.
    pub x: f64,
    /// Northing / latitude.
    pub y: f64,
    /// Optional altitude.
    pub z: Option<f64>,
}

impl Position {
    /// A 2D position.
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// A 3D position.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Dimensionality of this position.
    pub fn dimensions(&self) -> Dimensions {
        if self.z.is_some() {
            Dimensions::Xyz
        } else {
            Dimensions::Xy
        }
    }
}

/// A validated bounding box: `mins[i] <= maxs[i]` for every axis but the first.
#[derive(Debug, Clone, PartialEq)]
pub struct BBox {
    mins: Vec<f64>,
    maxs: Vec<f64>,
}

impl BBox {
    /// Build from the southwesterly-most and northeasterly-most corners.
    ///
    /// Unchecked: the caller guarantees both have the same length (2 or 3)
    /// and the axis ordering. Documents go through `validate_bbox` instead.
    pub fn from_corners(mins: Vec<f64>, maxs: Vec<f64>) -> Self {
        Self { mins, maxs }
    }

    /// Dimensionality of the box.
    pub fn dimensions(&self) -> Dimensions {
        if self.mins.len() == 3 {
            Dimensions::Xyz
        } else {
            Dimensions::Xy
        }
    }

    /// Lower bounds, one per axis.
    pub fn mins(&self) -> &[f64] {
        &self.mins
    }

    /// Upper bounds, one per axis.
    pub fn maxs(&self) -> &[f64] {
        &self.maxs
    }

    /// True when the box spans the antimeridian (west edge east of the east edge).
    pub fn crosses_antimeridian(&self) -> bool {
        match (self.mins.first(), self.maxs.first()) {
            (Some(west), Some(east)) => west > east,
            _ => false,
        }
    }
}

/// The seven RFC 7946 geometry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// Returns all geometry kinds.
    pub fn all() -> &'static [GeometryKind] {
        &[
            Self::Point,
            Self::MultiPoint,
            Self::LineString,
            Self::MultiLineString,
            Self::Polygon,
            Self::MultiPolygon,
            Self::GeometryCollection,
        ]
    }

    /// The `type` member value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = GeovalError;

    /// Case-sensitive, as RFC 7946 type names are.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(Self::Point),
            "MultiPoint" => Ok(Self::MultiPoint),
            "LineString" => Ok(Self::LineString),
            "MultiLineString" => Ok(Self::MultiLineString),
            "Polygon" => Ok(Self::Polygon),
            "MultiPolygon" => Ok(Self::MultiPolygon),
            "GeometryCollection" => Ok(Self::GeometryCollection),
            other => Err(GeovalError::UnknownType(other.to_string())),
        }
    }
}

/// The nine values a GeoJSON `type` member may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoJsonType {
    /// One of the seven geometry kinds.
    Geometry(GeometryKind),
    Feature,
    FeatureCollection,
}

impl GeoJsonType {
    /// Returns all nine type names' variants.
    pub fn all() -> Vec<GeoJsonType> {
        GeometryKind::all()
            .iter()
            .copied()
            .map(Self::Geometry)
            .chain([Self::Feature, Self::FeatureCollection])
            .collect()
    }

    /// The `type` member value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geometry(kind) => kind.as_str(),
            Self::Feature => "Feature",
            Self::FeatureCollection => "FeatureCollection",
        }
    }
}

impl fmt::Display for GeoJsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeoJsonType {
    type Err = GeovalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Feature" => Ok(Self::Feature),
            "FeatureCollection" => Ok(Self::FeatureCollection),
            other => other.parse().map(Self::Geometry),
        }
    }
}

/// Kind-specific coordinates of a geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryValue {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    /// Linear rings; the first is the exterior, the rest are holes.
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    /// Member geometries. Null members (empty `coordinates`) are omitted.
    GeometryCollection(Vec<Geometry>),
}

impl GeometryValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::MultiPoint(_) => GeometryKind::MultiPoint,
            Self::LineString(_) => GeometryKind::LineString,
            Self::MultiLineString(_) => GeometryKind::MultiLineString,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Self::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Highest dimensionality among all positions, or `None` if there are none.
    pub fn dimensions(&self) -> Option<Dimensions> {
        fn max_of<'a>(positions: impl Iterator<Item = &'a Position>) -> Option<Dimensions> {
            positions.map(Position::dimensions).max()
        }
        match self {
            Self::Point(p) => Some(p.dimensions()),
            Self::MultiPoint(ps) | Self::LineString(ps) => max_of(ps.iter()),
            Self::MultiLineString(lines) | Self::Polygon(lines) => max_of(lines.iter().flatten()),
            Self::MultiPolygon(polys) => max_of(polys.iter().flatten().flatten()),
            Self::GeometryCollection(geoms) => {
                geoms.iter().filter_map(|g| g.value.dimensions()).max()
            }
        }
    }
}

/// A validated geometry object.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub value: GeometryValue,
    pub bbox: Option<BBox>,
    pub foreign_members: ForeignMembers,
}

impl Geometry {
    /// A geometry with no bbox and no foreign members.
    pub fn new(value: GeometryValue) -> Self {
        Self {
            value,
            bbox: None,
            foreign_members: ForeignMembers::new(),
        }
    }

    /// The geometry's kind.
    pub fn kind(&self) -> GeometryKind {
        self.value.kind()
    }
}

/// A Feature `id`: string or number.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureId {
    String(String),
    Number(Number),
}

/// A validated Feature object.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// `None` for an explicit `"geometry": null` (or an empty-coordinates geometry).
    pub geometry: Option<Geometry>,
    /// `None` for `"properties": null`.
    pub properties: Option<Map<String, Value>>,
    pub id: Option<FeatureId>,
    pub bbox: Option<BBox>,
    pub foreign_members: ForeignMembers,
}

/// A validated FeatureCollection. Feature order is significant.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub bbox: Option<BBox>,
    pub foreign_members: ForeignMembers,
}

/// Any top-level GeoJSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Geometry(Geometry),
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

impl GeoJson {
    /// The `type` of the root object.
    pub fn geojson_type(&self) -> GeoJsonType {
        match self {
            Self::Geometry(g) => GeoJsonType::Geometry(g.kind()),
            Self::Feature(_) => GeoJsonType::Feature,
            Self::FeatureCollection(_) => GeoJsonType::FeatureCollection,
        }
    }
}

/// Names RFC 7946 reserves on every GeoJSON object.
const COMMON_MEMBERS: &[&str] = &["type", "bbox"];

/// Collect members of `object` not named in `known` or the common members.
pub fn foreign_members(object: &Map<String, Value>, known: &[&str]) -> ForeignMembers {
    object
        .iter()
        .filter(|(k, _)| !COMMON_MEMBERS.contains(&k.as_str()) && !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nine_type_names() {
        let all = GeoJsonType::all();
        assert_eq!(all.len(), 9);
        for t in &all {
            let parsed: GeoJsonType = t.as_str().parse().unwrap();
            assert_eq!(*t, parsed);
        }
    }

    #[test]
    fn test_type_names_case_sensitive() {
        assert!("point".parse::<GeometryKind>().is_err());
        assert!("feature".parse::<GeoJsonType>().is_err());
        assert!("".parse::<GeoJsonType>().is_err());
    }

    #[test]
    fn test_position_dimensions() {
        assert_eq!(Position::xy(1.0, 2.0).dimensions(), Dimensions::Xy);
        assert_eq!(Position::xyz(1.0, 2.0, 3.0).dimensions(), Dimensions::Xyz);
        assert!(Dimensions::Xyz > Dimensions::Xy);
    }

    #[test]
    fn test_geometry_dimensions_take_maximum() {
        let line = GeometryValue::LineString(vec![
            Position::xy(0.0, 0.0),
            Position::xyz(1.0, 1.0, 5.0),
        ]);
        assert_eq!(line.dimensions(), Some(Dimensions::Xyz));

        let empty = GeometryValue::GeometryCollection(vec![]);
        assert_eq!(empty.dimensions(), None);

        let nested = GeometryValue::GeometryCollection(vec![
            Geometry::new(GeometryValue::Point(Position::xy(0.0, 0.0))),
            Geometry::new(GeometryValue::GeometryCollection(vec![])),
        ]);
        assert_eq!(nested.dimensions(), Some(Dimensions::Xy));
    }

    #[test]
    fn test_bbox_antimeridian_flag() {
        let bbox = BBox::from_corners(vec![170.0, -10.0], vec![-170.0, 10.0]);
        assert!(bbox.crosses_antimeridian());
        assert_eq!(bbox.dimensions(), Dimensions::Xy);
    }

    #[test]
    fn test_bbox_without_corners_does_not_cross() {
        let bbox = BBox::from_corners(Vec::new(), Vec::new());
        assert!(!bbox.crosses_antimeridian());
    }

    #[test]
    fn test_foreign_members_exclude_known() {
        let obj = json!({
            "type": "Point",
            "coordinates": [0, 0],
            "bbox": [0, 0, 0, 0],
            "title": "vendor extension"
        });
        let map = obj.as_object().unwrap();
        let foreign = foreign_members(map, &["coordinates"]);
        assert_eq!(foreign.len(), 1);
        assert_eq!(foreign["title"], "vendor extension");
    }
}
