//! # geoval-validate — RFC 7946 GeoJSON Validation
//!
//! Structural and semantic validation of GeoJSON documents that have already
//! been parsed into a [`serde_json::Value`]. The validator never aborts on
//! the first problem: it walks the whole tree and returns every finding as a
//! path-qualified [`Diagnostic`](geoval_core::Diagnostic).
//!
//! ## Layers
//!
//! - [`position`] — a single coordinate tuple.
//! - [`bbox`] — a `bbox` array against a known dimensionality, with the
//!   antimeridian exemption on the longitude axis.
//! - [`ring`] — linear ring length, closure and winding.
//! - [`geometry`] — the seven geometry kinds, recursing through
//!   GeometryCollections under an explicit depth limit.
//! - [`feature`] — Feature and FeatureCollection envelopes.
//! - [`dispatch`] — reads the root `type` and routes; the usual entry point.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({
//!     "type": "Feature",
//!     "geometry": {"type": "Point", "coordinates": [102.0]},
//!     "properties": {}
//! });
//! let result = geoval_validate::validate(&doc);
//! assert!(!result.valid);
//! assert_eq!(result.diagnostics[0].path.to_string(), "geometry.coordinates");
//! ```
//!
//! ## Features
//!
//! - `parallel`: validate large FeatureCollections on the rayon thread pool.
//!   Diagnostics are merged in feature order, so output is identical to the
//!   sequential path.

pub mod bbox;
pub mod dispatch;
pub mod feature;
pub mod geometry;
pub mod position;
pub mod ring;

pub use bbox::{validate_bbox, validate_bbox_unconstrained};
pub use dispatch::{validate, validate_with, Validator};
pub use feature::{
    validate_feature, validate_feature_collection, validate_feature_collection_with,
    validate_feature_with,
};
pub use geometry::{validate_geometry, validate_geometry_with};
pub use position::validate_position;
pub use ring::{is_closed, signed_area, RingRole};

pub use geoval_core::{
    Diagnostic, DiagnosticKind, GeoJson, JsonPath, Severity, ValidationProfile, ValidationResult,
};
