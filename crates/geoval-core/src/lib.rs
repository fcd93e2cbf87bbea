//! # geoval-core — Foundational Types for the GeoJSON Validator
//!
//! This crate defines the vocabulary shared by every part of the validator.
//! It depends on nothing internal; `geoval-validate` builds on it.
//!
//! ## Contents
//!
//! 1. **Paths.** [`JsonPath`] anchors every finding at a member/index chain
//!    from the document root, rendered as `features[1].geometry` or as an
//!    RFC 6901 pointer.
//!
//! 2. **Diagnostics.** [`DiagnosticKind`] is the single closed taxonomy of
//!    findings. [`Diagnostics`] accumulates them without ever failing, and
//!    [`ValidationResult`] is what callers receive.
//!
//! 3. **Typed model.** [`Position`], [`BBox`], [`Geometry`], [`Feature`] and
//!    [`FeatureCollection`] are produced only from documents that passed
//!    validation, so their invariants hold by construction.
//!
//! 4. **Profiles.** [`ValidationProfile`] carries the depth limit, optional
//!    WGS84 range checks, warning escalation and the caller's deadline.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `geoval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod diagnostic;
pub mod error;
pub mod model;
pub mod path;
pub mod profile;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Severity, ValidationResult};
pub use error::{GeovalError, ProfileError};
pub use model::{
    foreign_members, BBox, Dimensions, Feature, FeatureCollection, FeatureId, ForeignMembers,
    GeoJson, GeoJsonType, Geometry, GeometryKind, GeometryValue, Position,
};
pub use path::{JsonPath, PathSegment};
pub use profile::{ValidationProfile, DEFAULT_MAX_DEPTH, DEFAULT_PARALLEL_THRESHOLD};
