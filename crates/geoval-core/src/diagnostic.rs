//! # Diagnostics — Validation Findings
//!
//! A validation run never stops at the first problem. Each finding is a
//! [`Diagnostic`] (path + kind + message + severity) and findings are
//! accumulated in a [`Diagnostics`] aggregator that is threaded through every
//! validator call.
//!
//! ## Validity Invariant
//!
//! A document is valid iff no `Error`-severity diagnostic was recorded.
//! Warnings describe constructs RFC 7946 discourages but permits, and never
//! affect validity unless a profile escalates them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeovalError;
use crate::model::GeoJson;
use crate::path::JsonPath;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Discouraged but legal; does not affect validity.
    Warning,
    /// Grammar violation; the document is not valid GeoJSON.
    Error,
}

impl Severity {
    /// Returns the lowercase identifier used in rendered diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed taxonomy of validation findings.
///
/// Every `match` on `DiagnosticKind` is exhaustive; adding a kind forces
/// [`DiagnosticKind::default_severity`] and [`DiagnosticKind::as_str`] to be
/// updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticKind {
    // Structural
    /// A member expected to hold an array holds something else.
    NotAnArray,
    /// A nested geometry or feature is not a JSON object.
    NotAnObject,
    /// A position or bbox has the wrong number of elements.
    WrongArity,
    /// The `type` member is absent.
    MissingType,
    /// A nested `type` is not a string or names the wrong kind of object.
    InvalidType,
    /// The root `type` is not one of the nine RFC 7946 type names.
    UnknownType,
    /// A geometry has no `coordinates` member.
    MissingCoordinates,
    /// A required member other than `type`/`coordinates` is absent.
    MissingMember,

    // Numeric / member values
    /// A position or bbox element is not a finite number.
    NonNumericElement,
    /// `properties` is neither an object nor null.
    InvalidProperties,
    /// A Feature `id` is neither a string nor a number.
    InvalidId,

    // Geometric
    /// A LineString or linear ring has too few positions.
    TooFewPositions,
    /// A linear ring's first and last positions differ.
    RingNotClosed,
    /// A ring's winding order does not follow the right-hand rule.
    WindingOrder,
    /// A bbox's dimensionality disagrees with its geometry's positions.
    DimensionMismatch,
    /// GeometryCollection nesting exceeds the configured depth limit.
    TooDeeplyNested,
    /// A `coordinates` array is present but empty.
    EmptyCoordinates,
    /// A position carries more than three elements.
    ExcessPositionElements,

    // Range
    /// A bbox has min > max on an axis other than longitude.
    InvertedRange,
    /// A coordinate lies outside WGS84 bounds (strict range mode only).
    OutOfRange,

    // Budget
    /// The caller's deadline passed before the document was fully checked.
    BudgetExceeded,
}

impl DiagnosticKind {
    /// Returns every kind in declaration order.
    pub fn all() -> &'static [DiagnosticKind] {
        &[
            Self::NotAnArray,
            Self::NotAnObject,
            Self::WrongArity,
            Self::MissingType,
            Self::InvalidType,
            Self::UnknownType,
            Self::MissingCoordinates,
            Self::MissingMember,
            Self::NonNumericElement,
            Self::InvalidProperties,
            Self::InvalidId,
            Self::TooFewPositions,
            Self::RingNotClosed,
            Self::WindingOrder,
            Self::DimensionMismatch,
            Self::TooDeeplyNested,
            Self::EmptyCoordinates,
            Self::ExcessPositionElements,
            Self::InvertedRange,
            Self::OutOfRange,
            Self::BudgetExceeded,
        ]
    }

    /// Severity recorded for this kind unless a profile escalates it.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::RingNotClosed
            | Self::WindingOrder
            | Self::EmptyCoordinates
            | Self::ExcessPositionElements => Severity::Warning,
            Self::NotAnArray
            | Self::NotAnObject
            | Self::WrongArity
            | Self::MissingType
            | Self::InvalidType
            | Self::UnknownType
            | Self::MissingCoordinates
            | Self::MissingMember
            | Self::NonNumericElement
            | Self::InvalidProperties
            | Self::InvalidId
            | Self::TooFewPositions
            | Self::DimensionMismatch
            | Self::TooDeeplyNested
            | Self::InvertedRange
            | Self::OutOfRange
            | Self::BudgetExceeded => Severity::Error,
        }
    }

    /// Returns the PascalCase name of this kind.
    ///
    /// Matches the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAnArray => "NotAnArray",
            Self::NotAnObject => "NotAnObject",
            Self::WrongArity => "WrongArity",
            Self::MissingType => "MissingType",
            Self::InvalidType => "InvalidType",
            Self::UnknownType => "UnknownType",
            Self::MissingCoordinates => "MissingCoordinates",
            Self::MissingMember => "MissingMember",
            Self::NonNumericElement => "NonNumericElement",
            Self::InvalidProperties => "InvalidProperties",
            Self::InvalidId => "InvalidId",
            Self::TooFewPositions => "TooFewPositions",
            Self::RingNotClosed => "RingNotClosed",
            Self::WindingOrder => "WindingOrder",
            Self::DimensionMismatch => "DimensionMismatch",
            Self::TooDeeplyNested => "TooDeeplyNested",
            Self::EmptyCoordinates => "EmptyCoordinates",
            Self::ExcessPositionElements => "ExcessPositionElements",
            Self::InvertedRange => "InvertedRange",
            Self::OutOfRange => "OutOfRange",
            Self::BudgetExceeded => "BudgetExceeded",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticKind {
    type Err = GeovalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GeovalError::UnknownDiagnosticKind(s.to_string()))
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Location of the finding, relative to the document root.
    pub path: JsonPath,
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Human-readable detail.
    pub message: String,
    /// Error or Warning.
    pub severity: Severity,
}

impl Diagnostic {
    /// Build a diagnostic with the kind's default severity.
    pub fn new(path: JsonPath, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            severity: kind.default_severity(),
        }
    }

    /// Build a root-relative diagnostic. Callers anchor it with [`Diagnostic::at`].
    pub fn relative(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(JsonPath::root(), kind, message)
    }

    /// Re-anchor a root-relative diagnostic under `base`.
    pub fn at(mut self, base: &JsonPath) -> Self {
        self.path = self.path.rebase(base);
        self
    }

    /// Returns true for `Error` severity.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {} [{}]",
            self.path, self.kind, self.message, self.severity
        )
    }
}

/// Accumulator for diagnostics produced during one validation run.
///
/// Pushing never fails. Warnings whose kind is in the escalation set are
/// recorded as errors.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    escalate: BTreeSet<DiagnosticKind>,
}

impl Diagnostics {
    /// An empty aggregator with no escalation.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty aggregator that upgrades the given kinds to `Error`.
    pub fn with_escalation(escalate: BTreeSet<DiagnosticKind>) -> Self {
        Self {
            items: Vec::new(),
            escalate,
        }
    }

    /// Record a diagnostic.
    pub fn push(&mut self, mut diagnostic: Diagnostic) {
        if self.escalate.contains(&diagnostic.kind) {
            diagnostic.severity = Severity::Error;
        }
        self.items.push(diagnostic);
    }

    /// Record a finding at `path` with the kind's default severity.
    pub fn report(&mut self, path: &JsonPath, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Diagnostic::new(path.clone(), kind, message));
    }

    /// Merge diagnostics produced by an independent run, preserving order.
    ///
    /// The other run's escalation is not re-applied.
    pub fn append(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Current length, for use with [`Diagnostics::has_errors_since`].
    pub fn mark(&self) -> usize {
        self.items.len()
    }

    /// Returns true if an error was recorded after `mark`.
    pub fn has_errors_since(&self, mark: usize) -> bool {
        self.items.iter().skip(mark).any(Diagnostic::is_error)
    }

    /// Returns true if no `Error` has been recorded.
    pub fn is_valid(&self) -> bool {
        !self.items.iter().any(Diagnostic::is_error)
    }

    /// Number of `Error` diagnostics.
    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    /// Number of `Warning` diagnostics.
    pub fn warning_count(&self) -> usize {
        self.items.len() - self.error_count()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Consume the aggregator, returning diagnostics in recording order.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Findings in document order.
    pub diagnostics: Vec<Diagnostic>,
    /// True iff `diagnostics` contains no `Error`.
    pub valid: bool,
    /// The typed document, present only when `valid`.
    #[serde(skip)]
    pub document: Option<GeoJson>,
}

impl ValidationResult {
    /// Finalize an aggregator into a result.
    pub fn from_diagnostics(diagnostics: Diagnostics, document: Option<GeoJson>) -> Self {
        let valid = diagnostics.is_valid();
        Self {
            diagnostics: diagnostics.into_vec(),
            valid,
            document: if valid { document } else { None },
        }
    }

    /// Returns true iff no `Error` diagnostic was produced.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Diagnostics of `Error` severity.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Diagnostics of `Warning` severity.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Returns true if any diagnostic has the given kind.
    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_count_and_uniqueness() {
        let kinds = DiagnosticKind::all();
        assert_eq!(kinds.len(), 21);
        let unique: BTreeSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in DiagnosticKind::all() {
            let parsed: DiagnosticKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
        assert!("wrongarity".parse::<DiagnosticKind>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for kind in DiagnosticKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_only_discouraged_constructs_are_warnings() {
        let warnings: Vec<_> = DiagnosticKind::all()
            .iter()
            .filter(|k| k.default_severity() == Severity::Warning)
            .collect();
        assert_eq!(
            warnings,
            vec![
                &DiagnosticKind::RingNotClosed,
                &DiagnosticKind::WindingOrder,
                &DiagnosticKind::EmptyCoordinates,
                &DiagnosticKind::ExcessPositionElements,
            ]
        );
    }

    #[test]
    fn test_display_format() {
        let d = Diagnostic::new(
            JsonPath::root().member("geometry").member("coordinates"),
            DiagnosticKind::WrongArity,
            "position must have 2 or 3 elements, found 1",
        );
        assert_eq!(
            d.to_string(),
            "geometry.coordinates: WrongArity: position must have 2 or 3 elements, found 1 [error]"
        );
    }

    #[test]
    fn test_relative_diagnostic_rebased() {
        let d = Diagnostic::relative(DiagnosticKind::NonNumericElement, "x")
            .at(&JsonPath::root().member("bbox"));
        assert_eq!(d.path.to_string(), "bbox");
    }

    #[test]
    fn test_warnings_do_not_affect_validity() {
        let mut diags = Diagnostics::new();
        diags.report(&JsonPath::root(), DiagnosticKind::RingNotClosed, "open ring");
        assert!(diags.is_valid());
        assert_eq!(diags.warning_count(), 1);
        diags.report(&JsonPath::root(), DiagnosticKind::WrongArity, "bad");
        assert!(!diags.is_valid());
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_escalation_upgrades_warning() {
        let mut diags =
            Diagnostics::with_escalation([DiagnosticKind::WindingOrder].into_iter().collect());
        diags.report(&JsonPath::root(), DiagnosticKind::WindingOrder, "cw exterior");
        diags.report(&JsonPath::root(), DiagnosticKind::RingNotClosed, "open ring");
        let items = diags.into_vec();
        assert_eq!(items[0].severity, Severity::Error);
        assert_eq!(items[1].severity, Severity::Warning);
    }

    #[test]
    fn test_has_errors_since_mark() {
        let mut diags = Diagnostics::new();
        diags.report(&JsonPath::root(), DiagnosticKind::WrongArity, "before");
        let mark = diags.mark();
        assert!(!diags.has_errors_since(mark));
        diags.report(&JsonPath::root(), DiagnosticKind::EmptyCoordinates, "warn");
        assert!(!diags.has_errors_since(mark));
        diags.report(&JsonPath::root(), DiagnosticKind::InvalidId, "err");
        assert!(diags.has_errors_since(mark));
    }

    #[test]
    fn test_result_drops_document_when_invalid() {
        let mut diags = Diagnostics::new();
        diags.report(&JsonPath::root(), DiagnosticKind::MissingType, "no type");
        let result = ValidationResult::from_diagnostics(diags, None);
        assert!(!result.is_valid());
        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.warnings().count(), 0);
        assert!(result.has_kind(DiagnosticKind::MissingType));
    }

    #[test]
    fn test_result_serializes_path_as_string() {
        let mut diags = Diagnostics::new();
        diags.report(
            &JsonPath::root().member("features").index(1),
            DiagnosticKind::NotAnObject,
            "expected object",
        );
        let result = ValidationResult::from_diagnostics(diags, None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["diagnostics"][0]["path"], "features[1]");
        assert_eq!(json["diagnostics"][0]["kind"], "NotAnObject");
        assert_eq!(json["diagnostics"][0]["severity"], "error");
    }
}
