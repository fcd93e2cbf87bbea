//! # Linear Rings
//!
//! A linear ring is a closed LineString with four or more positions whose
//! first and last positions are equivalent (RFC 7946 §3.1.6).
//!
//! - Fewer than four positions is an error.
//! - An open ring is a warning: some producers omit the closing position and
//!   consumers commonly close it implicitly.
//! - Winding follows the right-hand rule: exterior rings counter-clockwise,
//!   holes clockwise. RFC 7946 says parsers SHOULD NOT reject on winding,
//!   so a violation is a warning.
//!
//! Self-intersection is not checked.

use geoval_core::{DiagnosticKind, Diagnostics, JsonPath, Position};

/// Fewest positions a linear ring may have.
pub const MIN_RING_LEN: usize = 4;

/// Position of a ring within its polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingRole {
    /// The first ring: the polygon's boundary.
    Exterior,
    /// Any later ring: a hole.
    Interior,
}

impl RingRole {
    /// Role of the ring at `index` within a polygon's coordinates.
    pub fn at(index: usize) -> Self {
        if index == 0 {
            Self::Exterior
        } else {
            Self::Interior
        }
    }
}

/// Returns true if the first and last positions are identical.
pub fn is_closed(ring: &[Position]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// Planar signed area of a closed ring over (x, y), via the shoelace formula.
///
/// Positive for counter-clockwise rings, negative for clockwise ones.
pub fn signed_area(ring: &[Position]) -> f64 {
    let twice: f64 = ring
        .windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum();
    twice / 2.0
}

/// Check ring length, closure and winding, recording findings at `path`.
pub(crate) fn check_ring(ring: &[Position], role: RingRole, path: &JsonPath, diags: &mut Diagnostics) {
    if ring.len() < MIN_RING_LEN {
        diags.report(
            path,
            DiagnosticKind::TooFewPositions,
            format!(
                "linear ring must have at least {MIN_RING_LEN} positions, found {}",
                ring.len()
            ),
        );
        return;
    }

    if !is_closed(ring) {
        diags.report(
            path,
            DiagnosticKind::RingNotClosed,
            "linear ring's first and last positions differ",
        );
        return;
    }

    let area = signed_area(ring);
    match role {
        RingRole::Exterior if area < 0.0 => diags.report(
            path,
            DiagnosticKind::WindingOrder,
            "exterior ring is clockwise; the right-hand rule expects counter-clockwise",
        ),
        RingRole::Interior if area > 0.0 => diags.report(
            path,
            DiagnosticKind::WindingOrder,
            "hole is counter-clockwise; the right-hand rule expects clockwise",
        ),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoval_core::Severity;

    fn ring(points: &[(f64, f64)]) -> Vec<Position> {
        points.iter().map(|&(x, y)| Position::xy(x, y)).collect()
    }

    fn ccw_square() -> Vec<Position> {
        ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)])
    }

    fn cw_square() -> Vec<Position> {
        let mut r = ccw_square();
        r.reverse();
        r
    }

    fn kinds(diags: Diagnostics) -> Vec<DiagnosticKind> {
        diags.into_vec().into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_signed_area_orientation() {
        assert_eq!(signed_area(&ccw_square()), 1.0);
        assert_eq!(signed_area(&cw_square()), -1.0);
    }

    #[test]
    fn test_closed_detection() {
        assert!(is_closed(&ccw_square()));
        assert!(!is_closed(&ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])));
        assert!(!is_closed(&[]));
    }

    #[test]
    fn test_closure_compares_altitude() {
        let r = vec![
            Position::xyz(0.0, 0.0, 0.0),
            Position::xyz(1.0, 0.0, 0.0),
            Position::xyz(1.0, 1.0, 0.0),
            Position::xyz(0.0, 0.0, 5.0),
        ];
        assert!(!is_closed(&r));
    }

    #[test]
    fn test_well_formed_rings_are_silent() {
        let mut diags = Diagnostics::new();
        check_ring(&ccw_square(), RingRole::Exterior, &JsonPath::root(), &mut diags);
        check_ring(&cw_square(), RingRole::Interior, &JsonPath::root(), &mut diags);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_too_few_positions_is_error() {
        let mut diags = Diagnostics::new();
        let short = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        check_ring(&short, RingRole::Exterior, &JsonPath::root(), &mut diags);
        assert!(!diags.is_valid());
        assert_eq!(kinds(diags), vec![DiagnosticKind::TooFewPositions]);
    }

    #[test]
    fn test_open_ring_is_warning() {
        let mut diags = Diagnostics::new();
        let open = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        check_ring(&open, RingRole::Exterior, &JsonPath::root(), &mut diags);
        let items = diags.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, DiagnosticKind::RingNotClosed);
        assert_eq!(items[0].severity, Severity::Warning);
    }

    #[test]
    fn test_winding_violations_are_warnings() {
        let mut diags = Diagnostics::new();
        check_ring(&cw_square(), RingRole::Exterior, &JsonPath::root(), &mut diags);
        check_ring(&ccw_square(), RingRole::Interior, &JsonPath::root(), &mut diags);
        assert!(diags.is_valid());
        assert_eq!(
            kinds(diags),
            vec![DiagnosticKind::WindingOrder, DiagnosticKind::WindingOrder]
        );
    }

    #[test]
    fn test_degenerate_ring_has_no_winding() {
        let mut diags = Diagnostics::new();
        let flat = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 0.0)]);
        check_ring(&flat, RingRole::Exterior, &JsonPath::root(), &mut diags);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_role_from_index() {
        assert_eq!(RingRole::at(0), RingRole::Exterior);
        assert_eq!(RingRole::at(3), RingRole::Interior);
    }
}
