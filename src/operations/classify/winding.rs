use crate::error::GeometryError;
use crate::geometry::{Loop, Winding};
use crate::math::TOLERANCE;

/// Resolves the winding of a loop from its shoelace signed area.
///
/// A zero-area loop has no defined winding; it is reported as clockwise and
/// logged.
#[must_use]
pub fn winding_of(l: &Loop, loop_index: usize) -> Winding {
    let area = l.signed_area();
    if area.abs() < TOLERANCE {
        let err = GeometryError::UnresolvedWinding { loop_index };
        tracing::warn!(%err, "Defaulting to clockwise");
        return Winding::Clockwise;
    }
    if area < 0.0 {
        Winding::Clockwise
    } else {
        Winding::CounterClockwise
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{pts, rect_ccw};

    #[test]
    fn ccw_rectangle() {
        let l = Loop::new(rect_ccw()).unwrap();
        assert_eq!(winding_of(&l, 0), Winding::CounterClockwise);
        assert_eq!(winding_of(&l.reversed(), 0), Winding::Clockwise);
    }

    #[test]
    fn l_shape_with_reflex_corner() {
        let l = Loop::new(pts(&[
            (0.0, 0.0),
            (2000.0, 0.0),
            (2000.0, 1000.0),
            (1000.0, 1000.0),
            (1000.0, 2000.0),
            (0.0, 2000.0),
        ]))
        .unwrap();
        assert_eq!(winding_of(&l, 0), Winding::CounterClockwise);
        assert_eq!(winding_of(&l.reversed(), 0), Winding::Clockwise);
    }

    #[test]
    fn zero_area_defaults_to_clockwise() {
        crate::test_support::init_tracing();
        let flat = Loop::new(pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)])).unwrap();
        assert_eq!(winding_of(&flat, 2), Winding::Clockwise);
    }
}
