use terrain_types::{AxisBound, AxisRequest, Window};
use tracing::debug;

/// Resolve one axis to a `[lo, hi)` index range on an axis of `size` cells.
///
/// An absent max means the full extent and an absent min means zero.
/// Results are not clamped: callers get exactly what was asked for.
pub fn resolve(min: AxisBound, max: AxisBound, size: usize) -> (usize, usize) {
    let hi = max.index(size).unwrap_or(size);
    let lo = min.index(size).unwrap_or(0);
    (lo, hi)
}

/// Resolve both axes of a `width` x `height` raster.
pub fn resolve_window(x: AxisRequest, y: AxisRequest, width: usize, height: usize) -> Window {
    let window = Window::new(resolve(x.min, x.max, width), resolve(y.min, y.max, height));
    debug!(%window, width, height, "resolved window");
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_bounds_cover_full_extent() {
        assert_eq!(resolve(AxisBound::Absent, AxisBound::Absent, 37), (0, 37));
        assert_eq!(resolve(AxisBound::Absent, AxisBound::Absent, 0), (0, 0));
    }

    #[test]
    fn fractions_scale_by_size() {
        let r = resolve(AxisBound::from_raw(0.25), AxisBound::from_raw(0.5), 10);
        assert_eq!(r, (2, 5));
    }

    #[test]
    fn absolute_indices_truncate() {
        let r = resolve(AxisBound::from_raw(3.7), AxisBound::from_raw(8.2), 100);
        assert_eq!(r, (3, 8));
    }

    #[test]
    fn no_clamping_past_extent() {
        let r = resolve(AxisBound::Absent, AxisBound::from_raw(50.0), 10);
        assert_eq!(r, (0, 50));
    }

    #[test]
    fn inverted_request_passes_through() {
        let r = resolve(AxisBound::from_raw(0.9), AxisBound::from_raw(0.1), 10);
        assert_eq!(r, (9, 1));
    }

    #[test]
    fn axes_resolve_independently() {
        let w = resolve_window(
            AxisRequest::from_raw(-1.0, 0.5),
            AxisRequest::from_raw(2.0, -1.0),
            8,
            6,
        );
        assert_eq!(w, Window::new((0, 4), (2, 6)));
    }
}
