//! Property-based tests for window resolution and mesh record counts.

use proptest::prelude::*;

use grid_mesh::{build, emission_count, resolve, MeshMode, SampleBuffer};
use raster_source::MemoryRaster;
use terrain_types::{AxisBound, Window};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Grid sizes small enough to enumerate.
fn arb_dims() -> impl Strategy<Value = (usize, usize)> {
    (0usize..24, 0usize..24)
}

fn arb_stride() -> impl Strategy<Value = usize> {
    1usize..5
}

fn arb_mode() -> impl Strategy<Value = MeshMode> {
    prop_oneof![Just(MeshMode::Points), Just(MeshMode::Faces)]
}

// ---------------------------------------------------------------------------
// Window resolution
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn unset_bounds_are_full_extent(size in 0usize..100_000) {
        prop_assert_eq!(resolve(AxisBound::Absent, AxisBound::Absent, size), (0, size));
        prop_assert_eq!(
            resolve(AxisBound::from_raw(-1.0), AxisBound::from_raw(-1.0), size),
            (0, size)
        );
    }

    #[test]
    fn fractional_min_is_floor_of_product(f in 0.0f64..1.0, size in 0usize..100_000) {
        let (lo, hi) = resolve(AxisBound::from_raw(f), AxisBound::from_raw(-1.0), size);
        prop_assert_eq!(lo, (f * size as f64).floor() as usize);
        prop_assert_eq!(hi, size);
    }

    #[test]
    fn absolute_min_ignores_size(a in 1.0f64..1.0e6, size in 0usize..100_000) {
        let (lo, _) = resolve(AxisBound::from_raw(a), AxisBound::from_raw(-1.0), size);
        prop_assert_eq!(lo, a.floor() as usize);
    }
}

// ---------------------------------------------------------------------------
// Record counts
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn record_count_matches_grid(
        (w, h) in arb_dims(),
        stride in arb_stride(),
        mode in arb_mode(),
    ) {
        let raster = MemoryRaster::from_fn(w, h, |x, y| (x * 3 + y) as f64);
        let buf = SampleBuffer::read(&raster, Window::full(w, h), stride).unwrap();
        let (bw, bh) = (w / stride, h / stride);
        prop_assert_eq!((buf.width(), buf.height()), (bw, bh));

        let expected = match mode {
            MeshMode::Points => bw * bh,
            MeshMode::Faces => 2 * bw.saturating_sub(1) * bh.saturating_sub(1),
        };
        prop_assert_eq!(emission_count(bw, bh, mode), expected);

        let it = build(&buf, 0.1, mode);
        prop_assert_eq!(it.len(), expected);
        prop_assert_eq!(it.count(), expected);
    }

    #[test]
    fn rebuilding_is_deterministic(
        (w, h) in arb_dims(),
        stride in arb_stride(),
        scale in 0.01f64..10.0,
    ) {
        let raster = MemoryRaster::from_fn(w, h, |x, y| ((x * 7 + y * 13) % 11) as f64);
        let buf = SampleBuffer::read(&raster, Window::full(w, h), stride).unwrap();
        let first: Vec<_> = build(&buf, scale, MeshMode::Faces).collect();
        let second: Vec<_> = build(&buf, scale, MeshMode::Faces).collect();
        prop_assert_eq!(first, second);
    }
}
