//! Property-based tests for clock and bitmap helpers.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.

use platform::bitmap::row_stride_for;
use platform::{LocalTime, TickUnit};

proptest::proptest! {
    /// Any valid (h, m, s) survives the seconds-since-midnight round trip.
    #[test]
    fn local_time_seconds_roundtrip(h in 0u8..24, m in 0u8..60, s in 0u8..60) {
        let t = LocalTime::new(h, m, s).map_err(|e| proptest::test_runner::TestCaseError::fail(e.to_string()))?;
        let back = LocalTime::from_seconds_since_midnight(t.seconds_since_midnight());
        proptest::prop_assert_eq!(back, t);
    }

    /// from_seconds_since_midnight never produces an out-of-range field.
    #[test]
    fn local_time_from_any_u32_is_valid(secs in proptest::num::u32::ANY) {
        let t = LocalTime::from_seconds_since_midnight(secs);
        proptest::prop_assert!(t.hour() < 24);
        proptest::prop_assert!(t.minute() < 60);
        proptest::prop_assert!(t.second() < 60);
        proptest::prop_assert_eq!(t.seconds_since_midnight(), secs % 86_400);
    }

    /// A minute tick is due exactly when the second hand is on 12.
    #[test]
    fn minute_boundary_matches_second_zero(secs in 0u32..86_400) {
        let t = LocalTime::from_seconds_since_midnight(secs);
        proptest::prop_assert_eq!(TickUnit::Minute.is_boundary(t), secs % 60 == 0);
        proptest::prop_assert!(TickUnit::Second.is_boundary(t));
    }

    /// Row stride always covers the width with less than one spare byte.
    #[test]
    fn row_stride_covers_width(width in 0u32..2048) {
        let stride = u32::from(row_stride_for(width));
        proptest::prop_assert!(stride * 8 >= width);
        proptest::prop_assert!(stride * 8 < width + 8);
    }
}
