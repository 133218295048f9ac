// Copyright (C) 2026 Liyang <liyang@veronica>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Overlap detection and crossfade curve construction.
//!
//! When two ranges of the same instrument share a velocity window, playing
//! both at full amplitude doubles the level inside the window. Instead each
//! range gets an amplitude curve that dips to silence at the boundary it
//! shares with a neighbor (or at the center of a window it fully contains)
//! and rises to the nominal velocity-tracking amplitude everywhere else.

use crate::kit::{CurvePoint, Instrument, VelocityRange};

/// A shared velocity window between two ranges of one instrument. The
/// window is strictly non-empty; abutting ranges do not overlap. `a` and
/// `b` index into the instrument's range list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub lovel: u8,
    pub hivel: u8,
    pub a: usize,
    pub b: usize,
}

/// Nominal amplitude for a velocity: plain linear velocity tracking.
pub fn v2a(velocity: u8) -> f32 {
    velocity as f32 / 127.0
}

/// The shared window of two ranges, if they genuinely overlap. Ranges that
/// merely abut (`lo == hi`) do not count.
pub fn overlap_window(a: &VelocityRange, b: &VelocityRange) -> Option<(u8, u8)> {
    let lovel = a.lovel().max(b.lovel());
    let hivel = a.hivel().min(b.hivel());
    (lovel < hivel).then_some((lovel, hivel))
}

/// All pairwise overlaps among an instrument's ranges. Quadratic over the
/// range count, which stays in the tens at worst.
pub fn find_overlaps(instrument: &Instrument) -> Vec<Overlap> {
    let ranges = instrument.ranges();
    let mut overlaps = Vec::new();
    for a in 0..ranges.len() {
        for b in a + 1..ranges.len() {
            if let Some((lovel, hivel)) = overlap_window(&ranges[a], &ranges[b]) {
                overlaps.push(Overlap { lovel, hivel, a, b });
            }
        }
    }
    overlaps
}

/// Builds the curve for one range from the windows it shares with its
/// siblings. Returns an empty curve when there are no overlaps, which
/// means "plain on/off at the boundaries".
///
/// The lowest window is treated as a shared low edge when it starts exactly
/// at `lovel`; failing that, the highest window is treated as a shared high
/// edge when it ends exactly at `hivel`. Everything left over is an island
/// strictly inside the range, and the curve dips to silence at its center.
pub fn build_curve(lovel: u8, hivel: u8, mut windows: Vec<(u8, u8)>) -> Vec<CurvePoint> {
    if windows.is_empty() {
        return Vec::new();
    }
    windows.sort_by_key(|w| w.0);

    let lo_overlap = (windows[0].0 == lovel).then(|| windows.remove(0));
    let hi_overlap = windows
        .last()
        .is_some_and(|w| w.1 == hivel)
        .then(|| windows.pop())
        .flatten();

    let mut points = Vec::new();
    match lo_overlap {
        Some((_, shared_hi)) => {
            points.push(CurvePoint::new(lovel, 0.0));
            points.push(CurvePoint::new(shared_hi, v2a(shared_hi)));
        }
        None => points.push(CurvePoint::new(lovel, v2a(lovel))),
    }
    for (lo, hi) in windows {
        points.push(CurvePoint::new(lo, v2a(lo)));
        // Round-half-up center.
        let center = lo + (hi - lo).div_ceil(2);
        points.push(CurvePoint::new(center, 0.0));
        points.push(CurvePoint::new(hi, v2a(hi)));
    }
    match hi_overlap {
        Some((shared_lo, _)) => {
            points.push(CurvePoint::new(shared_lo, v2a(shared_lo)));
            points.push(CurvePoint::new(hivel, 0.0));
        }
        None => points.push(CurvePoint::new(hivel, v2a(hivel))),
    }
    points
}

/// Recomputes every range's curve from the instrument's current overlaps.
/// Ranges without overlaps fall back to an empty curve. Idempotent.
pub fn apply(instrument: &mut Instrument) {
    let mut windows: Vec<Vec<(u8, u8)>> = vec![Vec::new(); instrument.len()];
    for overlap in find_overlaps(instrument) {
        windows[overlap.a].push((overlap.lovel, overlap.hivel));
        windows[overlap.b].push((overlap.lovel, overlap.hivel));
    }
    for (range, windows) in instrument.ranges_mut().iter_mut().zip(windows) {
        range.set_curve_points(build_curve(range.lovel(), range.hivel(), windows));
    }
}

/// Drops every range's curve, restoring plain on/off behavior.
pub fn clear(instrument: &mut Instrument) {
    for range in instrument.ranges_mut() {
        range.clear_curve_points();
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;
    use crate::kit::Kit;

    fn instrument_with_windows(windows: &[(u8, u8)]) -> Kit {
        let mut kit = Kit::new();
        let inst = kit.instrument_mut(38).unwrap();
        for (i, (lo, hi)) in windows.iter().enumerate() {
            let range = inst.attach(PathBuf::from(format!("/s{}.wav", i))).unwrap();
            range.set_window(*lo, *hi);
        }
        kit
    }

    fn velocities(points: &[CurvePoint]) -> Vec<u8> {
        points.iter().map(|p| p.velocity).collect()
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let kit = instrument_with_windows(&[(0, 70), (50, 127)]);
        let inst = kit.instrument(38).unwrap();
        let ranges = inst.ranges();

        let ab = overlap_window(&ranges[0], &ranges[1]);
        let ba = overlap_window(&ranges[1], &ranges[0]);
        assert_eq!(ab, Some((50, 70)));
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_abutting_ranges_do_not_overlap() {
        let kit = instrument_with_windows(&[(0, 64), (64, 127)]);
        let inst = kit.instrument(38).unwrap();
        assert!(find_overlaps(inst).is_empty());
    }

    #[test]
    fn test_two_overlapping_ranges() {
        let mut kit = instrument_with_windows(&[(0, 70), (50, 127)]);
        let inst = kit.instrument_mut(38).unwrap();
        apply(inst);

        // The lower range shares its high edge: full scale where it is
        // alone, silence exactly at the shared boundary.
        let lower = inst.ranges()[0].curve_points();
        assert_eq!(
            lower,
            &[
                CurvePoint::new(0, 0.0),
                CurvePoint::new(50, v2a(50)),
                CurvePoint::new(70, 0.0),
            ]
        );

        // The upper range mirrors it on its low edge.
        let upper = inst.ranges()[1].curve_points();
        assert_eq!(
            upper,
            &[
                CurvePoint::new(50, 0.0),
                CurvePoint::new(70, v2a(70)),
                CurvePoint::new(127, v2a(127)),
            ]
        );
    }

    #[test]
    fn test_contained_range_produces_mid_overlap() {
        let mut kit = instrument_with_windows(&[(0, 127), (40, 60)]);
        let inst = kit.instrument_mut(38).unwrap();
        apply(inst);

        // The island [40,60] sits strictly inside [0,127]: the outer curve
        // dips to silence at the island's center.
        let outer = inst.ranges()[0].curve_points();
        assert_eq!(
            outer,
            &[
                CurvePoint::new(0, 0.0),
                CurvePoint::new(40, v2a(40)),
                CurvePoint::new(50, 0.0),
                CurvePoint::new(60, v2a(60)),
                CurvePoint::new(127, v2a(127)),
            ]
        );
    }

    #[test]
    fn test_lo_mid_and_hi_overlaps_together() {
        let mut kit = instrument_with_windows(&[(20, 100), (20, 40), (50, 60), (80, 100)]);
        let inst = kit.instrument_mut(38).unwrap();
        apply(inst);

        let points = inst.ranges()[0].curve_points();
        assert_eq!(velocities(points), vec![20, 40, 50, 55, 60, 80, 100]);
        assert_eq!(points[0].amplitude, 0.0);
        assert_eq!(points[3].amplitude, 0.0);
        assert_eq!(points[6].amplitude, 0.0);
    }

    #[test]
    fn test_mid_overlap_center_rounds_up() {
        // Odd-width window [10, 15] inside [0, 127]: center = 10 + ceil(5/2).
        let mut kit = instrument_with_windows(&[(0, 127), (10, 15)]);
        let inst = kit.instrument_mut(38).unwrap();
        apply(inst);

        let outer = inst.ranges()[0].curve_points();
        assert!(outer.contains(&CurvePoint::new(13, 0.0)));
    }

    #[test]
    fn test_no_overlaps_clears_curve() {
        let mut kit = instrument_with_windows(&[(0, 60), (61, 127)]);
        let inst = kit.instrument_mut(38).unwrap();

        // Seed stale points, then recompute with no overlaps present.
        inst.ranges_mut()[0].set_curve_points(vec![CurvePoint::new(0, 1.0)]);
        apply(inst);

        assert!(inst.ranges()[0].curve_points().is_empty());
        assert!(inst.ranges()[1].curve_points().is_empty());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut kit = instrument_with_windows(&[(0, 70), (50, 127)]);
        let inst = kit.instrument_mut(38).unwrap();
        apply(inst);
        let first: Vec<Vec<CurvePoint>> = inst
            .ranges()
            .iter()
            .map(|r| r.curve_points().to_vec())
            .collect();

        apply(inst);
        let second: Vec<Vec<CurvePoint>> = inst
            .ranges()
            .iter()
            .map(|r| r.curve_points().to_vec())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_curves_stay_in_bounds_and_sorted() {
        let mut kit = instrument_with_windows(&[(0, 80), (30, 110), (60, 127)]);
        let inst = kit.instrument_mut(38).unwrap();
        apply(inst);

        for range in inst.ranges() {
            assert!(range.lovel() <= range.hivel());
            let points = range.curve_points();
            assert!(!points.is_empty());
            assert_eq!(points[0].velocity, range.lovel());
            assert_eq!(points[points.len() - 1].velocity, range.hivel());
            for pair in points.windows(2) {
                assert!(pair[0].velocity <= pair[1].velocity);
            }
            for point in points {
                assert!((0.0..=1.0).contains(&point.amplitude));
            }
        }
    }
}
