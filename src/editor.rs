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

//! Boundary editing: pointer coordinate to velocity conversion, choosing
//! which boundary of a range a drag moves, snap between sibling ranges,
//! blend mode transitions, and the spread layout.

use crate::crossfade;
use crate::kit::{Instrument, VelocityRange, VELOCITY_MAX};

/// Maximum distance, in velocity units, at which a dragged boundary pulls
/// a sibling's facing boundary along with it in snap mode.
pub const SNAP_RANGE: u8 = 5;

/// Which boundary of a range an edit moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Lovel,
    Hivel,
}

impl Boundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boundary::Lovel => "lovel",
            Boundary::Hivel => "hivel",
        }
    }
}

/// How edits to one range affect its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Ranges are edited independently.
    #[default]
    Off,
    /// Facing boundaries within [`SNAP_RANGE`] follow the dragged one.
    Snap,
    /// Overlapping ranges get crossfade curves recomputed on every edit.
    Crossfade,
}

/// Converts between interaction coordinates along an axis of some pixel
/// length and MIDI velocities.
#[derive(Debug, Clone, Copy)]
pub struct VelocityAxis {
    scale: f32,
}

impl VelocityAxis {
    /// An axis of the given length. The length must be positive.
    pub fn new(length: f32) -> VelocityAxis {
        debug_assert!(length > 0.0);
        VelocityAxis {
            scale: length / VELOCITY_MAX as f32,
        }
    }

    /// The velocity under a coordinate. Out-of-range coordinates clamp to
    /// the ends of the axis rather than failing.
    pub fn velocity(&self, coord: f32) -> u8 {
        ((coord / self.scale).round() as i32).clamp(0, VELOCITY_MAX as i32) as u8
    }

    /// The coordinate of a velocity.
    pub fn coord(&self, velocity: u8) -> f32 {
        velocity as f32 * self.scale
    }
}

/// Moves whichever boundary of the range the velocity indicates: at or
/// below `lovel` moves `lovel`, at or above `hivel` moves `hivel`, and a
/// strictly interior velocity moves the numerically closer boundary.
/// Equal distances move `hivel`.
pub fn move_boundary(range: &mut VelocityRange, velocity: u8) -> Boundary {
    if velocity <= range.lovel() {
        range.set_lovel(velocity);
        Boundary::Lovel
    } else if velocity >= range.hivel() {
        range.set_hivel(velocity);
        Boundary::Hivel
    } else {
        let lodiff = velocity - range.lovel();
        let hidiff = range.hivel() - velocity;
        if lodiff < hidiff {
            range.set_lovel(velocity);
            Boundary::Lovel
        } else {
            range.set_hivel(velocity);
            Boundary::Hivel
        }
    }
}

/// Pulls every sibling's facing boundary onto the boundary just moved on
/// `ranges[moved]`, when it lies within [`SNAP_RANGE`]. Keeps adjacent
/// ranges contiguous without the user pixel-hunting.
fn snap_siblings(instrument: &mut Instrument, moved: usize, boundary: Boundary) {
    let ranges = instrument.ranges_mut();
    match boundary {
        Boundary::Lovel => {
            let value = ranges[moved].lovel();
            for (i, other) in ranges.iter_mut().enumerate() {
                if i != moved && value.abs_diff(other.hivel()) <= SNAP_RANGE {
                    other.set_hivel(value);
                }
            }
        }
        Boundary::Hivel => {
            let value = ranges[moved].hivel();
            for (i, other) in ranges.iter_mut().enumerate() {
                if i != moved && value.abs_diff(other.lovel()) <= SNAP_RANGE {
                    other.set_lovel(value);
                }
            }
        }
    }
}

/// One drag event on the range at `index`: move a boundary to `velocity`,
/// then apply the instrument's blend mode to the siblings.
pub fn drag(instrument: &mut Instrument, index: usize, velocity: u8, blend: Blend) -> Boundary {
    let boundary = move_boundary(&mut instrument.ranges_mut()[index], velocity);
    match blend {
        Blend::Snap => snap_siblings(instrument, index, boundary),
        Blend::Crossfade => crossfade::apply(instrument),
        Blend::Off => {}
    }
    boundary
}

/// Switches an instrument's blend mode. The modes are mutually exclusive:
/// entering snap (or turning blending off) drops any crossfade curves,
/// entering crossfade computes them. Returns the new mode.
pub fn set_blend(instrument: &mut Instrument, current: Blend, new: Blend) -> Blend {
    if current != new {
        match new {
            Blend::Crossfade => crossfade::apply(instrument),
            Blend::Snap | Blend::Off => crossfade::clear(instrument),
        }
    }
    new
}

/// Distributes the instrument's ranges evenly across the velocity axis, in
/// their current display order, then recomputes crossfade curves.
pub fn spread(instrument: &mut Instrument) {
    let count = instrument.len();
    if count == 0 {
        return;
    }
    let step = VELOCITY_MAX as f64 / count as f64;
    for (i, range) in instrument.ranges_mut().iter_mut().enumerate() {
        let lovel = (i as f64 * step).round() as u8;
        let hivel = ((i + 1) as f64 * step).round() as u8;
        range.set_window(lovel, hivel);
    }
    crossfade::apply(instrument);
}
