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

//! The in-memory drumkit model.
//!
//! A [`Kit`] holds the fixed 47 percussion instruments; each [`Instrument`]
//! maps sample paths to a [`VelocityRange`] describing when and how loud
//! that sample sounds. All edits flow through the setters here so the model
//! can track whether it has changed since it was last rendered.

use std::path::{Path, PathBuf};

use crate::drums::{self, DrumGroup, DrumPitch};

/// The highest MIDI velocity.
pub const VELOCITY_MAX: u8 = 127;

/// Errors from kit model mutations. Failed operations leave the model
/// untouched.
#[derive(Debug, thiserror::Error)]
pub enum KitError {
    #[error("cannot use \"{0}\": already assigned to this instrument")]
    DuplicateSample(PathBuf),
    #[error("cannot remove \"{0}\": not assigned to this instrument")]
    SampleNotFound(PathBuf),
    #[error("no percussion instrument at pitch {0}")]
    UnknownPitch(u8),
    #[error("no sample range at index {0}")]
    RangeOutOfBounds(usize),
}

/// One point of an amplitude-velocity curve: the gain applied when the
/// instrument is struck at exactly this velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub velocity: u8,
    pub amplitude: f32,
}

impl CurvePoint {
    pub fn new(velocity: u8, amplitude: f32) -> CurvePoint {
        CurvePoint {
            velocity,
            amplitude,
        }
    }
}

/// The velocity window of one sample: the sample is eligible to sound for
/// velocities in `[lovel, hivel]` (inclusive), optionally shaped by an
/// explicit amplitude curve.
///
/// Ranges are only ever created through [`Instrument::attach`], so every
/// field is always initialized and every instance owns its own curve-point
/// list.
#[derive(Debug, Clone)]
pub struct VelocityRange {
    path: PathBuf,
    lovel: u8,
    hivel: u8,
    volume: f64,
    curve_points: Vec<CurvePoint>,
    dirty: bool,
}

impl VelocityRange {
    /// A fresh range spans the whole velocity axis at unity volume with no
    /// explicit curve.
    fn new(path: PathBuf) -> VelocityRange {
        VelocityRange {
            path,
            lovel: 0,
            hivel: VELOCITY_MAX,
            volume: 0.0,
            curve_points: Vec::new(),
            dirty: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lovel(&self) -> u8 {
        self.lovel
    }

    pub fn hivel(&self) -> u8 {
        self.hivel
    }

    /// Volume offset in dB.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// The explicit amplitude curve, in emission order. Empty means plain
    /// on/off behavior over `[lovel, hivel]`.
    pub fn curve_points(&self) -> &[CurvePoint] {
        &self.curve_points
    }

    /// True if any field changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Moves the lower boundary. The value is clamped against `hivel` so
    /// the window can never invert.
    pub fn set_lovel(&mut self, velocity: u8) {
        self.lovel = velocity.min(self.hivel);
        self.dirty = true;
    }

    /// Moves the upper boundary. The value is clamped against `lovel` and
    /// the velocity axis.
    pub fn set_hivel(&mut self, velocity: u8) {
        self.hivel = velocity.clamp(self.lovel, VELOCITY_MAX);
        self.dirty = true;
    }

    /// Replaces both boundaries at once (used by layout operations where
    /// the new window is unrelated to the old one).
    pub fn set_window(&mut self, lovel: u8, hivel: u8) {
        let lovel = lovel.min(VELOCITY_MAX);
        self.lovel = lovel;
        self.hivel = hivel.clamp(lovel, VELOCITY_MAX);
        self.dirty = true;
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        self.dirty = true;
    }

    pub fn set_curve_points(&mut self, points: Vec<CurvePoint>) {
        self.curve_points = points;
        self.dirty = true;
    }

    pub fn clear_curve_points(&mut self) {
        self.curve_points.clear();
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// One percussion instrument: a catalog slot plus the samples assigned to
/// it. Sample paths are unique within an instrument; their order is the
/// order they were assigned (or later rearranged to) and is the order
/// regions are rendered in.
#[derive(Debug, Clone)]
pub struct Instrument {
    pitch: u8,
    id: &'static str,
    name: &'static str,
    note_name: String,
    group: DrumGroup,
    samples: Vec<VelocityRange>,
}

impl Instrument {
    fn new(drum: &DrumPitch) -> Instrument {
        Instrument {
            pitch: drum.pitch,
            id: drum.id,
            name: drum.name,
            note_name: drums::note_name(drum.pitch),
            group: drum.group,
            samples: Vec::new(),
        }
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn note_name(&self) -> &str {
        &self.note_name
    }

    pub fn group(&self) -> DrumGroup {
        self.group
    }

    pub fn has_sample(&self, path: &Path) -> bool {
        self.samples.iter().any(|r| r.path == path)
    }

    /// Assigns a sample to this instrument and returns its fresh range.
    pub fn attach(&mut self, path: PathBuf) -> Result<&mut VelocityRange, KitError> {
        if self.has_sample(&path) {
            return Err(KitError::DuplicateSample(path));
        }
        self.samples.push(VelocityRange::new(path));
        Ok(self
            .samples
            .last_mut()
            .expect("sample was just pushed"))
    }

    /// Removes a sample, destroying its range.
    pub fn detach(&mut self, path: &Path) -> Result<(), KitError> {
        match self.samples.iter().position(|r| r.path == path) {
            Some(index) => {
                self.samples.remove(index);
                Ok(())
            }
            None => Err(KitError::SampleNotFound(path.to_path_buf())),
        }
    }

    pub fn range(&self, path: &Path) -> Option<&VelocityRange> {
        self.samples.iter().find(|r| r.path == path)
    }

    pub fn range_mut(&mut self, path: &Path) -> Option<&mut VelocityRange> {
        self.samples.iter_mut().find(|r| r.path == path)
    }

    pub fn ranges(&self) -> &[VelocityRange] {
        &self.samples
    }

    pub fn ranges_mut(&mut self) -> &mut [VelocityRange] {
        &mut self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Moves a sample one slot earlier in the display/render order.
    pub fn move_up(&mut self, path: &Path) -> Result<(), KitError> {
        match self.samples.iter().position(|r| r.path == path) {
            Some(index) if index > 0 => {
                self.samples.swap(index, index - 1);
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(KitError::SampleNotFound(path.to_path_buf())),
        }
    }

    /// Moves a sample one slot later in the display/render order.
    pub fn move_down(&mut self, path: &Path) -> Result<(), KitError> {
        match self.samples.iter().position(|r| r.path == path) {
            Some(index) if index + 1 < self.samples.len() => {
                self.samples.swap(index, index + 1);
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(KitError::SampleNotFound(path.to_path_buf())),
        }
    }
}

/// A whole drumkit: every catalog slot, in group order, created empty.
/// Slots are never added or removed; only their sample assignments change.
#[derive(Debug, Clone)]
pub struct Kit {
    instruments: Vec<Instrument>,
}

impl Kit {
    pub fn new() -> Kit {
        Kit {
            instruments: drums::iter_by_group().map(Instrument::new).collect(),
        }
    }

    pub fn instrument(&self, pitch: u8) -> Result<&Instrument, KitError> {
        self.instruments
            .iter()
            .find(|i| i.pitch == pitch)
            .ok_or(KitError::UnknownPitch(pitch))
    }

    pub fn instrument_mut(&mut self, pitch: u8) -> Result<&mut Instrument, KitError> {
        self.instruments
            .iter_mut()
            .find(|i| i.pitch == pitch)
            .ok_or(KitError::UnknownPitch(pitch))
    }

    /// Iterates instruments in the fixed group order used for rendering.
    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    /// True if any range changed since the kit was last rendered.
    pub fn is_dirty(&self) -> bool {
        self.instruments
            .iter()
            .any(|i| i.samples.iter().any(|r| r.dirty))
    }

    pub fn clear_dirty(&mut self) {
        for instrument in self.instruments.iter_mut() {
            for range in instrument.samples.iter_mut() {
                range.clear_dirty();
            }
        }
    }
}

impl Default for Kit {
    fn default() -> Kit {
        Kit::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_kit_has_all_slots() {
        let kit = Kit::new();
        assert_eq!(kit.instruments().count(), 47);
        assert!(kit.instrument(38).is_ok());
        assert!(matches!(kit.instrument(20), Err(KitError::UnknownPitch(20))));
        assert!(kit.instruments().all(|i| i.is_empty()));
    }

    #[test]
    fn test_attach_defaults() {
        let mut kit = Kit::new();
        let inst = kit.instrument_mut(38).unwrap();
        let range = inst.attach(PathBuf::from("/samples/snare.wav")).unwrap();

        assert_eq!(range.lovel(), 0);
        assert_eq!(range.hivel(), 127);
        assert_eq!(range.volume(), 0.0);
        assert!(range.curve_points().is_empty());
        assert!(range.is_dirty());
    }

    #[test]
    fn test_attach_duplicate_fails_without_mutation() {
        let mut kit = Kit::new();
        let inst = kit.instrument_mut(38).unwrap();
        inst.attach(PathBuf::from("/samples/snare.wav")).unwrap();

        let result = inst.attach(PathBuf::from("/samples/snare.wav"));
        assert!(matches!(result, Err(KitError::DuplicateSample(_))));
        assert_eq!(inst.len(), 1);
    }

    #[test]
    fn test_detach_missing_fails() {
        let mut kit = Kit::new();
        let inst = kit.instrument_mut(38).unwrap();
        inst.attach(PathBuf::from("/samples/snare.wav")).unwrap();

        let result = inst.detach(Path::new("/samples/other.wav"));
        assert!(matches!(result, Err(KitError::SampleNotFound(_))));
        assert_eq!(inst.len(), 1);

        inst.detach(Path::new("/samples/snare.wav")).unwrap();
        assert!(inst.is_empty());
    }

    #[test]
    fn test_setters_clamp_and_mark_dirty() {
        let mut kit = Kit::new();
        let inst = kit.instrument_mut(38).unwrap();
        let range = inst.attach(PathBuf::from("/samples/snare.wav")).unwrap();
        range.clear_dirty();

        range.set_window(40, 80);
        assert!(range.is_dirty());
        range.clear_dirty();

        // Boundaries can never cross.
        range.set_lovel(100);
        assert_eq!(range.lovel(), 80);
        range.set_hivel(10);
        assert_eq!(range.hivel(), 80);
        assert!(range.is_dirty());

        // An inverted window collapses rather than inverting.
        range.set_window(90, 10);
        assert_eq!((range.lovel(), range.hivel()), (90, 90));
    }

    #[test]
    fn test_independent_curve_points_per_range() {
        let mut kit = Kit::new();
        let inst = kit.instrument_mut(38).unwrap();
        inst.attach(PathBuf::from("/a.wav")).unwrap();
        inst.attach(PathBuf::from("/b.wav")).unwrap();

        inst.range_mut(Path::new("/a.wav"))
            .unwrap()
            .set_curve_points(vec![CurvePoint::new(0, 0.0), CurvePoint::new(64, 0.5)]);

        assert_eq!(inst.range(Path::new("/a.wav")).unwrap().curve_points().len(), 2);
        assert!(inst.range(Path::new("/b.wav")).unwrap().curve_points().is_empty());
    }

    #[test]
    fn test_move_up_down() {
        let mut kit = Kit::new();
        let inst = kit.instrument_mut(38).unwrap();
        inst.attach(PathBuf::from("/a.wav")).unwrap();
        inst.attach(PathBuf::from("/b.wav")).unwrap();
        inst.attach(PathBuf::from("/c.wav")).unwrap();

        inst.move_up(Path::new("/c.wav")).unwrap();
        let order: Vec<&Path> = inst.ranges().iter().map(|r| r.path()).collect();
        assert_eq!(
            order,
            vec![Path::new("/a.wav"), Path::new("/c.wav"), Path::new("/b.wav")]
        );

        // Already first: no-op, not an error.
        inst.move_up(Path::new("/a.wav")).unwrap();
        assert_eq!(inst.ranges()[0].path(), Path::new("/a.wav"));

        inst.move_down(Path::new("/a.wav")).unwrap();
        assert_eq!(inst.ranges()[0].path(), Path::new("/c.wav"));

        assert!(inst.move_up(Path::new("/missing.wav")).is_err());
    }

    #[test]
    fn test_kit_dirty_tracking() {
        let mut kit = Kit::new();
        kit.instrument_mut(36)
            .unwrap()
            .attach(PathBuf::from("/kick.wav"))
            .unwrap();
        assert!(kit.is_dirty());

        kit.clear_dirty();
        assert!(!kit.is_dirty());

        kit.instrument_mut(36)
            .unwrap()
            .range_mut(Path::new("/kick.wav"))
            .unwrap()
            .set_volume(-3.0);
        assert!(kit.is_dirty());
    }
}
