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

//! The YAML representation of a kit sketch.

use std::path::{self, Path, PathBuf};

use serde::Deserialize;

use crate::drums;
use crate::editor::Blend;
use crate::session::EditSession;

use super::ConfigError;

/// A YAML representation of a kit under construction.
#[derive(Debug, Deserialize)]
pub struct Sketch {
    /// An optional display name. Unused by the engine, kept for humans.
    pub name: Option<String>,
    /// The instruments to populate.
    pub instruments: Vec<InstrumentSketch>,
    /// The directory relative sample paths resolve against. Set from the
    /// sketch file's location, not from the YAML itself.
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One instrument entry of a sketch.
#[derive(Debug, Deserialize)]
pub struct InstrumentSketch {
    /// The percussion instrument, as a catalog id (`acoustic_snare`) or a
    /// raw MIDI pitch (`38`).
    pub instrument: InstrumentRef,
    /// The blend mode to enter after the samples are assigned.
    pub blend: Option<BlendSketch>,
    /// Whether to spread the samples evenly over the velocity axis,
    /// overriding any per-sample windows.
    #[serde(default)]
    pub spread: bool,
    /// The samples to assign, in display order.
    pub samples: Vec<SampleSketch>,
}

/// One sample entry of an instrument sketch. Omitted fields keep the
/// defaults a freshly assigned sample gets.
#[derive(Debug, Deserialize)]
pub struct SampleSketch {
    pub file: PathBuf,
    pub lovel: Option<u8>,
    pub hivel: Option<u8>,
    pub volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InstrumentRef {
    Pitch(u8),
    Id(String),
}

impl InstrumentRef {
    fn pitch(&self) -> Result<u8, ConfigError> {
        match self {
            InstrumentRef::Pitch(pitch) => drums::drum(*pitch)
                .map(|d| d.pitch)
                .ok_or_else(|| ConfigError::UnknownInstrument(pitch.to_string())),
            InstrumentRef::Id(id) => drums::drum_by_id(id)
                .map(|d| d.pitch)
                .ok_or_else(|| ConfigError::UnknownInstrument(id.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendSketch {
    Off,
    Snap,
    Crossfade,
}

impl From<BlendSketch> for Blend {
    fn from(blend: BlendSketch) -> Blend {
        match blend {
            BlendSketch::Off => Blend::Off,
            BlendSketch::Snap => Blend::Snap,
            BlendSketch::Crossfade => Blend::Crossfade,
        }
    }
}

impl Sketch {
    pub(super) fn set_base_dir(&mut self, dir: &Path) {
        self.base_dir = dir.to_path_buf();
    }

    /// Plays the sketch into a session: assigns every sample, applies the
    /// per-sample windows and volumes, then the spread and blend settings.
    pub fn apply(&self, session: &EditSession) -> Result<(), ConfigError> {
        for instrument in &self.instruments {
            let pitch = instrument.instrument.pitch()?;
            for sample in &instrument.samples {
                let file = path::absolute(self.base_dir.join(&sample.file))?;
                session.attach_sample(pitch, file.clone())?;
                if sample.lovel.is_some() || sample.hivel.is_some() {
                    session.set_window(
                        pitch,
                        &file,
                        sample.lovel.unwrap_or(0),
                        sample.hivel.unwrap_or(crate::kit::VELOCITY_MAX),
                    )?;
                }
                if let Some(volume) = sample.volume {
                    session.set_volume(pitch, &file, volume)?;
                }
            }
            if instrument.spread {
                session.spread(pitch)?;
            }
            if let Some(blend) = instrument.blend {
                session.set_blend(pitch, blend.into())?;
            }
        }
        Ok(())
    }
}
