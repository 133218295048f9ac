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

//! The General MIDI percussion catalog.
//!
//! A drumkit always has the same 47 pitch slots (GM percussion, pitches
//! 35-81). Only the samples assigned to each slot ever change. The group
//! ordering defined here is the order instruments appear in a rendered
//! .sfz file, regardless of the order samples were assigned.

/// SFZ polyphony group shared by all hi-hat articulations, so that e.g. a
/// closed hi-hat chokes a ringing open hi-hat.
pub const HIHAT_CHOKE_GROUP: u8 = 88;

/// The broad family a percussion pitch belongs to. Families determine
/// the presentation and serialization order of the kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumGroup {
    Kick,
    Snare,
    HiHat,
    Tom,
    Cymbal,
    Percussion,
}

impl DrumGroup {
    pub fn name(&self) -> &'static str {
        match self {
            DrumGroup::Kick => "Kick",
            DrumGroup::Snare => "Snare",
            DrumGroup::HiHat => "Hi-Hat",
            DrumGroup::Tom => "Tom",
            DrumGroup::Cymbal => "Cymbal",
            DrumGroup::Percussion => "Percussion",
        }
    }
}

/// Presentation/serialization order of the groups.
const GROUP_ORDER: [DrumGroup; 6] = [
    DrumGroup::Kick,
    DrumGroup::Snare,
    DrumGroup::HiHat,
    DrumGroup::Tom,
    DrumGroup::Cymbal,
    DrumGroup::Percussion,
];

/// One slot in the percussion catalog.
#[derive(Debug, Clone, Copy)]
pub struct DrumPitch {
    /// The MIDI pitch (35-81).
    pub pitch: u8,
    /// A stable snake_case identifier, usable in sketch files.
    pub id: &'static str,
    /// The human-readable GM instrument name.
    pub name: &'static str,
    /// The family this pitch belongs to.
    pub group: DrumGroup,
}

/// The full GM percussion map, ascending by pitch.
pub const DRUM_PITCHES: [DrumPitch; 47] = [
    DrumPitch { pitch: 35, id: "acoustic_bass_drum", name: "Acoustic Bass Drum", group: DrumGroup::Kick },
    DrumPitch { pitch: 36, id: "bass_drum_1", name: "Bass Drum 1", group: DrumGroup::Kick },
    DrumPitch { pitch: 37, id: "side_stick", name: "Side Stick", group: DrumGroup::Snare },
    DrumPitch { pitch: 38, id: "acoustic_snare", name: "Acoustic Snare", group: DrumGroup::Snare },
    DrumPitch { pitch: 39, id: "hand_clap", name: "Hand Clap", group: DrumGroup::Snare },
    DrumPitch { pitch: 40, id: "electric_snare", name: "Electric Snare", group: DrumGroup::Snare },
    DrumPitch { pitch: 41, id: "low_floor_tom", name: "Low Floor Tom", group: DrumGroup::Tom },
    DrumPitch { pitch: 42, id: "closed_hi_hat", name: "Closed Hi-Hat", group: DrumGroup::HiHat },
    DrumPitch { pitch: 43, id: "high_floor_tom", name: "High Floor Tom", group: DrumGroup::Tom },
    DrumPitch { pitch: 44, id: "pedal_hi_hat", name: "Pedal Hi-Hat", group: DrumGroup::HiHat },
    DrumPitch { pitch: 45, id: "low_tom", name: "Low Tom", group: DrumGroup::Tom },
    DrumPitch { pitch: 46, id: "open_hi_hat", name: "Open Hi-Hat", group: DrumGroup::HiHat },
    DrumPitch { pitch: 47, id: "low_mid_tom", name: "Low-Mid Tom", group: DrumGroup::Tom },
    DrumPitch { pitch: 48, id: "hi_mid_tom", name: "Hi-Mid Tom", group: DrumGroup::Tom },
    DrumPitch { pitch: 49, id: "crash_cymbal_1", name: "Crash Cymbal 1", group: DrumGroup::Cymbal },
    DrumPitch { pitch: 50, id: "high_tom", name: "High Tom", group: DrumGroup::Tom },
    DrumPitch { pitch: 51, id: "ride_cymbal_1", name: "Ride Cymbal 1", group: DrumGroup::Cymbal },
    DrumPitch { pitch: 52, id: "chinese_cymbal", name: "Chinese Cymbal", group: DrumGroup::Cymbal },
    DrumPitch { pitch: 53, id: "ride_bell", name: "Ride Bell", group: DrumGroup::Cymbal },
    DrumPitch { pitch: 54, id: "tambourine", name: "Tambourine", group: DrumGroup::Percussion },
    DrumPitch { pitch: 55, id: "splash_cymbal", name: "Splash Cymbal", group: DrumGroup::Cymbal },
    DrumPitch { pitch: 56, id: "cowbell", name: "Cowbell", group: DrumGroup::Percussion },
    DrumPitch { pitch: 57, id: "crash_cymbal_2", name: "Crash Cymbal 2", group: DrumGroup::Cymbal },
    DrumPitch { pitch: 58, id: "vibraslap", name: "Vibraslap", group: DrumGroup::Percussion },
    DrumPitch { pitch: 59, id: "ride_cymbal_2", name: "Ride Cymbal 2", group: DrumGroup::Cymbal },
    DrumPitch { pitch: 60, id: "hi_bongo", name: "Hi Bongo", group: DrumGroup::Percussion },
    DrumPitch { pitch: 61, id: "low_bongo", name: "Low Bongo", group: DrumGroup::Percussion },
    DrumPitch { pitch: 62, id: "mute_hi_conga", name: "Mute Hi Conga", group: DrumGroup::Percussion },
    DrumPitch { pitch: 63, id: "open_hi_conga", name: "Open Hi Conga", group: DrumGroup::Percussion },
    DrumPitch { pitch: 64, id: "low_conga", name: "Low Conga", group: DrumGroup::Percussion },
    DrumPitch { pitch: 65, id: "high_timbale", name: "High Timbale", group: DrumGroup::Percussion },
    DrumPitch { pitch: 66, id: "low_timbale", name: "Low Timbale", group: DrumGroup::Percussion },
    DrumPitch { pitch: 67, id: "high_agogo", name: "High Agogo", group: DrumGroup::Percussion },
    DrumPitch { pitch: 68, id: "low_agogo", name: "Low Agogo", group: DrumGroup::Percussion },
    DrumPitch { pitch: 69, id: "cabasa", name: "Cabasa", group: DrumGroup::Percussion },
    DrumPitch { pitch: 70, id: "maracas", name: "Maracas", group: DrumGroup::Percussion },
    DrumPitch { pitch: 71, id: "short_whistle", name: "Short Whistle", group: DrumGroup::Percussion },
    DrumPitch { pitch: 72, id: "long_whistle", name: "Long Whistle", group: DrumGroup::Percussion },
    DrumPitch { pitch: 73, id: "short_guiro", name: "Short Guiro", group: DrumGroup::Percussion },
    DrumPitch { pitch: 74, id: "long_guiro", name: "Long Guiro", group: DrumGroup::Percussion },
    DrumPitch { pitch: 75, id: "claves", name: "Claves", group: DrumGroup::Percussion },
    DrumPitch { pitch: 76, id: "hi_wood_block", name: "Hi Wood Block", group: DrumGroup::Percussion },
    DrumPitch { pitch: 77, id: "low_wood_block", name: "Low Wood Block", group: DrumGroup::Percussion },
    DrumPitch { pitch: 78, id: "mute_cuica", name: "Mute Cuica", group: DrumGroup::Percussion },
    DrumPitch { pitch: 79, id: "open_cuica", name: "Open Cuica", group: DrumGroup::Percussion },
    DrumPitch { pitch: 80, id: "mute_triangle", name: "Mute Triangle", group: DrumGroup::Percussion },
    DrumPitch { pitch: 81, id: "open_triangle", name: "Open Triangle", group: DrumGroup::Percussion },
];

/// Looks up a catalog entry by MIDI pitch.
pub fn drum(pitch: u8) -> Option<&'static DrumPitch> {
    DRUM_PITCHES.iter().find(|d| d.pitch == pitch)
}

/// Looks up a catalog entry by its snake_case identifier.
pub fn drum_by_id(id: &str) -> Option<&'static DrumPitch> {
    DRUM_PITCHES.iter().find(|d| d.id == id)
}

/// Iterates the catalog in group order: kicks, snares, hi-hats, toms,
/// cymbals, then auxiliary percussion, ascending by pitch within a group.
pub fn iter_by_group() -> impl Iterator<Item = &'static DrumPitch> {
    GROUP_ORDER
        .iter()
        .flat_map(|group| DRUM_PITCHES.iter().filter(move |d| d.group == *group))
}

/// The note name of a MIDI pitch in scientific pitch notation (C4 = 60).
pub fn note_name(pitch: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let octave = (pitch / 12) as i8 - 1;
    format!("{}{}", NAMES[(pitch % 12) as usize], octave)
}
