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

//! Renders a kit to .sfz text.

use std::fmt;
use std::io;

use crate::drums::{DrumGroup, HIHAT_CHOKE_GROUP};
use crate::kit::{Kit, VELOCITY_MAX};

/// Renders the kit to .sfz text. Instruments appear in the fixed pitch
/// group order; instruments with no samples are omitted entirely, as is
/// every opcode whose value matches the player's default.
pub fn render(kit: &Kit) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_into(kit, &mut out);
    out
}

/// Renders the kit to an output stream.
pub fn write_kit<W: io::Write>(kit: &Kit, out: &mut W) -> io::Result<()> {
    out.write_all(render(kit).as_bytes())
}

fn render_into(kit: &Kit, out: &mut impl fmt::Write) -> fmt::Result {
    out.write_str("<global>\nloop_mode=no_loop\nampeg_attack=0.001\n\n")?;

    for instrument in kit.instruments() {
        if instrument.is_empty() {
            continue;
        }
        writeln!(
            out,
            "// \"{}\" ({})",
            instrument.name(),
            instrument.note_name()
        )?;
        writeln!(out, "<group>\nkey={}", instrument.pitch())?;
        if instrument.group() == DrumGroup::HiHat {
            // Hi-hat articulations choke each other.
            writeln!(out, "group={}", HIHAT_CHOKE_GROUP)?;
            writeln!(out, "off_by={}", HIHAT_CHOKE_GROUP)?;
        }
        out.write_str("\n")?;

        for range in instrument.ranges() {
            out.write_str("<region>\n")?;
            writeln!(out, "sample={}", range.path().display())?;
            if range.volume() != 0.0 {
                writeln!(out, "volume={:.2}", range.volume())?;
            }
            if range.lovel() > 0 {
                writeln!(out, "lovel={}", range.lovel())?;
            }
            if range.hivel() < VELOCITY_MAX {
                writeln!(out, "hivel={}", range.hivel())?;
            }
            for point in range.curve_points() {
                writeln!(out, "amp_velcurve_{}={:.1}", point.velocity, point.amplitude)?;
            }
            out.write_str("\n")?;
        }
        out.write_str("\n")?;
    }
    Ok(())
}
