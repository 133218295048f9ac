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

//! Rendering a [`crate::kit::Kit`] to the .sfz subset kitbash writes, and
//! reading that subset back.
//!
//! The writer omits every opcode that matches its default (`lovel=0`,
//! `hivel=127`, `volume=0.00`); the reader reconstructs those defaults, so
//! render → parse → render is byte-identical. The reader is deliberately
//! not a general SFZ parser: it accepts exactly the dialect the writer
//! produces and fails loudly on anything else.

mod reader;
mod writer;

pub use reader::{load_kit, parse_kit, SfzError};
pub use writer::{render, write_kit};
