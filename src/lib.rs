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

//! A drumkit .sfz sketching engine: samples assigned to velocity ranges
//! within General MIDI percussion instruments, crossfade curves where
//! ranges overlap, and a renderer for the .sfz subset that carries it all.

pub mod config;
pub mod crossfade;
pub mod drums;
pub mod editor;
pub mod kit;
pub mod session;
pub mod sfz;
