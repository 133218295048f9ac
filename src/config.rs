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

//! YAML sketch files: a declarative description of a kit that kitbash
//! turns into a live editing session.

use std::fs;
use std::path::Path;

use crate::kit::KitError;

mod sketch;

pub use sketch::{InstrumentSketch, SampleSketch, Sketch};

/// Errors from reading or applying a sketch file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown instrument \"{0}\"")]
    UnknownInstrument(String),
    #[error(transparent)]
    Kit(#[from] KitError),
    #[error(transparent)]
    Yaml(#[from] serde_yml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses a sketch from a YAML file. Relative sample paths in the sketch
/// resolve against the file's parent directory.
pub fn load_sketch(path: &Path) -> Result<Sketch, ConfigError> {
    let mut sketch: Sketch = serde_yml::from_str(&fs::read_to_string(path)?)?;
    if let Some(dir) = path.parent() {
        sketch.set_base_dir(dir);
    }
    Ok(sketch)
}
