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

//! Parses the .sfz dialect the writer emits back into a [`Kit`].
//!
//! Omitted opcodes are reconstructed as their defaults (`lovel=0`,
//! `hivel=127`, `volume=0.0`, no curve). The parser builds a fresh kit
//! and only hands it over on full success, so a malformed file can never
//! corrupt a kit the caller already holds.

use std::fs;
use std::path::{Path, PathBuf};

use pest::Parser;
use pest_derive::Parser;

use crate::kit::{CurvePoint, Kit, KitError, VELOCITY_MAX};

#[derive(Parser)]
#[grammar = "src/sfz/grammar.pest"]
struct SfzParser;

/// Errors from reading a kit .sfz file.
#[derive(Debug, thiserror::Error)]
pub enum SfzError {
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("unsupported header <{0}>")]
    UnknownHeader(String),
    #[error("unknown opcode \"{opcode}\" in <{section}> at line {line}")]
    UnknownOpcode {
        section: String,
        opcode: String,
        line: usize,
    },
    #[error("invalid value \"{value}\" for {opcode} at line {line}")]
    Value {
        opcode: String,
        value: String,
        line: usize,
    },
    #[error("lovel {lovel} exceeds hivel {hivel}")]
    InvertedWindow { lovel: u8, hivel: u8 },
    #[error("<group> without a key")]
    GroupWithoutKey,
    #[error("<region> without a preceding <group> key")]
    RegionWithoutKey,
    #[error("<region> without a sample")]
    MissingSample,
    #[error(transparent)]
    Kit(#[from] KitError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One `name=value` line, with its source line for error reporting.
struct Opcode {
    name: String,
    value: String,
    line: usize,
}

impl Opcode {
    /// An invalid-value error pointing at this opcode's line.
    fn bad_value(&self, value: &str) -> SfzError {
        SfzError::Value {
            opcode: self.name.clone(),
            value: value.to_string(),
            line: self.line,
        }
    }

    fn unknown_in(&self, section: &str) -> SfzError {
        SfzError::UnknownOpcode {
            section: section.to_string(),
            opcode: self.name.clone(),
            line: self.line,
        }
    }

    fn velocity(&self, value: &str) -> Result<u8, SfzError> {
        value
            .parse::<u8>()
            .ok()
            .filter(|v| *v <= VELOCITY_MAX)
            .ok_or_else(|| self.bad_value(value))
    }
}

/// Reads a kit from a file on disk.
pub fn load_kit(path: &Path) -> Result<Kit, SfzError> {
    parse_kit(&fs::read_to_string(path)?)
}

/// Parses a kit from .sfz text.
pub fn parse_kit(content: &str) -> Result<Kit, SfzError> {
    let pairs = SfzParser::parse(Rule::file, content).map_err(|e| {
        let (line, column) = match e.line_col {
            pest::error::LineColLocation::Pos((line, column)) => (line, column),
            pest::error::LineColLocation::Span((line, column), _) => (line, column),
        };
        SfzError::Parse {
            line,
            column,
            message: e.variant.message().to_string(),
        }
    })?;

    let mut kit = Kit::new();
    let mut current_key: Option<u8> = None;

    for file in pairs {
        for section in file.into_inner() {
            if section.as_rule() != Rule::section {
                continue;
            }
            let mut inner = section.into_inner();
            let header = match inner.next().and_then(|h| h.into_inner().next()) {
                Some(name) => name.as_str().to_string(),
                None => continue,
            };
            let opcodes: Vec<Opcode> = inner
                .filter(|p| p.as_rule() == Rule::opcode)
                .map(|opcode| {
                    let (line, _) = opcode.as_span().start_pos().line_col();
                    let mut parts = opcode.into_inner();
                    let name = parts.next().map(|p| p.as_str().to_string());
                    let value = parts.next().map(|p| p.as_str().to_string());
                    Opcode {
                        name: name.unwrap_or_default(),
                        value: value.unwrap_or_default(),
                        line,
                    }
                })
                .collect();

            match header.as_str() {
                "global" => parse_global(&opcodes)?,
                "group" => current_key = Some(parse_group(&opcodes)?),
                "region" => parse_region(&mut kit, current_key, &opcodes)?,
                other => return Err(SfzError::UnknownHeader(other.to_string())),
            }
        }
    }

    // Freshly loaded state is, by definition, the persisted state.
    kit.clear_dirty();
    Ok(kit)
}

fn parse_global(opcodes: &[Opcode]) -> Result<(), SfzError> {
    for op in opcodes {
        match op.name.as_str() {
            "loop_mode" => {
                if op.value != "no_loop" && op.value != "one_shot" {
                    return Err(op.bad_value(&op.value));
                }
            }
            "ampeg_attack" => {
                op.value
                    .parse::<f64>()
                    .map_err(|_| op.bad_value(&op.value))?;
            }
            _ => return Err(op.unknown_in("global")),
        }
    }
    Ok(())
}

fn parse_group(opcodes: &[Opcode]) -> Result<u8, SfzError> {
    let mut key = None;
    for op in opcodes {
        match op.name.as_str() {
            "key" => key = Some(op.velocity(&op.value)?),
            // Polyphony/choke groups are re-derived from the pitch when
            // rendering; only validate them here.
            "group" | "off_by" => {
                op.value
                    .parse::<u8>()
                    .map_err(|_| op.bad_value(&op.value))?;
            }
            _ => return Err(op.unknown_in("group")),
        }
    }
    key.ok_or(SfzError::GroupWithoutKey)
}

fn parse_region(
    kit: &mut Kit,
    current_key: Option<u8>,
    opcodes: &[Opcode],
) -> Result<(), SfzError> {
    let key = current_key.ok_or(SfzError::RegionWithoutKey)?;

    let mut sample: Option<PathBuf> = None;
    let mut volume: Option<f64> = None;
    let mut lovel: Option<u8> = None;
    let mut hivel: Option<u8> = None;
    let mut curve: Vec<CurvePoint> = Vec::new();

    for op in opcodes {
        match op.name.as_str() {
            "sample" => sample = Some(PathBuf::from(&op.value)),
            "volume" => {
                volume = Some(
                    op.value
                        .parse::<f64>()
                        .map_err(|_| op.bad_value(&op.value))?,
                )
            }
            "lovel" => lovel = Some(op.velocity(&op.value)?),
            "hivel" => hivel = Some(op.velocity(&op.value)?),
            _ => {
                if let Some(velocity) = op.name.strip_prefix("amp_velcurve_") {
                    let velocity = op.velocity(velocity)?;
                    let amplitude = op
                        .value
                        .parse::<f32>()
                        .map_err(|_| op.bad_value(&op.value))?;
                    if !(0.0..=1.0).contains(&amplitude) {
                        return Err(op.bad_value(&op.value));
                    }
                    curve.push(CurvePoint::new(velocity, amplitude));
                } else {
                    return Err(op.unknown_in("region"));
                }
            }
        }
    }

    let sample = sample.ok_or(SfzError::MissingSample)?;
    let lovel = lovel.unwrap_or(0);
    let hivel = hivel.unwrap_or(VELOCITY_MAX);
    if lovel > hivel {
        return Err(SfzError::InvertedWindow { lovel, hivel });
    }

    let range = kit.instrument_mut(key)?.attach(sample)?;
    range.set_window(lovel, hivel);
    if let Some(volume) = volume {
        range.set_volume(volume);
    }
    if !curve.is_empty() {
        range.set_curve_points(curve);
    }
    Ok(())
}
