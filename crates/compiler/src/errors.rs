//! A single location for all of the errors in the compiler

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::NOTE_ID_TABLE_SIZE;
use crate::report::RowPos;

use std::fmt::Display;

#[derive(Debug)]
pub enum ModuleError {
    UnexpectedEof(&'static str),
    SongLengthOutOfRange(u8),
}

/// Structural failures.  No artifact can be produced after one of these.
#[derive(Debug)]
pub enum SongError {
    Module(ModuleError),

    // Effect commands outside the driver's subset cannot be approximated
    UnsupportedEffect { command: u8, pos: RowPos },
}

/// Recoverable per-row conditions.
///
/// Each is reported once per (diagnostic, location) and simulation continues
/// with a deterministic fallback value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    UnsupportedExtEffect(u8),

    BreakOutsidePattern,
    JumpOutsideSong(u8),

    InstrumentOutOfRange(u8),
    InstrumentChangeOnTonePortamento,

    ArpeggioAfterSlide,
    ArpeggioNoteOutOfRange,

    PortamentoNoSource,
    TonePortamentoNoSource,
    TonePortamentoNoTarget,
    TonePortamentoNoSpeed,

    OffsetRecallWithNoValue,
    OffsetPastSampleEnd,

    VolumeOutOfRange(u8),

    TriggerPeriodNotInTable(u16),

    SlideOutOfRange { from: i32, to: i32 },
    UnsupportedSlideValue,
}

/// Recoverable conditions with no pattern location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GlobalDiagnostic {
    TooManyNoteIds(usize),
    RepeatNotAtEnd(u8),
    CouldNotParseParameters(u8),
    StreamTooLong(usize),
}

// From Traits
// ===========

impl From<ModuleError> for SongError {
    fn from(e: ModuleError) -> Self {
        Self::Module(e)
    }
}

// Display
// =======

impl Display for ModuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEof(s) => write!(f, "Unexpected end of file in {}", s),
            Self::SongLengthOutOfRange(l) => write!(f, "Song length out of range: {}", l),
        }
    }
}

impl Display for SongError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Module(e) => e.fmt(f),
            Self::UnsupportedEffect { command, pos } => {
                write!(f, "Unsupported command {:X} in {}", command, pos)
            }
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedExtEffect(c) => write!(f, "Unsupported command E{:X}", c),

            Self::BreakOutsidePattern => write!(f, "Break to position outside pattern"),
            Self::JumpOutsideSong(p) => write!(f, "Jump to position {} outside song", p),

            Self::InstrumentOutOfRange(i) => write!(f, "Instrument {} out of range", i),
            Self::InstrumentChangeOnTonePortamento => {
                write!(f, "Instrument change on toneportamento")
            }

            Self::ArpeggioAfterSlide => write!(f, "Arpeggio after slide"),
            Self::ArpeggioNoteOutOfRange => write!(f, "Arpeggio note out of range"),

            Self::PortamentoNoSource => write!(f, "Portamento with no source"),
            Self::TonePortamentoNoSource => write!(f, "Toneportamento with no source"),
            Self::TonePortamentoNoTarget => write!(f, "Toneportamento with no target"),
            Self::TonePortamentoNoSpeed => write!(f, "Toneportamento with no speed"),

            Self::OffsetRecallWithNoValue => {
                write!(f, "Sample offset recall with no previous value")
            }
            Self::OffsetPastSampleEnd => write!(f, "Sample offset beyond sample end"),

            Self::VolumeOutOfRange(v) => write!(f, "Volume {} out of range", v),

            Self::TriggerPeriodNotInTable(p) => {
                write!(f, "Note trigger with period {} not in period table", p)
            }

            Self::SlideOutOfRange { from, to } => {
                write!(f, "Slide value out of range (from {} to {})", from, to)
            }
            Self::UnsupportedSlideValue => write!(f, "Unsupported slide value"),
        }
    }
}

impl Display for GlobalDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyNoteIds(n) => {
                write!(f, "Generated {} note IDs, table capacity is {}", n, NOTE_ID_TABLE_SIZE)
            }
            Self::RepeatNotAtEnd(i) => write!(f, "Instrument {} repeat is not at end", i),
            Self::CouldNotParseParameters(i) => {
                write!(f, "Could not parse parameters for instrument {}", i)
            }
            Self::StreamTooLong(b) => {
                write!(f, "Stream length exceeds header field ({} bytes)", b)
            }
        }
    }
}
