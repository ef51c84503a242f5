//! Conversion diagnostics and statistics

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::VBLANK_HZ;
use crate::errors::{Diagnostic, GlobalDiagnostic};

use std::collections::HashSet;
use std::fmt::Display;

/// Location of a row event, as printed in diagnostics.
///
/// `pattern` is the pattern index (not the play-order position).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RowPos {
    pub pattern: u8,
    pub channel: u8,
    pub row: u8,
}

impl Display for RowPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pattern {} track {} row {}",
            self.pattern, self.channel, self.row
        )
    }
}

/// Per-instrument usage statistics for the conversion summary.
#[derive(Debug, Copy, Clone)]
pub struct InstrumentStat {
    pub instrument: u8,
    pub triggers: u32,
    pub sample_words: u32,
}

/// Summary counters, filled in as the pipeline stages complete.
#[derive(Debug, Default)]
pub struct Summary {
    pub instruments: Vec<InstrumentStat>,
    pub note_ids: usize,
    pub distinct_words: usize,
    pub music_length: u32,
    pub restart_tick: u32,
    pub instrument_buffer: u32,
}

impl Summary {
    /// Playback duration of one pass over the stream.
    pub fn duration_secs(&self) -> u32 {
        self.music_length / VBLANK_HZ
    }
}

/// Collects every recoverable condition the pipeline hits.
///
/// The library only records; printing is the caller's concern.  Each
/// (diagnostic, location) pair is recorded at most once, mirroring the
/// playback engine's never-abort behaviour without flooding the output
/// when a bad row is revisited every pattern loop.
#[derive(Debug, Default)]
pub struct Report {
    row_diagnostics: Vec<(Diagnostic, RowPos)>,
    seen_rows: HashSet<(Diagnostic, RowPos)>,

    global_diagnostics: Vec<GlobalDiagnostic>,
    seen_globals: HashSet<GlobalDiagnostic>,

    pub summary: Summary,
}

impl Report {
    pub fn new() -> Report {
        Report::default()
    }

    pub fn row_error(&mut self, d: Diagnostic, pos: RowPos) {
        if self.seen_rows.insert((d, pos)) {
            self.row_diagnostics.push((d, pos));
        }
    }

    pub fn global_error(&mut self, d: GlobalDiagnostic) {
        if self.seen_globals.insert(d) {
            self.global_diagnostics.push(d);
        }
    }

    pub fn row_diagnostics(&self) -> &[(Diagnostic, RowPos)] {
        &self.row_diagnostics
    }

    pub fn global_diagnostics(&self) -> &[GlobalDiagnostic] {
        &self.global_diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.row_diagnostics.is_empty() || !self.global_diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.row_diagnostics.len() + self.global_diagnostics.len()
    }

    /// Diagnostic lines in the order the conditions were first hit.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        let rows = self
            .row_diagnostics
            .iter()
            .map(|(d, pos)| format!("{} in {}", d, pos));
        let globals = self.global_diagnostics.iter().map(|d| d.to_string());

        rows.chain(globals)
    }
}
