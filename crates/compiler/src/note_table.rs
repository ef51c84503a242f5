//! Note-identifier table builder
//!
//! Every (instrument, sample-offset, note) triple the simulation can
//! trigger gets a dense integer id; the driver indexes its per-note data
//! with them at playback time.

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::{N_INSTRUMENT_SLOTS, NOTE_ID_TABLE_SIZE};
use crate::errors::{Diagnostic, GlobalDiagnostic};
use crate::notes::Note;
use crate::report::{Report, RowPos};
use crate::simulator::Simulation;

use std::collections::HashMap;

/// One contiguous run of notes sharing an (instrument, offset) pair.
///
/// Owns the id block `[base, base + span)` in table order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NoteRange {
    pub min_note: Note,
    pub max_note: Note,
    pub offset: u8,
}

impl NoteRange {
    pub fn span(&self) -> u8 {
        self.max_note.note_id() - self.min_note.note_id() + 1
    }
}

pub struct NoteTable {
    ranges: Vec<NoteRange>,
    ids: HashMap<(u8, u8, Note), u16>,
    instrument_order: Vec<u8>,
    trigger_counts: [u32; N_INSTRUMENT_SLOTS],
    id_count: usize,
}

impl NoteTable {
    pub fn ranges(&self) -> &[NoteRange] {
        &self.ranges
    }

    /// Used instruments, most-triggered first.
    pub fn instrument_order(&self) -> &[u8] {
        &self.instrument_order
    }

    pub fn trigger_count(&self, instrument: u8) -> u32 {
        self.trigger_counts[usize::from(instrument)]
    }

    pub fn id_count(&self) -> usize {
        self.id_count
    }

    pub fn note_id(&self, instrument: u8, offset: u8, note: Note) -> Option<u16> {
        self.ids.get(&(instrument, offset, note)).copied()
    }
}

/// Resolve a trigger tick's period to a table note.
///
/// A retrigger row after a slide can fire with an off-table period; that is
/// reported once and the nearest table note stands in, so the table builder
/// and the encoder always agree.
pub(crate) fn trigger_note(period: u16, report: &mut Report, pos: RowPos) -> Note {
    match Note::from_exact_period(period) {
        Some(n) => n,
        None => {
            report.row_error(Diagnostic::TriggerPeriodNotInTable(period), pos);
            Note::nearest_at_or_below(period).unwrap_or(Note::MIN)
        }
    }
}

pub fn build_note_table(sim: &Simulation, report: &mut Report) -> NoteTable {
    let mut trigger_counts = [0; N_INSTRUMENT_SLOTS];
    let mut min_max: HashMap<(u8, u8), (Note, Note)> = HashMap::new();

    for (t, stream) in sim.channels.iter().enumerate() {
        for (i, &instrument) in stream.trigger.iter().enumerate() {
            if instrument == 0 {
                continue;
            }
            trigger_counts[usize::from(instrument)] += 1;

            let (pattern, row) = sim.trace[i];
            let note = trigger_note(
                stream.period[i],
                report,
                RowPos {
                    pattern,
                    channel: t as u8,
                    row,
                },
            );

            min_max
                .entry((instrument, stream.offset[i]))
                .and_modify(|(min, max)| {
                    *min = note.min(*min);
                    *max = note.max(*max);
                })
                .or_insert((note, note));
        }
    }

    let mut instrument_order: Vec<u8> = (0..N_INSTRUMENT_SLOTS as u8)
        .filter(|&i| trigger_counts[usize::from(i)] != 0)
        .collect();

    // Most-used instruments take the lowest id block.  The sort is stable,
    // so equal counts keep the original instrument order and the output
    // stays deterministic.
    instrument_order.sort_by_key(|&i| std::cmp::Reverse(trigger_counts[usize::from(i)]));

    let mut ranges = Vec::new();
    let mut ids = HashMap::new();
    let mut next_id: usize = 0;

    for &instrument in &instrument_order {
        if !min_max.contains_key(&(instrument, 0)) {
            // A degenerate offset-0 range keeps the range and instrument
            // record tables aligned for instruments that only ever play
            // with an offset.
            ranges.push(NoteRange {
                min_note: Note::MIN,
                max_note: Note::MIN,
                offset: 0,
            });
            next_id += 1;
        }

        for offset in 0..=u8::MAX {
            if let Some(&(min_note, max_note)) = min_max.get(&(instrument, offset)) {
                ranges.push(NoteRange {
                    min_note,
                    max_note,
                    offset,
                });

                for note in (min_note.note_id()..=max_note.note_id()).filter_map(Note::try_new) {
                    ids.insert((instrument, offset, note), next_id as u16);
                    next_id += 1;
                }
            }
        }
    }

    if next_id > NOTE_ID_TABLE_SIZE {
        report.global_error(GlobalDiagnostic::TooManyNoteIds(next_id));
    }

    NoteTable {
        ranges,
        ids,
        instrument_order,
        trigger_counts,
        id_count: next_id,
    }
}
