//! Output-stream assembler

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::{NOTE_RANGE_ENTRY_SIZE, SAMPLE_OFFSET_WORDS};
use crate::encoder::EncodedStreams;
use crate::errors::GlobalDiagnostic;
use crate::instruments::CompiledInstruments;
use crate::note_table::NoteTable;
use crate::report::Report;

/// Assemble the final artifact.  All multi-byte fields are big-endian.
///
/// Layout:
///   i16          instrument count - 1
///   11 x u16     per instrument record
///   u16          per-channel stream size in bytes
///   u16          note-range table size in bytes
///   4 bytes      per note range: min note, span, offset * 128
///   u16          restart delta (bytes to rewind at the stream end)
///   u16 words    channel streams, in the driver's reversed channel order
pub fn song_data(
    instruments: &CompiledInstruments,
    table: &NoteTable,
    streams: &EncodedStreams,
    report: &mut Report,
) -> Vec<u8> {
    let mut out = Vec::new();

    let n_instruments = instruments.records.len() as i16 - 1;
    out.extend_from_slice(&n_instruments.to_be_bytes());

    for record in &instruments.records {
        for w in record.words {
            out.extend_from_slice(&w.to_be_bytes());
        }
    }

    let channel_bytes = streams.total_ticks() * 2;
    if channel_bytes > u16::MAX.into() {
        report.global_error(GlobalDiagnostic::StreamTooLong(channel_bytes as usize));
    }
    out.extend_from_slice(&(channel_bytes as u16).to_be_bytes());

    let range_bytes = (table.ranges().len() * NOTE_RANGE_ENTRY_SIZE) as u16;
    out.extend_from_slice(&range_bytes.to_be_bytes());

    for range in table.ranges() {
        out.push(range.min_note.note_id());
        out.push(range.span());

        let offset_words = u16::from(range.offset) * SAMPLE_OFFSET_WORDS as u16;
        out.extend_from_slice(&offset_words.to_be_bytes());
    }

    // Bytes one channel pointer rewinds when the stream end is reached
    let restart_delta = (streams.total_ticks() - streams.restart_tick) * 2;
    out.extend_from_slice(&(restart_delta as u16).to_be_bytes());

    for channel in streams.channels.iter().rev() {
        for &word in channel {
            out.extend_from_slice(&word.to_be_bytes());
        }
    }

    out
}
