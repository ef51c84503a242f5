// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::*;
use compiler::errors::{Diagnostic, GlobalDiagnostic};
use compiler::notes::Note;

#[test]
fn note_with_instrument_triggers_once() {
    let (sim, _) = ModuleBuilder::new()
        .instrument(1, 64, 64)
        .row(0, 0, 0, 428, 1, 0, 0)
        .simulate();

    assert_eq!(&sim.channels[0].trigger[..6], &[1, 0, 0, 0, 0, 0]);
}

#[test]
fn instrument_without_note_only_latches() {
    let (sim, _) = ModuleBuilder::new()
        .instrument(1, 48, 64)
        .row(0, 0, 0, 0, 1, 0, 0)
        .row(0, 1, 0, 428, 0, 0, 0)
        .simulate();

    // Row 0 reloads the volume but does not fire
    assert_eq!(&sim.channels[0].trigger[..6], &[0; 6]);
    assert_eq!(&sim.channels[0].volume[..6], &[48; 6]);

    // The latched instrument fires on the bare note
    assert_eq!(&sim.channels[0].trigger[6..12], &[1, 0, 0, 0, 0, 0]);
}

#[test]
fn retrigger_fires_every_n_ticks() {
    let (sim, _) = ModuleBuilder::new()
        .instrument(1, 64, 64)
        .row(0, 0, 0, 428, 1, 0, 0)
        .row(0, 1, 0, 0, 0, 0xe, 0x92)
        .simulate();

    assert_eq!(&sim.channels[0].trigger[6..12], &[1, 0, 1, 0, 1, 0]);
}

#[test]
fn instrument_change_on_tone_portamento_is_reported() {
    let (sim, report) = ModuleBuilder::new()
        .instrument(1, 64, 64)
        .instrument(2, 64, 64)
        .row(0, 0, 0, 428, 1, 0, 0)
        .row(0, 1, 0, 404, 2, 0x3, 4)
        .simulate();

    assert_reported(
        &report,
        Diagnostic::InstrumentChangeOnTonePortamento,
        pos(0, 0, 1),
    );
    // The new instrument still latches
    assert_eq!(&sim.channels[0].trigger[6..12], &[0; 6]);
    assert_eq!(&sim.channels[0].volume[6..12], &[64; 6]);
}

#[test]
fn sample_offset_is_set_and_recalled() {
    let (sim, report) = ModuleBuilder::new()
        .instrument(1, 64, 1024)
        .row(0, 0, 0, 428, 1, 0x9, 2)
        .row(0, 1, 0, 404, 1, 0x9, 0)
        .simulate();

    assert_eq!(sim.channels[0].offset[0], 2);
    assert_eq!(&sim.channels[0].offset[1..6], &[0; 5]);
    // Argument 0 recalls the last nonzero offset
    assert_eq!(sim.channels[0].offset[6], 2);
    assert!(!report.has_errors());
}

#[test]
fn sample_offset_recall_with_no_value_is_reported() {
    let (_, report) = ModuleBuilder::new()
        .instrument(1, 64, 1024)
        .row(0, 0, 0, 428, 1, 0x9, 0)
        .simulate();

    assert_reported(&report, Diagnostic::OffsetRecallWithNoValue, pos(0, 0, 0));
}

#[test]
fn sample_offset_beyond_the_sample_is_clamped() {
    // 100 words of sample; offset 1 would start at word 128
    let (sim, report) = ModuleBuilder::new()
        .instrument(1, 64, 100)
        .row(0, 0, 0, 428, 1, 0x9, 1)
        .simulate();

    assert_eq!(sim.channels[0].offset[0], 0);
    assert_reported(&report, Diagnostic::OffsetPastSampleEnd, pos(0, 0, 0));
}

#[test]
fn offsets_split_note_ranges() {
    let (sim, _) = ModuleBuilder::new()
        .instrument(1, 64, 1024)
        .row(0, 0, 0, 428, 1, 0, 0)
        .row(0, 1, 0, 404, 1, 0x9, 2)
        .simulate();

    let (table, report) = note_table_of(&sim);

    assert_eq!(table.id_count(), 2);
    assert_eq!(table.note_id(1, 0, Note::try_new(12).unwrap()), Some(0));
    assert_eq!(table.note_id(1, 2, Note::try_new(13).unwrap()), Some(1));
    assert!(!report.has_errors());
}

#[test]
fn note_id_capacity_overflow_is_reported_but_not_fatal() {
    // 15 offsets x 36-note spans + the reserved offset-0 id = 541 ids
    let mut builder = ModuleBuilder::new().instrument(1, 64, 2048);
    for o in 1..=15 {
        builder = builder
            .row(0, usize::from(o) * 2, 0, 856, 1, 0x9, o)
            .row(0, usize::from(o) * 2 + 1, 0, 113, 1, 0x9, o);
    }

    let (sim, _) = builder.simulate();
    let (table, report) = note_table_of(&sim);

    assert_eq!(table.id_count(), 541);
    assert!(report
        .global_diagnostics()
        .contains(&GlobalDiagnostic::TooManyNoteIds(541)));
}
