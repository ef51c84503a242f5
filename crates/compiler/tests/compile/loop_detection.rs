// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::*;
use compiler::encoder::encode_streams;
use compiler::errors::Diagnostic;

#[test]
fn sustained_note_folds_to_one_pass() {
    // One note held for 64 rows at 6 ticks per row: a trigger word and
    // 383 DELTA(0, 0) words, restarting from the top.
    let (sim, _) = ModuleBuilder::new()
        .instrument(1, 64, 64)
        .row(0, 0, 0, 428, 1, 0, 0)
        .simulate();

    // The loop detector needs a second pass to see the state repeat
    assert_eq!(sim.total_ticks(), 768);
    assert_eq!(sim.restart_tick, 384);

    let (table, mut report) = note_table_of(&sim);
    let streams = encode_streams(&sim, &table, &mut report);

    assert_eq!(streams.total_ticks(), 384);
    assert_eq!(streams.restart_tick, 0);

    assert_eq!(streams.channels[0][0], 0x8000 | (63 << 9));
    assert_eq!(&streams.channels[0][1..], &[0; 383][..]);
    // Untouched channels stay silent
    assert_eq!(&streams.channels[3][..], &[0; 384][..]);

    assert!(!report.has_errors());
}

#[test]
fn bit_identical_state_closes_the_loop_immediately() {
    // A position jump straight back to position 0 with no state change
    let (sim, _) = ModuleBuilder::new()
        .row(0, 0, 0, 0, 0, 0xb, 0)
        .simulate();

    assert_eq!(sim.total_ticks(), 6);
    assert_eq!(sim.restart_tick, 0);
}

#[test]
fn jump_outside_the_song_is_reported_and_wraps() {
    let (sim, report) = ModuleBuilder::new()
        .row(0, 0, 0, 0, 0, 0xb, 9)
        .simulate();

    assert_reported(&report, Diagnostic::JumpOutsideSong(9), pos(0, 0, 0));
    assert_eq!(sim.restart_tick, 0);
}

#[test]
fn speed_zero_stops_the_song() {
    let (sim, _) = ModuleBuilder::new()
        .instrument(1, 64, 64)
        .row(0, 0, 0, 428, 1, 0, 0)
        .row(0, 1, 0, 0, 0, 0xf, 0)
        .simulate();

    // The stop row is still emitted, then the stream ends where it restarts
    assert_eq!(sim.total_ticks(), 12);
    assert_eq!(sim.restart_tick, 12);

    let (table, mut report) = note_table_of(&sim);
    let streams = encode_streams(&sim, &table, &mut report);
    assert_eq!(streams.total_ticks(), 12);
    assert_eq!(streams.restart_tick, 12);
}

#[test]
fn pattern_break_targets_the_next_position() {
    let (sim, report) = ModuleBuilder::new()
        .positions(&[0, 1])
        .row(0, 0, 0, 0, 0, 0xd, 0x12)
        .simulate();

    // Break lands on row 12 of the next pattern
    assert_eq!(sim.trace[5], (0, 0));
    assert_eq!(sim.trace[6], (1, 12));
    assert!(!report.has_errors());
}

#[test]
fn pattern_break_outside_the_pattern_is_reported() {
    let (sim, report) = ModuleBuilder::new()
        .positions(&[0, 1])
        .row(0, 0, 0, 0, 0, 0xd, 0x99)
        .simulate();

    assert_reported(&report, Diagnostic::BreakOutsidePattern, pos(0, 0, 0));
    assert_eq!(sim.trace[6], (1, 0));
}

#[test]
fn pattern_delay_multiplies_the_row_ticks() {
    let (sim, _) = ModuleBuilder::new()
        .row(0, 0, 0, 0, 0, 0xe, 0x62)
        .simulate();

    assert_eq!(&sim.trace[..18], &[(0, 0); 18][..]);
    assert_eq!(sim.trace[18], (0, 1));
}

#[test]
fn pattern_delay_with_break_skips_the_landing_row() {
    let (sim, _) = ModuleBuilder::new()
        .positions(&[0, 1])
        .row(0, 0, 0, 0, 0, 0xe, 0x61)
        .row(0, 0, 1, 0, 0, 0xd, 0x02)
        .simulate();

    // The delayed row runs twice over, then the engine quirk skips the
    // break's landing row
    assert_eq!(&sim.trace[..12], &[(0, 0); 12][..]);
    assert_eq!(sim.trace[12], (1, 3));
}

#[test]
fn restart_never_exceeds_the_stream_length() {
    let (sim, _) = ModuleBuilder::new()
        .instrument(1, 64, 64)
        .row(0, 0, 0, 428, 1, 0, 0)
        .row(0, 32, 0, 381, 1, 0, 0)
        .simulate();

    assert!(sim.restart_tick <= sim.total_ticks());
}
