//! Row-by-row playback simulation
//!
//! Replays every effect exactly as the playback engine would, emitting raw
//! per-tick control streams for the encoder.  Simulation ends when a song
//! stop is hit or when the full engine state repeats (the loop detector).

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::{
    DEFAULT_TICKS_PER_ROW, MAX_VOLUME, N_CHANNELS, N_INSTRUMENT_SLOTS, ROWS_PER_PATTERN,
    SAMPLE_OFFSET_WORDS,
};
use crate::effects::Effect;
use crate::errors::{Diagnostic, SongError};
use crate::module::{Module, Row};
use crate::notes::{clamp_period, Note};
use crate::report::{Report, RowPos};

use std::collections::HashMap;

/// Persistent playback state of one channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ChannelState {
    pub instrument: u8,
    pub period: u16,
    pub volume: u8,
    pub portamento_target: u16,
    pub portamento_speed: u8,
    pub sample_offset: u8,
}

/// Raw per-tick control streams for one channel.
///
/// All four vectors always have the same length; a tick's trigger/offset
/// samples are 0 when nothing fired.
#[derive(Debug, Default)]
pub struct ChannelStream {
    pub volume: Vec<u8>,
    pub trigger: Vec<u8>,
    pub offset: Vec<u8>,
    pub period: Vec<u16>,
}

pub struct Simulation {
    pub channels: [ChannelStream; N_CHANNELS],

    /// (pattern, row) per tick, for locating encoder diagnostics.
    pub trace: Vec<(u8, u8)>,

    /// Tick the stream falls back to when it reaches the end.
    pub restart_tick: u32,
}

impl Simulation {
    pub fn total_ticks(&self) -> u32 {
        self.trace.len() as u32
    }
}

/// Full engine state before a row is simulated.
///
/// Two equal snapshots have identical audible futures, so a repeat closes
/// the loop.
#[derive(Debug, PartialEq, Eq, Hash)]
struct Snapshot {
    position: u8,
    row: u8,
    ticks_per_row: u32,
    channels: [ChannelState; N_CHANNELS],
}

fn pos(pattern: u8, channel: usize, row: usize) -> RowPos {
    RowPos {
        pattern,
        channel: channel as u8,
        row: row as u8,
    }
}

pub fn simulate(module: &Module, report: &mut Report) -> Result<Simulation, SongError> {
    let mut channels = [ChannelState::default(); N_CHANNELS];
    let mut streams: [ChannelStream; N_CHANNELS] = Default::default();
    let mut trace: Vec<(u8, u8)> = Vec::new();

    let mut seen: HashMap<Snapshot, u32> = HashMap::new();

    let mut speed = DEFAULT_TICKS_PER_ROW;
    let mut tick: u32 = 0;

    let mut position: usize = 0;
    let mut start_row: usize = 0;

    let restart_tick = 'song: loop {
        // The play order wraps; termination comes from the loop detector.
        if position >= module.positions().len() {
            position = 0;
        }
        let pattern_index = module.positions()[position];
        let pattern = &module.patterns[usize::from(pattern_index)];

        let mut row_index = start_row;
        start_row = 0;

        while row_index < ROWS_PER_PATTERN {
            let snapshot = Snapshot {
                position: position as u8,
                row: row_index as u8,
                ticks_per_row: speed,
                channels,
            };
            if let Some(&first_seen) = seen.get(&snapshot) {
                break 'song first_seen;
            }
            seen.insert(snapshot, tick);

            let line = &pattern.rows[row_index];
            let effects: [Effect; N_CHANNELS] =
                std::array::from_fn(|t| Effect::decode(&line[t]));

            for (t, effect) in effects.iter().enumerate() {
                if let Effect::Unsupported { command } = effect {
                    return Err(SongError::UnsupportedEffect {
                        command: *command,
                        pos: pos(pattern_index, t, row_index),
                    });
                }
            }

            // Global controls are scanned across all channels before any
            // channel is simulated; a later channel wins on conflict.
            let mut stop = false;
            let mut pattern_break: Option<usize> = None;
            let mut position_jump: Option<usize> = None;
            let mut delay_rows: u32 = 0;

            for (t, effect) in effects.iter().enumerate() {
                match *effect {
                    Effect::SetSpeed { speed: 0 } => stop = true,
                    Effect::SetSpeed { speed: s } => speed = s.into(),
                    Effect::PatternBreak { row } => {
                        if usize::from(row) >= ROWS_PER_PATTERN {
                            report.row_error(
                                Diagnostic::BreakOutsidePattern,
                                pos(pattern_index, t, row_index),
                            );
                            pattern_break = Some(0);
                        } else {
                            pattern_break = Some(row.into());
                        }
                    }
                    Effect::PositionJump { position: p } => {
                        if usize::from(p) >= module.positions().len() {
                            report.row_error(
                                Diagnostic::JumpOutsideSong(p),
                                pos(pattern_index, t, row_index),
                            );
                            position_jump = Some(0);
                        } else {
                            position_jump = Some(p.into());
                        }
                    }
                    Effect::PatternDelay { rows } => delay_rows = rows.into(),
                    Effect::UnsupportedExt { command } => {
                        report.row_error(
                            Diagnostic::UnsupportedExtEffect(command),
                            pos(pattern_index, t, row_index),
                        );
                    }
                    _ => (),
                }
            }

            let row_ticks = speed * (delay_rows + 1);

            for t in 0..N_CHANNELS {
                let p = pos(pattern_index, t, row_index);
                let state = &mut channels[t];
                let stream = &mut streams[t];

                let mut row = line[t];
                if usize::from(row.instrument) >= N_INSTRUMENT_SLOTS {
                    report.row_error(Diagnostic::InstrumentOutOfRange(row.instrument), p);
                    row.instrument = 0;
                }

                emit_volume(state, stream, &row, effects[t], row_ticks, module, report, p);
                emit_trigger(state, stream, &row, effects[t], row_ticks, report, p);
                emit_offset(state, stream, effects[t], row_ticks, module, report, p);
                emit_period(state, stream, &row, effects[t], row_ticks, report, p);
            }

            for _ in 0..row_ticks {
                trace.push((pattern_index, row_index as u8));
            }
            tick += row_ticks;

            if stop {
                break 'song tick;
            }

            match (position_jump, pattern_break) {
                (None, None) => row_index += 1,
                (jump, brk) => {
                    position = match jump {
                        Some(p) => p,
                        None => position + 1,
                    };
                    start_row = brk.unwrap_or(0);
                    if delay_rows > 0 && brk.is_some() {
                        // Engine quirk: a pattern delay and a pattern break
                        // on the same row skip the row after the break, once.
                        start_row += 1;
                    }
                    continue 'song;
                }
            }
        }

        position += 1;
    };

    Ok(Simulation {
        channels: streams,
        trace,
        restart_tick,
    })
}

#[allow(clippy::too_many_arguments)]
fn emit_volume(
    state: &mut ChannelState,
    stream: &mut ChannelStream,
    row: &Row,
    effect: Effect,
    row_ticks: u32,
    module: &Module,
    report: &mut Report,
    pos: RowPos,
) {
    if row.instrument != 0 {
        // Header volumes above 64 would break the driver's volume range
        state.volume = module.instrument(row.instrument).volume.min(MAX_VOLUME);
    }
    if let Effect::SetVolume { volume } = effect {
        if volume > MAX_VOLUME {
            report.row_error(Diagnostic::VolumeOutOfRange(volume), pos);
        }
        state.volume = volume.min(MAX_VOLUME);
    }

    match effect {
        Effect::NoteCut { tick } => {
            let cut = u32::from(tick).min(row_ticks);
            for _ in 0..cut {
                stream.volume.push(state.volume);
            }
            for _ in cut..row_ticks {
                stream.volume.push(0);
            }
        }

        Effect::VolumeSlide { up, down } | Effect::TonePortamentoVolumeSlide { up, down } => {
            let slide: i32 = if up != 0 { up.into() } else { -i32::from(down) };
            let base = i32::from(state.volume);
            for i in 0..row_ticks {
                let v = (base + i as i32 * slide).clamp(0, MAX_VOLUME.into());
                stream.volume.push(v as u8);
            }
            let last = base + (row_ticks as i32 - 1) * slide;
            state.volume = last.clamp(0, MAX_VOLUME.into()) as u8;
        }

        _ => {
            if let Effect::FineVolumeSlideUp { amount } = effect {
                state.volume = (state.volume + amount).min(MAX_VOLUME);
            }
            if let Effect::FineVolumeSlideDown { amount } = effect {
                state.volume = state.volume.saturating_sub(amount);
            }
            for _ in 0..row_ticks {
                stream.volume.push(state.volume);
            }
        }
    }
}

fn emit_trigger(
    state: &mut ChannelState,
    stream: &mut ChannelStream,
    row: &Row,
    effect: Effect,
    row_ticks: u32,
    report: &mut Report,
    pos: RowPos,
) {
    if row.instrument != 0 {
        if row.instrument != state.instrument && effect.is_tone_portamento() {
            report.row_error(Diagnostic::InstrumentChangeOnTonePortamento, pos);
        }
        state.instrument = row.instrument;
    }

    match effect {
        Effect::Retrigger { ticks } if ticks != 0 => {
            for i in 0..row_ticks {
                if i % u32::from(ticks) == 0 {
                    stream.trigger.push(state.instrument);
                } else {
                    stream.trigger.push(0);
                }
            }
        }
        _ => {
            let triggers =
                state.instrument != 0 && row.note().is_some() && !effect.is_tone_portamento();

            stream.trigger.push(if triggers { state.instrument } else { 0 });
            for _ in 1..row_ticks {
                stream.trigger.push(0);
            }
        }
    }
}

fn emit_offset(
    state: &mut ChannelState,
    stream: &mut ChannelStream,
    effect: Effect,
    row_ticks: u32,
    module: &Module,
    report: &mut Report,
    pos: RowPos,
) {
    let mut first = 0;

    if let Effect::SampleOffset { offset } = effect {
        let mut offset = if offset != 0 {
            offset
        } else if state.sample_offset != 0 {
            state.sample_offset
        } else {
            report.row_error(Diagnostic::OffsetRecallWithNoValue, pos);
            0
        };

        if state.instrument != 0 {
            let length = u32::from(module.instrument(state.instrument).length);
            if u32::from(offset) * SAMPLE_OFFSET_WORDS >= length {
                report.row_error(Diagnostic::OffsetPastSampleEnd, pos);
                offset = match length {
                    0 => 0,
                    l => (((l - 1) / SAMPLE_OFFSET_WORDS).min(u8::MAX.into())) as u8,
                };
            }
        }

        if offset != 0 {
            state.sample_offset = offset;
        }
        first = offset;
    }

    stream.offset.push(first);
    for _ in 1..row_ticks {
        stream.offset.push(0);
    }
}

fn emit_period(
    state: &mut ChannelState,
    stream: &mut ChannelStream,
    row: &Row,
    effect: Effect,
    row_ticks: u32,
    report: &mut Report,
    pos: RowPos,
) {
    if let Some(n) = row.note() {
        if !effect.is_tone_portamento() {
            state.period = n.period();
        }
    }

    match effect {
        Effect::Arpeggio { first, second } => {
            match Note::nearest_at_or_below(state.period) {
                Some(base) => {
                    if base.period() != state.period {
                        report.row_error(Diagnostic::ArpeggioAfterSlide, pos);
                    }

                    let offsets = [0, first, second];
                    for i in 0..row_ticks {
                        let id = base.note_id() + offsets[(i % 3) as usize];
                        let n = match Note::try_new(id) {
                            Some(n) => n,
                            None => {
                                report.row_error(Diagnostic::ArpeggioNoteOutOfRange, pos);
                                Note::MAX
                            }
                        };
                        stream.period.push(n.period());
                    }
                }
                None => {
                    // Period above the table top, no base note to cycle from
                    report.row_error(Diagnostic::ArpeggioAfterSlide, pos);
                    for _ in 0..row_ticks {
                        stream.period.push(state.period);
                    }
                }
            }
        }

        Effect::PortamentoUp { speed } | Effect::PortamentoDown { speed } => {
            if state.period == 0 {
                report.row_error(Diagnostic::PortamentoNoSource, pos);
            }

            let slide: i32 = match effect {
                Effect::PortamentoUp { .. } => -i32::from(speed),
                _ => speed.into(),
            };
            let base = i32::from(state.period);

            for i in 0..row_ticks {
                stream.period.push(clamp_period(base + i as i32 * slide));
            }
            state.period = clamp_period(base + (row_ticks as i32 - 1) * slide);
        }

        Effect::TonePortamento { .. } | Effect::TonePortamentoVolumeSlide { .. } => {
            if let Some(n) = row.note() {
                state.portamento_target = n.period();
            }
            if let Effect::TonePortamento { speed } = effect {
                if speed != 0 {
                    state.portamento_speed = speed;
                }
            }

            if state.period == 0 {
                report.row_error(Diagnostic::TonePortamentoNoSource, pos);
            }
            if state.portamento_target == 0 {
                report.row_error(Diagnostic::TonePortamentoNoTarget, pos);
            }
            if state.portamento_speed == 0 {
                report.row_error(Diagnostic::TonePortamentoNoSpeed, pos);
            }

            stream.period.push(state.period);

            let step = u16::from(state.portamento_speed);
            for _ in 1..row_ticks {
                if state.portamento_target > state.period {
                    state.period = (state.period + step).min(state.portamento_target);
                } else {
                    state.period =
                        state.period.saturating_sub(step).max(state.portamento_target);
                }
                stream.period.push(state.period);
            }
        }

        _ => {
            if let Effect::FinePortamentoUp { amount } = effect {
                state.period = clamp_period(i32::from(state.period) - i32::from(amount));
            }
            if let Effect::FinePortamentoDown { amount } = effect {
                state.period = clamp_period(i32::from(state.period) + i32::from(amount));
            }
            for _ in 0..row_ticks {
                stream.period.push(state.period);
            }
        }
    }
}
