//! Effect-command dispatch

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::module::Row;

/// The playback driver's effect subset, decoded once per row.
///
/// Commands outside the subset decode to `Unsupported` (a structural
/// failure) or `UnsupportedExt` (reported, then ignored); nothing is ever
/// silently approximated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Effect {
    None,

    Arpeggio { first: u8, second: u8 },
    PortamentoUp { speed: u8 },
    PortamentoDown { speed: u8 },
    TonePortamento { speed: u8 },
    TonePortamentoVolumeSlide { up: u8, down: u8 },
    SampleOffset { offset: u8 },
    VolumeSlide { up: u8, down: u8 },
    PositionJump { position: u8 },
    SetVolume { volume: u8 },
    PatternBreak { row: u8 },
    SetSpeed { speed: u8 },

    FinePortamentoUp { amount: u8 },
    FinePortamentoDown { amount: u8 },
    PatternDelay { rows: u8 },
    Retrigger { ticks: u8 },
    FineVolumeSlideUp { amount: u8 },
    FineVolumeSlideDown { amount: u8 },
    NoteCut { tick: u8 },

    Unsupported { command: u8 },
    UnsupportedExt { command: u8 },
}

impl Effect {
    pub fn decode(row: &Row) -> Effect {
        let (hi, lo) = row.arg_nibbles();

        match row.effect {
            0x0 => {
                if row.argument == 0 {
                    Effect::None
                } else {
                    Effect::Arpeggio {
                        first: hi,
                        second: lo,
                    }
                }
            }
            0x1 => Effect::PortamentoUp {
                speed: row.argument,
            },
            0x2 => Effect::PortamentoDown {
                speed: row.argument,
            },
            0x3 => Effect::TonePortamento {
                speed: row.argument,
            },
            0x5 => Effect::TonePortamentoVolumeSlide { up: hi, down: lo },
            0x9 => Effect::SampleOffset {
                offset: row.argument,
            },
            0xa => Effect::VolumeSlide { up: hi, down: lo },
            0xb => Effect::PositionJump {
                position: row.argument,
            },
            0xc => Effect::SetVolume {
                volume: row.argument,
            },
            0xd => Effect::PatternBreak {
                // Decimal-packed argument, a quirk of the source format
                row: hi * 10 + lo,
            },
            0xf => Effect::SetSpeed {
                speed: row.argument,
            },

            0xe => match hi {
                0x1 => Effect::FinePortamentoUp { amount: lo },
                0x2 => Effect::FinePortamentoDown { amount: lo },
                0x6 => Effect::PatternDelay { rows: lo },
                0x9 => Effect::Retrigger { ticks: lo },
                0xa => Effect::FineVolumeSlideUp { amount: lo },
                0xb => Effect::FineVolumeSlideDown { amount: lo },
                0xc => Effect::NoteCut { tick: lo },
                c => Effect::UnsupportedExt { command: c },
            },

            c => Effect::Unsupported { command: c },
        }
    }

    /// True for the two tone-portamento commands: a note on such a row
    /// latches the glide target instead of retriggering.
    pub fn is_tone_portamento(&self) -> bool {
        matches!(
            self,
            Effect::TonePortamento { .. } | Effect::TonePortamentoVolumeSlide { .. }
        )
    }
}
