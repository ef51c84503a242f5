//! Playback-driver constants

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

// These values MUST match the playback driver.

pub const N_CHANNELS: usize = 4;
pub const ROWS_PER_PATTERN: usize = 64;
pub const N_POSITIONS: usize = 128;

// Instrument slot 0 means "no instrument"
pub const N_INSTRUMENT_SLOTS: usize = 32;

pub const PERIOD_TABLE_LEN: usize = 36;

pub const MAX_VOLUME: u8 = 64;

pub const DEFAULT_TICKS_PER_ROW: u32 = 6;

// One tick per vertical blank
pub const VBLANK_HZ: u32 = 50;

// The driver's note-id table is a fixed block in chip memory
pub const NOTE_ID_TABLE_SIZE: usize = 512;

// Encoded word layout
pub const TRIGGER_FLAG: u16 = 0x8000;
pub const NOTE_ABS_MASK: u16 = 0x80;
pub const NOTE_SHIFT: u32 = 0;
pub const VOLUME_SHIFT: u32 = 9;
pub const PERIOD_DELTA_MASK: u16 = 511;
pub const VOLUME_DELTA_MASK: u16 = 63;

pub const MIN_PERIOD_DELTA: i32 = -256;
pub const MAX_PERIOD_DELTA: i32 = 255;

// Replacement delta for bit patterns the driver reserves
pub const DELTA_SENTINEL: u16 = 63;

// One sample-offset unit is 256 bytes = 128 sample words
pub const SAMPLE_OFFSET_WORDS: u32 = 128;

pub const INSTRUMENT_RECORD_WORDS: usize = 11;
pub const NOTE_RANGE_ENTRY_SIZE: usize = 4;

// Module layout
pub const MODULE_NAME_LENGTH: usize = 20;
pub const INSTRUMENT_NAME_LENGTH: usize = 22;
pub const FORMAT_TAG_LENGTH: usize = 4;
pub const BYTES_PER_ROW: usize = 4;
