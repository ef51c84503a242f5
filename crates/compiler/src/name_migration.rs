//! Legacy instrument-name re-encoding
//!
//! One-shot migration of the packed parameter substring in each instrument
//! name from the old hex layout (distortion word + eight hex bytes) to the
//! current decimal layout.  Pattern and sample data are untouched.

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use crate::driver_constants::N_INSTRUMENT_SLOTS;
use crate::instruments::{N_ONE_DIGIT_PARAMS, N_PARAMS, N_TWO_DIGIT_PARAMS};
use crate::module::{Instrument, Module};

// Old layout: distortion word in chars 1..5, parameter bytes in 5..21
const OLD_DISTORTION_START: usize = 1;
const OLD_PARAMS_START: usize = 5;

// Distortion word fallback when the field is not hex
const DEFAULT_DISTORTION: u16 = 0x8880;

// Only the leading 21 name characters carry parameters
const ENCODED_NAME_LENGTH: usize = 21;

/// Outcome of one instrument slot's conversion.
pub struct Migration {
    pub instrument: u8,
    pub old_name: String,

    /// `None` when the old name did not parse; the slot is left unchanged.
    pub converted: Option<([u32; N_PARAMS], String)>,
}

fn hex_field(name: &[u8], start: usize, end: usize) -> Option<u32> {
    let field = &name[start.min(name.len())..end.min(name.len())];
    if field.is_empty() {
        return None;
    }

    let mut value: u32 = 0;
    for &b in field {
        let digit = (b as char).to_digit(16)?;
        value = value * 16 + digit;
    }
    Some(value)
}

/// Decimal field with the all-`X` placeholder for the maximum.
fn value_string(value: u32, digits: usize) -> String {
    let max = 10_u32.pow(digits as u32);
    let value = value.min(max);

    if value == max {
        "X".repeat(digits)
    } else {
        format!("{:0width$}", value, width = digits)
    }
}

fn migrate_name(name: &[u8; 22]) -> Option<([u32; N_PARAMS], [u8; 22])> {
    let encoded = &name[..ENCODED_NAME_LENGTH];

    let mut p = [0; N_PARAMS];
    for (i, out) in p.iter_mut().take(N_TWO_DIGIT_PARAMS).enumerate() {
        *out = hex_field(encoded, OLD_PARAMS_START + i * 2, OLD_PARAMS_START + i * 2 + 2)?;
    }

    let distortion = hex_field(encoded, OLD_DISTORTION_START, OLD_DISTORTION_START + 4)
        .and_then(|d| u16::try_from(d).ok())
        .unwrap_or(DEFAULT_DISTORTION);

    // Un-rotate the packed distortion word and strip its bias
    let rotated = (distortion >> 3) | (distortion << 13);
    let rotated = rotated.wrapping_sub(0x1110);
    for (i, out) in p.iter_mut().skip(N_TWO_DIGIT_PARAMS).enumerate() {
        *out = u32::from((rotated >> (i * 4)) & 0xf);
    }

    let mut new_name = Vec::with_capacity(ENCODED_NAME_LENGTH);
    new_name.push(name[0]);
    for &v in p.iter().take(N_TWO_DIGIT_PARAMS) {
        new_name.extend_from_slice(value_string(v, 2).as_bytes());
    }
    for &v in p.iter().skip(N_TWO_DIGIT_PARAMS).take(N_ONE_DIGIT_PARAMS) {
        new_name.extend_from_slice(value_string(v, 1).as_bytes());
    }

    let mut out = *name;
    out[..ENCODED_NAME_LENGTH].copy_from_slice(&new_name);

    Some((p, out))
}

fn migrate_instrument(inst: &mut Instrument, index: u8) -> Migration {
    let old_name = inst.name();

    let converted = migrate_name(&inst.name).map(|(p, new_name)| {
        inst.name = new_name;
        (p, inst.name())
    });

    Migration {
        instrument: index,
        old_name,
        converted,
    }
}

pub fn migrate_instrument_names(module: &mut Module) -> Vec<Migration> {
    (1..N_INSTRUMENT_SLOTS as u8)
        .map(|i| migrate_instrument(module.instrument_mut(i), i))
        .collect()
}
