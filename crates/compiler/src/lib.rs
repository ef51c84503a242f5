//! Module-to-driver-stream compiler

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

pub mod driver_constants;
pub mod effects;
pub mod encoder;
pub mod errors;
pub mod instruments;
pub mod module;
pub mod name_migration;
pub mod note_table;
pub mod notes;
pub mod report;
pub mod simulator;
pub mod songs;

pub use module::Module;
pub use report::Report;

use errors::SongError;

/// Run the whole pipeline over a parsed module.
///
/// Semantic problems land in `report` and do not stop the conversion;
/// the returned error is structural (the artifact cannot be produced).
pub fn compile(module: &Module, report: &mut Report) -> Result<Vec<u8>, SongError> {
    let sim = simulator::simulate(module, report)?;

    let table = note_table::build_note_table(&sim, report);
    let streams = encoder::encode_streams(&sim, &table, report);
    let instruments = instruments::compile_instruments(module, &table, report);

    report.summary.note_ids = table.id_count();
    report.summary.distinct_words = streams.distinct_words;
    report.summary.music_length = streams.total_ticks();
    report.summary.restart_tick = streams.restart_tick;

    Ok(songs::song_data(&instruments, &table, &streams, report))
}

pub fn compile_module(bytes: &[u8], report: &mut Report) -> Result<Vec<u8>, SongError> {
    let module = Module::parse(bytes)?;

    compile(&module, report)
}
