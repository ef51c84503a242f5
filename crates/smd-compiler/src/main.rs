//! compiler binary

// SPDX-FileCopyrightText: © 2024 smd-compiler contributors
//
// SPDX-License-Identifier: MIT

use clap::{Args, Parser, Subcommand};
use compiler::{Module, Report};

use std::fs;
use std::path::PathBuf;

macro_rules! error {
    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit(1);
    }};
}

#[derive(Parser)]
#[command(author, version)]
#[command(about = "synth-module driver compiler")]
#[command(arg_required_else_help = true)]
struct ArgParser {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a module into driver stream data
    Song(CompileSongArgs),

    /// Re-encode legacy instrument-name parameters
    MigrateNames(MigrateNamesArgs),
}

// Compile Song Data
// =================

#[derive(Args)]
struct CompileSongArgs {
    #[arg(short = 'o', long, value_name = "FILE", help = "output file")]
    output: PathBuf,

    #[arg(value_name = "MOD_FILE", help = "module file")]
    module_file: PathBuf,
}

fn compile_song(args: CompileSongArgs) {
    let bytes = read_file(&args.module_file);

    let mut report = Report::new();
    let data = match compiler::compile_module(&bytes, &mut report) {
        Ok(data) => data,
        Err(e) => error!("Cannot compile module: {}", e),
    };

    for line in report.lines() {
        eprintln!("{}", line);
    }
    print_summary(&report);

    write_data(args.output, data);

    if report.has_errors() {
        std::process::exit(1);
    }
}

fn print_summary(report: &Report) {
    let summary = &report.summary;

    for stat in &summary.instruments {
        println!(
            "Instrument {:2}: {:5} triggers, {:5} sample words",
            stat.instrument, stat.triggers, stat.sample_words
        );
    }
    println!("Generated {} different note IDs", summary.note_ids);
    println!("Generated {} different data words", summary.distinct_words);
    println!();

    println!("MUSIC_LENGTH = {}", summary.music_length);
    println!("MUSIC_RESTART = {}", summary.restart_tick);
    println!("NUM_INSTRUMENTS = {}", summary.instruments.len());
    println!("INSTRUMENT_BUFFER = {}", summary.instrument_buffer);

    let secs = summary.duration_secs();
    println!("Duration {}:{:02}", secs / 60, secs % 60);
    println!("{} errors", report.error_count());
}

// Migrate Instrument Names
// ========================

#[derive(Args)]
struct MigrateNamesArgs {
    #[arg(short = 'o', long, value_name = "FILE", help = "output file")]
    output: PathBuf,

    #[arg(value_name = "MOD_FILE", help = "module file")]
    module_file: PathBuf,
}

fn migrate_names(args: MigrateNamesArgs) {
    let bytes = read_file(&args.module_file);

    let mut module = match Module::parse(&bytes) {
        Ok(m) => m,
        Err(e) => error!("Cannot read module: {}", e),
    };

    for m in compiler::name_migration::migrate_instrument_names(&mut module) {
        match m.converted {
            Some((params, new_name)) => {
                let params: Vec<String> = params.iter().map(|p| format!("{:3}", p)).collect();
                println!("{:21} -> {} -> {}", m.old_name, params.join(" "), new_name);
            }
            None => println!("{}", m.old_name),
        }
    }

    write_data(args.output, module.to_bytes());
}

fn main() {
    let args = ArgParser::parse();

    match args.command {
        Command::Song(c) => compile_song(c),
        Command::MigrateNames(c) => migrate_names(c),
    }
}

fn read_file(path: &PathBuf) -> Vec<u8> {
    match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => error!("Cannot read {}: {}", path.display(), e),
    }
}

fn write_data(path: PathBuf, data: Vec<u8>) {
    match fs::write(&path, data) {
        Ok(()) => (),
        Err(why) => error!("Error writing {}: {}", path.display(), why),
    }
}
