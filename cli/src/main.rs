#![warn(clippy::pedantic)]

//! # enumgen CLI
//!
//! Entry point for the `enumgen` binary. Three subcommands share one
//! pipeline: sources under a directory are collected (walkdir, `.cs` only,
//! sorted for deterministic output), compiled into the immutable program
//! model, and then either generated from, checked, or indexed.

mod parser;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use enumgen_parser::compilation::{Compilation, DiagnosticSeverity};
use parser::{Cli, Command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let code = match run(args.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error:#}");
            1
        }
    };
    process::exit(code);
}

fn run(command: Command) -> anyhow::Result<i32> {
    match command {
        Command::Generate {
            dir,
            out,
            references,
        } => generate(&dir, out.as_deref(), &references),
        Command::Check { dir, references } => check(&dir, &references),
        Command::Index {
            dir,
            output,
            references,
        } => index(&dir, &output, &references),
    }
}

fn generate(dir: &Path, out: Option<&Path>, references: &[PathBuf]) -> anyhow::Result<i32> {
    let compilation = compile_dir(dir, references)?;
    print_diagnostics(&compilation);

    let out = out.map_or_else(|| PathBuf::from("generated"), Path::to_path_buf);
    if !out.exists() {
        fs::create_dir_all(&out)?;
    }

    let units = enumgen::generate(&compilation);
    if units.is_empty() {
        eprintln!("No collection declarations found under {}", dir.display());
        return Ok(0);
    }
    for unit in &units {
        let path = out.join(&unit.file_name);
        fs::write(&path, &unit.text)?;
        println!("Generated: {}", path.display());
    }
    Ok(0)
}

fn check(dir: &Path, references: &[PathBuf]) -> anyhow::Result<i32> {
    let compilation = compile_dir(dir, references)?;
    print_diagnostics(&compilation);
    if compilation.has_errors() {
        Ok(1)
    } else {
        println!(
            "{}: {} collection(s), no errors",
            compilation.assembly_name(),
            enumgen::discover(&compilation).len()
        );
        Ok(0)
    }
}

fn index(dir: &Path, output: &Path, references: &[PathBuf]) -> anyhow::Result<i32> {
    let compilation = compile_dir(dir, references)?;
    print_diagnostics(&compilation);
    if compilation.has_errors() {
        return Ok(1);
    }
    compilation.write_index(output)?;
    println!("Index written: {}", output.display());
    Ok(0)
}

fn compile_dir(dir: &Path, references: &[PathBuf]) -> anyhow::Result<Compilation> {
    anyhow::ensure!(dir.exists(), "path not found: {}", dir.display());
    let assembly = dir
        .file_name()
        .map_or_else(|| "assembly".to_string(), |n| n.to_string_lossy().into_owned());
    let sources = collect_sources(dir)?;
    anyhow::ensure!(
        !sources.is_empty(),
        "no .cs sources under {}",
        dir.display()
    );
    enumgen::compile(&assembly, &sources, references)
}

fn collect_sources(dir: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == "cs") {
            // Already-generated units are never re-compiled.
            if path.to_string_lossy().ends_with(".g.cs") {
                continue;
            }
            let text = fs::read_to_string(path)?;
            sources.push((path.display().to_string(), text));
        }
    }
    Ok(sources)
}

fn print_diagnostics(compilation: &Compilation) {
    for diagnostic in compilation.diagnostics() {
        let tag = match diagnostic.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        eprintln!(
            "{tag}: {} ({}:{}:{})",
            diagnostic.message,
            diagnostic.location.source,
            diagnostic.location.start_line,
            diagnostic.location.start_column
        );
    }
}
