//! Vendo CLI - declarative source vendoring with drift tracking
//!
//! Usage: vendo <COMMAND>
//!
//! Commands:
//!   check   Validate the configuration and report destination conflicts
//!   status  Report local drift of vendored files against the lockfile

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use vendo::drift::{DependencyDrift, FileStatus, Upstream};
use vendo::lockfile::{TomlLockfileRepository, LOCKFILE_NAME};
use vendo::verify::MappingContent;
use vendo::{detect_conflicts, PathConflict, VendorConfig};

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Check { strict } => run_check(&cli, *strict),
        Commands::Status { source, root } => run_status(&cli, source.as_deref(), root),
    }
}

fn run_check(cli: &Cli, strict: bool) -> Result<ExitCode> {
    let (config, warnings) = VendorConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    for warning in &warnings {
        eprintln!("warning: unknown config key '{}'", warning.key);
    }

    let conflicts = detect_conflicts(&config.owners());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&conflicts)?);
    } else if conflicts.is_empty() {
        println!(
            "ok: {} source(s), no destination conflicts",
            config.sources.len()
        );
    } else {
        for conflict in &conflicts {
            print_conflict(conflict);
        }
        println!("{} destination conflict(s)", conflicts.len());
    }

    if strict && !conflicts.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_conflict(conflict: &PathConflict) {
    println!(
        "conflict: '{}' is written by both {} ({}) and {} ({})",
        conflict.path,
        conflict.first.source,
        conflict.first.from,
        conflict.second.source,
        conflict.second.from,
    );
}

fn run_status(cli: &Cli, only: Option<&str>, root: &Path) -> Result<ExitCode> {
    let (config, _) = VendorConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let lockfile = TomlLockfileRepository::new()
        .load(&root.join(LOCKFILE_NAME))
        .context("failed to load lockfile")?;

    let mut reports: Vec<DependencyDrift> = Vec::new();
    for source in &config.sources {
        if only.is_some_and(|name| name != source.name) {
            continue;
        }

        // Gather destination bytes up front; directory mappings are tracked
        // per-file at sync time and have no single destination file to read.
        let mut gathered = Vec::new();
        for mapping in &source.mappings {
            let dest = mapping.effective_destination()?;
            let path = root.join(&dest);
            if path.is_dir() {
                continue;
            }
            let current = match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to read {}", path.display()))
                }
            };
            gathered.push((mapping, current));
        }

        let entries: Vec<MappingContent<'_>> = gathered
            .iter()
            .map(|(mapping, current)| MappingContent {
                mapping: *mapping,
                current: current.as_deref(),
                upstream: Upstream::NotEvaluated,
            })
            .collect();

        let drift = vendo::verify_source(&source.name, lockfile.source(&source.name), &entries)?;
        reports.push(drift);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for drift in &reports {
            print_drift(drift, cli.verbose);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_drift(drift: &DependencyDrift, verbose: u8) {
    println!(
        "{}: {}% drift ({}/{} files changed, +{} -{})",
        drift.name,
        drift.stats.score(),
        drift.stats.changed_files,
        drift.stats.total_files,
        drift.stats.lines_added,
        drift.stats.lines_removed,
    );
    for file in &drift.files {
        let marker = match file.local {
            FileStatus::Unchanged => {
                if verbose == 0 {
                    continue;
                }
                ' '
            }
            FileStatus::Modified => 'M',
            FileStatus::Added => 'A',
            FileStatus::Deleted => 'D',
        };
        println!("  {} {}", marker, file.path);
    }
}
