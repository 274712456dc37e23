//! codelinks — collect `[[ID, Title, Type, Links, Status]]` implementation
//! links from source comments and report them.
//!
//! - **stdin mode**: `codelinks < file` scans the whole input
//! - **file mode**: `codelinks -f json -o links.json src/ include/*.h`
//!
//! Exit status is 1 when any annotation is rejected, an id is declared twice,
//! or (with `--strict`) a link names no known item.

mod comments;
mod config;
mod model;
mod render;
mod toc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use codelinks_syntax::{scan_regions, ScannedBuffer, TextRegion};
use config::{Config, Settings};
use model::Report;
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "codelinks",
    about = "Collect implementation-link annotations from source comments"
)]
struct Cli {
    /// Input files, directories or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Write the report to this file (or `codelinks.<ext>` inside this directory)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long)]
    format: Option<String>,

    /// Treat links and references to unknown items as errors
    #[arg(long, overrides_with = "no_strict")]
    strict: bool,

    /// Turn off `strict` from the configuration file
    #[arg(long, overrides_with = "strict")]
    no_strict: bool,

    /// Scan whole files instead of comments only
    #[arg(long, overrides_with = "no_raw")]
    raw: bool,

    /// Turn off `raw` from the configuration file
    #[arg(long, overrides_with = "raw")]
    no_raw: bool,

    /// Every id must match this regular expression
    #[arg(long, value_name = "REGEX")]
    id_pattern: Option<String>,

    /// Id-reference marker, e.g. '@need-ids:'. Can be specified multiple times.
    #[arg(long = "marker", value_name = "TEXT")]
    markers: Vec<String>,

    /// File extension picked up from directories. Can be specified multiple times.
    #[arg(long = "include", value_name = "EXT")]
    include: Vec<String>,

    /// Configuration file (default: ./codelinks.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Flags that override the configuration file.
    fn as_config(&self) -> Config {
        Config {
            id_pattern: self.id_pattern.clone(),
            id_ref_markers: (!self.markers.is_empty()).then(|| self.markers.clone()),
            strict: switch(self.strict, self.no_strict),
            format: self.format.clone(),
            raw: switch(self.raw, self.no_raw),
            include: (!self.include.is_empty()).then(|| self.include.clone()),
        }
    }
}

/// `--x` / `--no-x` pair; `None` leaves the configuration file in charge.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?.merge(cli.as_config());
    let settings = Settings::try_from(config)?;
    let renderer = render::create_renderer(&settings.format)?;

    let buffers = if cli.files.is_empty() {
        vec![stdin_mode(&settings)?]
    } else {
        let input_files = expand_globs(&cli.files, &settings.include)?;
        file_mode(&input_files, &settings)?
    };

    let report = Report::new(buffers, settings.strict);
    if !report.is_clean() {
        warn!("{} problem(s) found", report.diagnostics.len());
    }
    let output = renderer.render(&report)?;
    write_output(cli.output.as_deref(), renderer.file_extension(), &output)?;

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// stdin mode: the whole input is one buffer, scanned raw.
fn stdin_mode(settings: &Settings) -> Result<ScannedBuffer> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    let scanned = scan_regions(&[TextRegion::whole(&input)], &settings.options);
    Ok(ScannedBuffer::new("<stdin>", scanned))
}

/// file mode: scan every file in parallel; results keep the input order.
fn file_mode(files: &[PathBuf], settings: &Settings) -> Result<Vec<ScannedBuffer>> {
    let scanned: Vec<Option<ScannedBuffer>> = files
        .par_iter()
        .map(|path| scan_file(path, settings))
        .collect::<Result<_>>()?;
    Ok(scanned.into_iter().flatten().collect())
}

/// Scan one file's comments (or all of it with `--raw`). Files without a
/// known comment syntax are skipped unless scanning raw, and files that are
/// not UTF-8 are always skipped.
fn scan_file(path: &Path, settings: &Settings) -> Result<Option<ScannedBuffer>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let Ok(content) = String::from_utf8(bytes) else {
        warn!("skipping {}: not valid UTF-8", path.display());
        return Ok(None);
    };
    let regions = if settings.raw {
        vec![TextRegion::whole(&content)]
    } else {
        match comments::Syntax::from_path(path) {
            Some(syntax) => comments::isolate(&content, syntax),
            None => {
                warn!("skipping {}: unsupported file type (use --raw)", path.display());
                return Ok(None);
            }
        }
    };
    debug!("{}: {} region(s)", path.display(), regions.len());
    let scanned = scan_regions(&regions, &settings.options);
    Ok(Some(ScannedBuffer::new(path.to_string_lossy(), scanned)))
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for `include` extensions.
fn expand_globs(patterns: &[String], include: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for included extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_extension(&p, include) {
                    files.push(p);
                }
            }
            continue;
        }
        // Try as glob
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_extension(path: &Path, include: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| include.iter().any(|i| i == ext))
}

/// Print to stdout, or write to `output` (a file, or a directory that gets
/// `codelinks.<ext>`).
fn write_output(output: Option<&Path>, ext: &str, report: &str) -> Result<()> {
    let Some(output) = output else {
        print!("{}", report);
        return Ok(());
    };
    let out_path = if output.is_dir() {
        output.join(format!("codelinks.{}", ext))
    } else {
        output.to_path_buf()
    };
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }
    fs::write(&out_path, report)
        .with_context(|| format!("failed to write {}", out_path.display()))
}
