//! cpf - Copy File
//!
//! A single file copy command powered by cpfile.

use clap::{Parser, ValueEnum};
use cpfile::{
    CloneMode, CopyOptions, CopyOutcome, Error as CopyError, ErrorKind, ProgressRecord, Strategy,
    copy_file_sync, create_progress_bar, progress_bar_callback, spawn_copy,
};
use serde_json::{Value, json};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

/// cpf - Copy a single file
///
/// Copies SOURCE to DEST, creating missing parent directories, preserving
/// timestamps and permissions, and using a copy-on-write clone when the
/// filesystem supports it.
///
/// Usage:
///   cpf SOURCE DEST
#[derive(Parser, Debug)]
#[command(name = "cpf", version, about, long_about = None)]
struct Args {
    /// File to copy (symlinks are followed)
    source: PathBuf,

    /// Destination file path
    dest: PathBuf,

    /// Do not overwrite an existing destination
    #[arg(short = 'n', long)]
    no_clobber: bool,

    /// Copy-on-write clone behaviour
    #[arg(long, value_enum, default_value = "auto")]
    clone: CloneArg,

    /// Mode for created parent directories, in octal
    #[arg(long, value_name = "OCTAL", value_parser = parse_mode, default_value = "777")]
    directory_mode: u32,

    /// Resolve relative paths against DIR
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Use the blocking copy loop instead of the async pipeline
    #[arg(long)]
    sync: bool,

    /// Do not preserve file timestamps
    #[arg(long)]
    no_times: bool,

    /// Do not preserve file permissions
    #[arg(long)]
    no_perms: bool,

    /// Preserve owner and group (usually requires root)
    #[arg(long)]
    owner: bool,

    /// Do not call fsync before applying metadata (faster but less safe)
    #[arg(long)]
    no_fsync: bool,

    /// Disable progress bar and summary
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Print the result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CloneArg {
    /// Clone when the filesystem looks capable, otherwise copy bytes
    Auto,
    /// Clone or fail
    Force,
    /// Always copy bytes
    Never,
}

impl From<CloneArg> for CloneMode {
    fn from(arg: CloneArg) -> Self {
        match arg {
            CloneArg::Auto => CloneMode::Auto,
            CloneArg::Force => CloneMode::Force,
            CloneArg::Never => CloneMode::Disabled,
        }
    }
}

fn parse_mode(value: &str) -> Result<u32, String> {
    let digits = value.trim_start_matches("0o");
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        Ok(_) => Err(format!("mode `{value}` is out of range")),
        Err(_) => Err(format!("`{value}` is not an octal mode")),
    }
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Copy(#[from] CopyError),

    #[error("Failed to start async runtime: {source}")]
    Runtime { source: io::Error },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Copy(error) => error.code().unwrap_or("EINVAL"),
            Self::Runtime { .. } | Self::JsonSerialize { .. } => "INTERNAL",
        }
    }

    fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Copy(error) if error.kind() == ErrorKind::InvalidArgument)
    }

    fn to_json_value(&self, args: &Args) -> Value {
        json!({
            "source": display_path(&args.source),
            "destination": display_path(&args.dest),
            "status": "failed",
            "errorCode": self.code(),
            "errorMessage": self.to_string(),
        })
    }
}

fn exit_code_for(error: &CliError) -> i32 {
    if error.is_invalid_input() { 2 } else { 1 }
}

fn main() {
    let args = Args::parse();
    if let Err(error) = run(&args) {
        if args.json {
            // Best effort; the stderr line below is authoritative
            let _ = print_json_value(&error.to_json_value(&args));
        }
        eprintln!("error[{}]: {}", error.code(), error);
        std::process::exit(exit_code_for(&error));
    }
}

fn build_options(args: &Args) -> CopyOptions {
    let mut options = CopyOptions::default()
        .with_overwrite(!args.no_clobber)
        .with_clone_mode(args.clone.into())
        .with_directory_mode(args.directory_mode);

    if let Some(ref cwd) = args.cwd {
        options = options.with_working_directory(cwd);
    }
    if args.no_times {
        options = options.without_timestamps();
    }
    if args.no_perms {
        options = options.without_permissions();
    }
    if args.owner {
        options = options.with_ownership();
    }
    if args.no_fsync {
        options = options.without_fsync();
    }
    options
}

fn run(args: &Args) -> CliResult<()> {
    let mut options = build_options(args);

    let pb = if !args.quiet && !args.json {
        let pb = create_progress_bar(0);
        options.on_progress = Some(progress_bar_callback(pb.clone()));
        Some(pb)
    } else {
        None
    };

    let start_time = Instant::now();
    let result = if args.sync {
        copy_blocking(args, options)
    } else {
        copy_async(args, options)
    };
    let duration = start_time.elapsed();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let (outcome, last_record) = result?;

    if args.json {
        let value = json!({
            "source": display_path(&args.source),
            "destination": display_path(&args.dest),
            "outcome": serde_json::to_value(outcome)
                .map_err(|source| CliError::JsonSerialize { source })?,
            "progress": serde_json::to_value(&last_record)
                .map_err(|source| CliError::JsonSerialize { source })?,
        });
        print_json_value(&value)?;
    } else if !args.quiet {
        print_outcome(args, outcome, duration);
    }
    Ok(())
}

type Finished = (CopyOutcome, Option<ProgressRecord>);

fn copy_blocking(args: &Args, options: CopyOptions) -> CliResult<Finished> {
    let last = Arc::new(Mutex::new(None));
    let sink = last.clone();
    let previous = options.on_progress.clone();
    let options = options.with_progress(move |record| {
        if let Some(ref previous) = previous {
            previous(record);
        }
        if let Ok(mut slot) = sink.lock() {
            *slot = Some(record.clone());
        }
    });

    let outcome = copy_file_sync(&args.source, &args.dest, &options)?;
    let record = last.lock().ok().and_then(|mut slot| slot.take());
    Ok((outcome, record))
}

fn copy_async(args: &Args, options: CopyOptions) -> CliResult<Finished> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| CliError::Runtime { source })?;

    runtime.block_on(async {
        let handle = spawn_copy(&args.source, &args.dest, options);
        let progress = handle.progress();
        let outcome = handle.wait().await?;
        let record = progress.borrow().clone();
        Ok::<Finished, CliError>((outcome, record))
    })
}

fn print_outcome(args: &Args, outcome: CopyOutcome, duration: Duration) {
    match outcome {
        CopyOutcome::SkippedExists => {
            println!("Skipped: {} already exists", args.dest.display());
        }
        CopyOutcome::Copied { bytes, strategy } => {
            let how = match strategy {
                Strategy::Reflink => "cloned",
                Strategy::Streamed | Strategy::Buffered => "copied",
            };
            if args.verbose {
                println!("Copy completed in {:?}", duration);
                println!("  Source:       {}", args.source.display());
                println!("  Destination:  {}", args.dest.display());
                println!("  Strategy:     {:?}", strategy);
                println!("  Total size:   {}", format_bytes(bytes));

                if duration.as_secs_f64() > 0.0 && strategy != Strategy::Reflink {
                    let speed = bytes as f64 / duration.as_secs_f64();
                    println!("  Speed:        {}/s", format_bytes(speed as u64));
                }
            } else {
                println!("{} {} ({})", capitalize(how), args.dest.display(), format_bytes(bytes));
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
