use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use song_metadata_copier as lib;
use lib::config::Config;
use lib::models::CopyOutcome;
use std::path::{Path, PathBuf};
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "song-metadata-copier", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy metadata from one reference file onto one target file
    Single {
        /// Original song carrying the correct metadata
        #[arg(long, value_name = "FILE")]
        reference: PathBuf,

        /// Song to receive the metadata
        #[arg(long, value_name = "FILE")]
        target: PathBuf,

        #[command(flatten)]
        opts: TransferArgs,
    },
    /// Match references to targets by file name and copy metadata onto every match
    Batch {
        /// Reference files or directories
        #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
        references: Vec<PathBuf>,

        /// Target files or directories
        #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
        targets: Vec<PathBuf>,

        /// Print the match report as JSON on stdout
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        opts: TransferArgs,
    },
    /// Validate config file and exit
    ConfigValidate,
}

#[derive(Args)]
struct TransferArgs {
    /// New album name for every target (overrides copied album)
    #[arg(long, value_name = "NAME")]
    album: Option<String>,

    /// Copy the track number as well (it is left untouched by default)
    #[arg(long)]
    keep_track_number: bool,

    /// Delete the reference file(s) after processing
    #[arg(long)]
    delete_reference: bool,

    /// Directory results are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

impl TransferArgs {
    fn apply_to(&self, cfg: &mut Config) {
        if let Some(album) = &self.album {
            cfg.album_override = album.clone();
        }
        if self.keep_track_number {
            cfg.delete_track_number = false;
        }
        if self.delete_reference {
            cfg.delete_reference = true;
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref());
    let mut cfg = match (&cli.command, loaded) {
        (Commands::ConfigValidate, Ok(_)) => {
            println!("OK");
            return Ok(());
        }
        (Commands::ConfigValidate, Err(e)) => {
            eprintln!("Config validation failed: {}", e);
            std::process::exit(2);
        }
        (_, loaded) => loaded.with_context(|| match &cli.config {
            Some(p) => format!("loading config from {}", p.display()),
            None => "loading default config".to_string(),
        })?,
    };

    let _guard = init_logging(cfg.log_dir.as_deref())?;

    match cli.command {
        Commands::Single { reference, target, opts } => {
            opts.apply_to(&mut cfg);
            let settings = cfg.transfer_settings();
            let result = lib::transfer::run_single(&settings, &reference, &target)
                .with_context(|| format!("transferring {} -> {}", reference.display(), target.display()))?;

            match &result.outcome {
                CopyOutcome::Applied(report) => {
                    let out = result.delivery.write_to_dir(&cfg.output_dir)?;
                    println!("Metadata transferred ({} field(s) copied)", report.copied.len());
                    println!("Wrote {} ({})", out.display(), result.delivery.mime_type);
                }
                CopyOutcome::Skipped { reason } => {
                    println!("Nothing to do for {}: {}", target.display(), reason);
                }
            }
            if result.reference_deleted {
                println!("Deleted {}", reference.display());
            }
        }
        Commands::Batch { references, targets, json, opts } => {
            opts.apply_to(&mut cfg);
            let settings = cfg.transfer_settings();
            let references = lib::util::collect_audio_files(&references, &cfg.file_extensions);
            let targets = lib::util::collect_audio_files(&targets, &cfg.file_extensions);

            let result = lib::transfer::run_batch(&settings, &references, &targets)
                .with_context(|| "running batch transfer".to_string())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result.report)?);
            } else {
                print_batch_report(&result.report);
            }

            match &result.archive {
                Some(archive) => {
                    let out = archive.write_to_dir(&cfg.output_dir)?;
                    if !json {
                        println!("Batch processing complete: {}", out.display());
                    }
                }
                None => {
                    if !json {
                        println!("No files were processed.");
                    }
                }
            }
        }
        Commands::ConfigValidate => {}
    }

    Ok(())
}

fn print_batch_report(report: &lib::transfer::BatchReport) {
    for r in &report.references {
        match r.skipped {
            Some(lib::models::SkipReason::NoMatch) => println!("⚠ No match for {}", r.reference),
            Some(reason) => println!("- Skipped {}: {}", r.reference, reason),
            None => println!("✔ {} matched {} file(s)", r.reference, r.targets.len()),
        }
    }
}

/// Initialize log->tracing bridge and structured logging. Logs go to stderr
/// (stdout carries results) and, when configured, a daily-rotated file.
fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let _ = LogTracer::init();

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "song-metadata-copier.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().with_ansi(false).with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer);

    tracing_subscriber_global::set_global_default(subscriber)
        .context("failed to set global tracing subscriber")?;
    Ok(guard)
}
