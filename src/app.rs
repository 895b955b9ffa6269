//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads settings and installs the log subscriber
//! - parses CLI arguments
//! - runs the compilation pipeline with the right decision source
//! - prints summaries

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::prompt::ConsolePrompt;
use crate::cli::{Command, CompileArgs, ListArgs};
use crate::config::Settings;
use crate::domain::{CompileRequest, LossProfile};
use crate::error::AppError;

pub mod gate;
pub mod pipeline;

/// Entry point for the `energy-compiler` binary.
pub fn run() -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_filter);

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Compile(args) => handle_compile(args, &settings),
        Command::List(args) => handle_list(args),
    }
}

fn init_tracing(filter: &str) {
    // Logs go to stderr so stdout stays clean for summaries and JSON.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_compile(args: CompileArgs, settings: &Settings) -> Result<(), AppError> {
    let request = compile_request_from_args(&args, settings)?;

    let outcome = match args.on_existing {
        Some(mut policy) => pipeline::compile(&request, &mut policy)?,
        None => pipeline::compile(&request, &mut ConsolePrompt::stdio())?,
    };

    let multiplier = request.losses.multiplier();
    if args.json {
        let report = crate::report::run_report(&request.dataset_tag, multiplier, &outcome);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::new(4, format!("Failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        print!(
            "{}",
            crate::report::format_run_summary(&request.dataset_tag, multiplier, &outcome)
        );
    }

    Ok(())
}

fn handle_list(args: ListArgs) -> Result<(), AppError> {
    let files = crate::io::list_files(&args.source.dir, &args.source.tag, args.source.order)?;
    print!("{}", crate::report::format_file_list(&args.source.tag, &files));
    Ok(())
}

pub fn compile_request_from_args(args: &CompileArgs, settings: &Settings) -> Result<CompileRequest, AppError> {
    let losses = LossProfile::new(args.transformer_loss, args.line_loss)?;
    Ok(CompileRequest {
        source_dir: args.source.dir.clone(),
        dataset_tag: args.source.tag.clone(),
        losses,
        persist: args.save,
        output_root: args
            .output_root
            .clone()
            .unwrap_or_else(|| settings.output_root.clone()),
        file_order: args.source.order,
    })
}
