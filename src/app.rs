//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs ingest, aggregation and rendering
//! - writes the HTML document (and optional JSON summary)
//! - hands the file to the default viewer

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Command, GridArgs};
use crate::domain::{GridConfig, YearRange};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `heatgrid` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    // `heatgrid` and `heatgrid -i data.csv` behave like `heatgrid render ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Render(args) => handle_render(&args),
        Command::Summary(args) => handle_summary(&args),
    }
}

fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so stdout stays clean for the summary.
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_render(args: &GridArgs) -> Result<(), AppError> {
    let config = config_from_args(args)?;
    let out = render_to_disk(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&out.run.ingest, &out.run.grid, &config)
    );
    println!("Output: {}", config.output_path.display());

    // Only reached once the document is on disk.
    if config.open_viewer {
        crate::io::viewer::open_in_viewer(&config.output_path);
    }

    Ok(())
}

fn handle_summary(args: &GridArgs) -> Result<(), AppError> {
    let config = config_from_args(args)?;
    let run = pipeline::build_grid(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.grid, &config)
    );
    println!(
        "{}",
        crate::report::format_month_table(&run.grid, config.statistic)
    );
    Ok(())
}

/// Run the pipeline and write the document (plus the optional JSON summary).
///
/// Nothing is written unless ingest and rendering both succeed.
pub fn render_to_disk(config: &GridConfig) -> Result<pipeline::RenderOutput, AppError> {
    let out = pipeline::run_render(config)?;

    crate::io::export::write_document_atomic(&config.output_path, &out.document)?;
    if let Some(path) = &config.export_json {
        crate::io::export::write_summary_json(path, &out.run.grid, config)?;
    }
    Ok(out)
}

pub fn config_from_args(args: &GridArgs) -> Result<GridConfig, AppError> {
    let years = YearRange::new(args.start_year, args.end_year).ok_or_else(|| {
        AppError::input(format!(
            "Invalid year range {}..={}: start must not be after end, and at most {} years fit the grid.",
            args.start_year,
            args.end_year,
            YearRange::MAX_YEARS
        ))
    })?;

    Ok(GridConfig {
        csv_path: args.input.clone(),
        output_path: args.output.clone(),
        statistic: args.stat,
        years,
        location: args.location.clone(),
        open_viewer: !args.no_open,
        export_json: args.export_json.clone(),
        cell_width: args.cell_width,
        cell_height: args.cell_height,
    })
}

/// Rewrite argv so `heatgrid` defaults to `heatgrid render`.
///
/// Rules:
/// - `heatgrid`                        -> `heatgrid render`
/// - `heatgrid -s min ...`             -> `heatgrid render -s min ...`
/// - `heatgrid --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("render".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "render" | "summary");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "render flags".
    if arg1.starts_with('-') {
        argv.insert(1, "render".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
