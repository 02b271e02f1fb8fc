//! Command-line parsing for the temperature grid renderer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! aggregation and rendering code. Every option can also come from a
//! `HEATGRID_*` environment variable (or a `.env` file, loaded before parsing).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Statistic;
use crate::figure::layout::{MAX_CELL_SIZE, MIN_CELL_HEIGHT, MIN_CELL_WIDTH};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "heatgrid", version, about = "Year × month temperature heatmap with daily traces")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the grid to a standalone HTML file and open it.
    Render(GridArgs),
    /// Print the run summary and monthly table without writing anything.
    Summary(GridArgs),
}

/// Options shared by all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct GridArgs {
    /// Daily temperature CSV (`date`, `max_temperature`, `min_temperature`).
    #[arg(short = 'i', long, env = "HEATGRID_INPUT", default_value = "temperature_daily.csv")]
    pub input: PathBuf,

    /// Output HTML file.
    #[arg(short = 'o', long, env = "HEATGRID_OUTPUT", default_value = "hong_kong_temps_grid.html")]
    pub output: PathBuf,

    /// Which monthly statistic colors the cells.
    #[arg(short = 's', long, value_enum, env = "HEATGRID_STAT", default_value_t = Statistic::Max)]
    pub stat: Statistic,

    /// First year of the grid (inclusive).
    #[arg(long, env = "HEATGRID_START_YEAR", default_value_t = 2008)]
    pub start_year: i32,

    /// Last year of the grid (inclusive).
    #[arg(long, env = "HEATGRID_END_YEAR", default_value_t = 2017)]
    pub end_year: i32,

    /// Location name shown in the title.
    #[arg(long, env = "HEATGRID_LOCATION", default_value = "Hong Kong")]
    pub location: String,

    /// Do not open the written file in the default viewer.
    #[arg(long)]
    pub no_open: bool,

    /// Also export the monthly summary as JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Cell width in pixels.
    #[arg(
        long,
        default_value_t = 84,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_CELL_WIDTH)..=i64::from(MAX_CELL_SIZE))
    )]
    pub cell_width: u32,

    /// Cell height in pixels.
    #[arg(
        long,
        default_value_t = 52,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_CELL_HEIGHT)..=i64::from(MAX_CELL_SIZE))
    )]
    pub cell_height: u32,
}
