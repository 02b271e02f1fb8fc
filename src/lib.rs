//! `heatgrid` library crate.
//!
//! The binary (`heatgrid`) is a thin wrapper around this library so that:
//!
//! - ingest, aggregation and figure composition are testable without a browser
//! - the rendered document can be produced in-process (tests compare bytes)

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod figure;
pub mod io;
pub mod render;
pub mod report;
