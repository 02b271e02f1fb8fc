//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - HTML and JSON summary writers (`export`)
//! - launching the default viewer (`viewer`)

pub mod export;
pub mod ingest;
pub mod viewer;

pub use export::*;
pub use ingest::*;
pub use viewer::*;
