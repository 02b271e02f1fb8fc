//! Rendering: `Figure` -> SVG (Plotters) -> standalone HTML.

pub mod html;
pub mod svg;

pub use html::render_document;
pub use svg::render_svg;
