//! Page layout for image grids
//!
//! This module handles the geometric calculations for placing images:
//! - Grid dimensions (columns per row, rows per page)
//! - Cell and caption bounds
//! - Aspect-preserving scaling and page breaks

mod grid;
mod placement;
mod types;

pub use grid::*;
pub use placement::*;
pub use types::*;
