//! Visualization of local network metrics
//!
//! This crate builds 3D scatter plots with per-point size and color encodings:
//! - A retained figure model (figure, 3D axes, scatter, labels, colorbar)
//! - The top-down local metric plot builder
//! - PNG and SVG output through plotters

pub mod artists;
pub mod axes3d;
pub mod camera;
pub mod colorbar;
pub mod config;
pub mod figure;
pub mod local_metric;
pub mod renderer;
pub mod ticker;

pub use artists::*;
pub use axes3d::*;
pub use camera::*;
pub use colorbar::*;
pub use config::*;
pub use figure::*;
pub use local_metric::*;
pub use renderer::register_font;
