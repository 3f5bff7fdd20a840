//! Core data structures for netlocal
//! 
//! This crate provides the fundamental types behind the local metric plot:
//! colors, linear-segmented colormaps, value normalisation and metric point sets.

pub mod color;
pub mod colormap;
pub mod point;
pub mod point_cloud;
pub mod error;

pub use color::*;
pub use colormap::*;
pub use point::*;
pub use point_cloud::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
