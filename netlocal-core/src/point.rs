//! Point types for local metric plots

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// One entry of a local metric point set
///
/// `size` drives the marker area and `value` is mapped through the colormap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub position: Point3d,
    pub size: f64,
    pub value: f64,
    pub label: String,
}

impl MetricPoint {
    /// Create a new metric point
    pub fn new(position: Point3d, size: f64, value: f64, label: impl Into<String>) -> Self {
        Self {
            position,
            size,
            value,
            label: label.into(),
        }
    }
}

impl Default for MetricPoint {
    fn default() -> Self {
        Self {
            position: Point3d::origin(),
            size: 20.0,
            value: 0.0,
            label: String::new(),
        }
    }
}
