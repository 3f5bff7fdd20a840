//! Camera utilities for 3D axes
//!
//! The view is an orthographic projection from a camera placed on the unit
//! sphere at (elevation, azimuth), both in degrees.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Camera orientation of a 3D axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Elevation above the xy plane in degrees
    pub elevation: f64,
    /// Azimuth around the z axis in degrees
    pub azimuth: f64,
}

impl View {
    /// Create a new view
    pub fn new(elevation: f64, azimuth: f64) -> Self {
        Self { elevation, azimuth }
    }

    /// Looking straight down the z axis with x to the right and y up
    pub fn top_down() -> Self {
        Self::new(90.0, -90.0)
    }

    /// Screen-right, screen-up and towards-viewer unit vectors
    pub fn basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let (sa, ca) = self.azimuth.to_radians().sin_cos();
        let (se, ce) = self.elevation.to_radians().sin_cos();

        let right = Vector3::new(-sa, ca, 0.0);
        let up = Vector3::new(-ca * se, -sa * se, ce);
        let eye = Vector3::new(ce * ca, ce * sa, se);
        (right, up, eye)
    }

    /// Project a point onto the screen plane
    pub fn project(&self, point: &Point3<f64>) -> (f64, f64) {
        let (right, up, _) = self.basis();
        let v = point.coords;
        (v.dot(&right), v.dot(&up))
    }

    /// Distance along the viewing direction, larger is further from the viewer
    pub fn depth(&self, point: &Point3<f64>) -> f64 {
        let (_, _, eye) = self.basis();
        -point.coords.dot(&eye)
    }
}

impl Default for View {
    /// Matplotlib's default 3D view
    fn default() -> Self {
        Self::new(30.0, -60.0)
    }
}
