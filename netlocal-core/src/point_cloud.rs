//! Point set container

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A generic ordered point container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// A point set carrying size, color value and label per point
pub type MetricPointCloud = PointCloud<MetricPoint>;

/// Parallel per-point columns of a [`MetricPointCloud`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricColumns {
    pub sizes: Vec<f64>,
    pub values: Vec<f64>,
    pub positions: Vec<Point3d>,
    pub labels: Vec<String>,
}

impl MetricColumns {
    /// Number of points
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if there are no points
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Coordinates flattened row-major, three values per point
    pub fn flat_coordinates(&self) -> Vec<f64> {
        self.positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }
}

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
        }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IndexMut<usize> for PointCloud<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.points[index]
    }
}

impl<T> IntoIterator for PointCloud<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}

impl PointCloud<MetricPoint> {
    /// Split the cloud into parallel columns, preserving point order
    pub fn columns(&self) -> MetricColumns {
        let mut columns = MetricColumns {
            sizes: Vec::with_capacity(self.len()),
            values: Vec::with_capacity(self.len()),
            positions: Vec::with_capacity(self.len()),
            labels: Vec::with_capacity(self.len()),
        };
        for point in &self.points {
            columns.sizes.push(point.size);
            columns.values.push(point.value);
            columns.positions.push(point.position);
            columns.labels.push(point.label.clone());
        }
        columns
    }

    /// Axis-aligned bounds of the point positions, `None` when empty
    pub fn bounds(&self) -> Option<(Point3d, Point3d)> {
        let first = self.points.first()?.position;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(&p.position), hi.sup(&p.position))
        }))
    }
}
