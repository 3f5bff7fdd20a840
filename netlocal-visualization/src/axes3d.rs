//! 3D axes: view, panes, chrome flags and the artists placed inside

use crate::artists::{FontProperties, Scatter3d, ScatterStyle, Text3d};
use crate::camera::View;
use crate::figure::{Placement, Rect};
use netlocal_core::{Colormap, Point3d, Result, Rgba};

/// Fraction of the data range added on each side when autoscaling
pub const AUTOSCALE_MARGIN: f64 = 0.05;

/// Default pane fill, matplotlib's translucent light grey
pub const DEFAULT_PANE_COLOR: Rgba = Rgba::new(0.95, 0.95, 0.95, 0.5);

/// Background plane behind the data, one per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pane {
    pub color: Rgba,
    pub edge_color: Rgba,
}

impl Default for Pane {
    fn default() -> Self {
        Self {
            color: DEFAULT_PANE_COLOR,
            edge_color: Rgba::new(0.0, 0.0, 0.0, 0.2),
        }
    }
}

/// Axis-aligned data limits of a 3D axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits3d {
    pub min: Point3d,
    pub max: Point3d,
}

impl Limits3d {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// Map a data point into the unit box centred on the origin
    pub fn normalize(&self, p: &Point3d) -> Point3d {
        let f = |v: f64, lo: f64, hi: f64| (v - lo) / (hi - lo) - 0.5;
        Point3d::new(
            f(p.x, self.min.x, self.max.x),
            f(p.y, self.min.y, self.max.y),
            f(p.z, self.min.z, self.max.z),
        )
    }
}

impl Default for Limits3d {
    fn default() -> Self {
        Self::new(Point3d::new(0.0, 0.0, 0.0), Point3d::new(1.0, 1.0, 1.0))
    }
}

/// A 3D-projected axes
#[derive(Debug, Clone)]
pub struct Axes3d {
    pub(crate) rect: Rect,
    pub(crate) placement: Placement,
    view: View,
    grid: bool,
    axis_on: bool,
    panes: [Pane; 3],
    box_aspect: [f64; 3],
    limits: Option<Limits3d>,
    scatters: Vec<Scatter3d>,
    texts: Vec<Text3d>,
}

impl Axes3d {
    pub(crate) fn new(rect: Rect, placement: Placement) -> Self {
        Self {
            rect,
            placement,
            view: View::default(),
            grid: true,
            axis_on: true,
            panes: [Pane::default(); 3],
            box_aspect: [4.0, 4.0, 3.0],
            limits: None,
            scatters: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Position in figure-fraction coordinates
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Set the camera elevation and azimuth in degrees
    pub fn view_init(&mut self, elevation: f64, azimuth: f64) {
        self.view = View::new(elevation, azimuth);
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn elevation(&self) -> f64 {
        self.view.elevation
    }

    pub fn azimuth(&self) -> f64 {
        self.view.azimuth
    }

    /// Toggle grid lines on the panes
    pub fn grid(&mut self, visible: bool) {
        self.grid = visible;
    }

    pub fn grid_visible(&self) -> bool {
        self.grid
    }

    /// Hide panes, box edges and grid entirely
    pub fn set_axis_off(&mut self) {
        self.axis_on = false;
    }

    pub fn set_axis_on(&mut self) {
        self.axis_on = true;
    }

    pub fn axis_visible(&self) -> bool {
        self.axis_on
    }

    /// Panes in x, y, z order
    pub fn panes(&self) -> &[Pane; 3] {
        &self.panes
    }

    /// Set the fill color of the pane behind axis `axis` (0 = x, 1 = y, 2 = z)
    pub fn set_pane_color(&mut self, axis: usize, color: Rgba) {
        if let Some(pane) = self.panes.get_mut(axis) {
            pane.color = color;
        }
    }

    pub fn box_aspect(&self) -> [f64; 3] {
        self.box_aspect
    }

    pub fn set_box_aspect(&mut self, aspect: [f64; 3]) {
        self.box_aspect = aspect;
    }

    /// Fix the data limits instead of autoscaling
    pub fn set_limits(&mut self, limits: Limits3d) {
        self.limits = Some(limits);
    }

    /// Data limits, autoscaled from the scatter data unless fixed
    pub fn limits(&self) -> Limits3d {
        self.limits.unwrap_or_else(|| self.autoscale())
    }

    fn autoscale(&self) -> Limits3d {
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        let finite = self
            .scatters
            .iter()
            .flat_map(|s| s.offsets().iter())
            .filter(|p| p.iter().all(|v| v.is_finite()));
        for p in finite {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
        }

        let mut min = [0.0; 3];
        let mut max = [1.0; 3];
        for axis in 0..3 {
            if lo[axis] > hi[axis] {
                continue;
            }
            let span = hi[axis] - lo[axis];
            if span == 0.0 {
                min[axis] = lo[axis] - 0.5;
                max[axis] = hi[axis] + 0.5;
            } else {
                min[axis] = lo[axis] - span * AUTOSCALE_MARGIN;
                max[axis] = hi[axis] + span * AUTOSCALE_MARGIN;
            }
        }
        Limits3d::new(
            Point3d::new(min[0], min[1], min[2]),
            Point3d::new(max[0], max[1], max[2]),
        )
    }

    /// Add a scatter collection, returning its index within this axes
    pub fn scatter(
        &mut self,
        offsets: Vec<Point3d>,
        sizes: Vec<f64>,
        values: Vec<f64>,
        cmap: Colormap,
        style: &ScatterStyle,
    ) -> Result<usize> {
        self.scatters
            .push(Scatter3d::new(offsets, sizes, values, cmap, style)?);
        Ok(self.scatters.len() - 1)
    }

    /// Add a text label anchored at `position`
    pub fn text(
        &mut self,
        position: Point3d,
        content: impl Into<String>,
        font: FontProperties,
        color: Rgba,
    ) -> usize {
        self.texts.push(Text3d::new(position, content, font, color));
        self.texts.len() - 1
    }

    pub fn scatters(&self) -> &[Scatter3d] {
        &self.scatters
    }

    pub fn scatters_mut(&mut self) -> &mut [Scatter3d] {
        &mut self.scatters
    }

    pub fn texts(&self) -> &[Text3d] {
        &self.texts
    }

    pub fn texts_mut(&mut self) -> &mut [Text3d] {
        &mut self.texts
    }

    /// Projects data points into pixel space for a given axes pixel box
    pub fn projector(&self, origin: (f64, f64), size: (f64, f64)) -> Projector {
        Projector::new(self.view, self.limits(), self.box_aspect, origin, size)
    }
}

/// Data-to-pixel mapping of a 3D axes
///
/// The normalised data box is scaled by the box aspect, projected with the
/// view, and fitted into the pixel box with equal scale on both screen axes.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    view: View,
    limits: Limits3d,
    aspect: [f64; 3],
    center: (f64, f64),
    scale: f64,
}

impl Projector {
    pub fn new(
        view: View,
        limits: Limits3d,
        box_aspect: [f64; 3],
        origin: (f64, f64),
        size: (f64, f64),
    ) -> Self {
        let largest = box_aspect.iter().cloned().fold(f64::MIN_POSITIVE, f64::max);
        let aspect = [
            box_aspect[0] / largest,
            box_aspect[1] / largest,
            box_aspect[2] / largest,
        ];

        let mut extent: f64 = 0.0;
        for corner in box_corners(aspect) {
            let (sx, sy) = view.project(&corner);
            extent = extent.max(sx.abs()).max(sy.abs());
        }
        let extent = if extent > 0.0 { extent } else { 0.5 };
        let scale = size.0.min(size.1) / (2.0 * extent);

        Self {
            view,
            limits,
            aspect,
            center: (origin.0 + size.0 / 2.0, origin.1 + size.1 / 2.0),
            scale,
        }
    }

    fn to_box(&self, p: &Point3d) -> Point3d {
        let n = self.limits.normalize(p);
        Point3d::new(n.x * self.aspect[0], n.y * self.aspect[1], n.z * self.aspect[2])
    }

    /// Pixel coordinates of a data point, y growing downwards
    pub fn to_pixel(&self, p: &Point3d) -> (f64, f64) {
        self.box_to_pixel(&self.to_box(p))
    }

    /// Depth of a data point along the viewing direction, larger is further
    pub fn depth(&self, p: &Point3d) -> f64 {
        self.view.depth(&self.to_box(p))
    }

    /// Pixel coordinates of a point already in box space
    pub fn box_to_pixel(&self, b: &Point3d) -> (f64, f64) {
        let (sx, sy) = self.view.project(b);
        (self.center.0 + sx * self.scale, self.center.1 - sy * self.scale)
    }

    /// The eight corners of the scaled data box
    pub fn corners(&self) -> [Point3d; 8] {
        box_corners(self.aspect)
    }

    /// Scaled box half-extents
    pub fn half_extents(&self) -> [f64; 3] {
        [self.aspect[0] / 2.0, self.aspect[1] / 2.0, self.aspect[2] / 2.0]
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn limits(&self) -> Limits3d {
        self.limits
    }
}

fn box_corners(aspect: [f64; 3]) -> [Point3d; 8] {
    let [hx, hy, hz] = [aspect[0] / 2.0, aspect[1] / 2.0, aspect[2] / 2.0];
    let mut corners = [Point3d::origin(); 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let sx = if i & 1 == 0 { -hx } else { hx };
        let sy = if i & 2 == 0 { -hy } else { hy };
        let sz = if i & 4 == 0 { -hz } else { hz };
        *corner = Point3d::new(sx, sy, sz);
    }
    corners
}
