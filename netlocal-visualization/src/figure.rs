//! Figure: the owner of every axes, artist and colorbar
//!
//! Artists are addressed through small typed handles handed out by the
//! figure, so callers can keep customising a plot after it was built.

use crate::axes3d::Axes3d;
use crate::colorbar::Colorbar;
use crate::artists::Scatter3d;
use netlocal_core::{Error, Result, Rgba};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use tracing::debug;

/// Padding used by [`Figure::tight_layout`], as a multiple of the 10pt font size
pub const TIGHT_LAYOUT_PAD: f64 = 1.08;

/// Rectangle in figure-fraction coordinates, origin at the bottom left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Build from a `[left, bottom, width, height]` array
    pub fn from_array(r: [f64; 4]) -> Self {
        Self::new(r[0], r[1], r[2], r[3])
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    /// Pixel box `(x, y, width, height)` with y measured from the top
    pub fn to_pixels(&self, size: (u32, u32)) -> (f64, f64, f64, f64) {
        let (w, h) = (size.0 as f64, size.1 as f64);
        (
            self.left * w,
            (1.0 - self.top()) * h,
            self.width * w,
            self.height * h,
        )
    }
}

/// How an axes got its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Positioned by the figure's subplot parameters
    Subplot,
    /// Positioned explicitly with [`Figure::add_axes`]
    Manual,
}

/// Figure-fraction bounds of the subplot area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubplotParams {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl SubplotParams {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.bottom, self.right - self.left, self.top - self.bottom)
    }
}

impl Default for SubplotParams {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
        }
    }
}

/// Handle to a 3D axes of a figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxesHandle(pub(crate) usize);

/// Handle to a plain (colorbar) axes of a figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Axes2dHandle(pub(crate) usize);

/// Handle to a scatter collection inside a 3D axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScatterHandle {
    pub(crate) axes: AxesHandle,
    pub(crate) index: usize,
}

impl ScatterHandle {
    /// The axes holding this scatter
    pub fn axes(&self) -> AxesHandle {
        self.axes
    }
}

/// Handle to a colorbar of a figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorbarHandle(pub(crate) usize);

/// A plain axes used as a drawing region (colorbar host)
#[derive(Debug, Clone, PartialEq)]
pub struct Axes2d {
    pub(crate) rect: Rect,
}

impl Axes2d {
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// A figure of fixed physical size
#[derive(Debug, Clone)]
pub struct Figure {
    size_inches: (f64, f64),
    dpi: f64,
    pub facecolor: Rgba,
    subplot_params: SubplotParams,
    axes: Vec<Axes3d>,
    plain_axes: Vec<Axes2d>,
    colorbars: Vec<Colorbar>,
}

impl Figure {
    /// Create an empty figure, size in inches
    pub fn new(width: f64, height: f64, dpi: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(Error::InvalidData(format!(
                "figure size must be positive, got {}x{}",
                width, height
            )));
        }
        if !(dpi > 0.0 && dpi.is_finite()) {
            return Err(Error::InvalidData(format!("dpi must be positive, got {}", dpi)));
        }
        Ok(Self {
            size_inches: (width, height),
            dpi,
            facecolor: Rgba::WHITE,
            subplot_params: SubplotParams::default(),
            axes: Vec::new(),
            plain_axes: Vec::new(),
            colorbars: Vec::new(),
        })
    }

    pub fn size_inches(&self) -> (f64, f64) {
        self.size_inches
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Pixel dimensions at `dpi`
    pub fn pixel_size(&self, dpi: f64) -> (u32, u32) {
        let px = |inches: f64| ((inches * dpi).round() as u32).max(1);
        (px(self.size_inches.0), px(self.size_inches.1))
    }

    pub fn subplot_params(&self) -> SubplotParams {
        self.subplot_params
    }

    /// Add a 3D axes in the single-subplot position
    pub fn add_subplot_3d(&mut self) -> AxesHandle {
        self.axes
            .push(Axes3d::new(self.subplot_params.rect(), Placement::Subplot));
        AxesHandle(self.axes.len() - 1)
    }

    /// Add a plain axes at an explicit figure-fraction rectangle
    pub fn add_axes(&mut self, rect: Rect) -> Axes2dHandle {
        self.plain_axes.push(Axes2d { rect });
        Axes2dHandle(self.plain_axes.len() - 1)
    }

    /// Move the subplot area edges; `None` keeps the current value
    pub fn subplots_adjust(
        &mut self,
        left: Option<f64>,
        bottom: Option<f64>,
        right: Option<f64>,
        top: Option<f64>,
    ) -> Result<()> {
        let mut params = self.subplot_params;
        params.left = left.unwrap_or(params.left);
        params.bottom = bottom.unwrap_or(params.bottom);
        params.right = right.unwrap_or(params.right);
        params.top = top.unwrap_or(params.top);
        if params.left >= params.right || params.bottom >= params.top {
            return Err(Error::InvalidData(format!(
                "subplot bounds are inverted: left={} right={} bottom={} top={}",
                params.left, params.right, params.bottom, params.top
            )));
        }
        self.set_subplot_params(params);
        Ok(())
    }

    fn set_subplot_params(&mut self, params: SubplotParams) {
        self.subplot_params = params;
        let rect = params.rect();
        for ax in self.axes.iter_mut().filter(|ax| ax.placement == Placement::Subplot) {
            ax.rect = rect;
        }
    }

    /// Shrink subplot padding to a fixed margin
    ///
    /// Manually placed axes (colorbars) keep their position and the subplot
    /// area stops short of the leftmost one.
    pub fn tight_layout(&mut self) {
        let pad_inches = TIGHT_LAYOUT_PAD * 10.0 / 72.0;
        let pad_x = pad_inches / self.size_inches.0;
        let pad_y = pad_inches / self.size_inches.1;

        let reserved = self
            .plain_axes
            .iter()
            .map(|ax| ax.rect.left)
            .filter(|left| *left > 0.5)
            .fold(1.0, f64::min);

        let params = SubplotParams {
            left: pad_x,
            right: (reserved - pad_x).max(pad_x + f64::EPSILON),
            bottom: pad_y,
            top: 1.0 - pad_y,
        };
        debug!(?params, "tight layout");
        self.set_subplot_params(params);
    }

    /// Attach a colorbar for `mappable`, drawn into `cax`
    pub fn colorbar(&mut self, mappable: ScatterHandle, cax: Axes2dHandle) -> Result<ColorbarHandle> {
        if cax.0 >= self.plain_axes.len() {
            return Err(Error::InvalidData(format!("unknown colorbar axes {}", cax.0)));
        }
        let scatter = self
            .get_scatter(mappable)
            .ok_or_else(|| Error::InvalidData("unknown scatter handle".into()))?;
        let cbar = Colorbar::new(mappable, scatter, cax);
        self.colorbars.push(cbar);
        Ok(ColorbarHandle(self.colorbars.len() - 1))
    }

    pub fn axes(&self) -> &[Axes3d] {
        &self.axes
    }

    pub fn plain_axes(&self) -> &[Axes2d] {
        &self.plain_axes
    }

    pub fn colorbars(&self) -> &[Colorbar] {
        &self.colorbars
    }

    pub fn get_axes(&self, handle: AxesHandle) -> Option<&Axes3d> {
        self.axes.get(handle.0)
    }

    pub fn get_axes_mut(&mut self, handle: AxesHandle) -> Option<&mut Axes3d> {
        self.axes.get_mut(handle.0)
    }

    pub fn get_scatter(&self, handle: ScatterHandle) -> Option<&Scatter3d> {
        self.get_axes(handle.axes)?.scatters().get(handle.index)
    }

    pub fn get_scatter_mut(&mut self, handle: ScatterHandle) -> Option<&mut Scatter3d> {
        self.get_axes_mut(handle.axes)?.scatters_mut().get_mut(handle.index)
    }

    pub fn get_colorbar(&self, handle: ColorbarHandle) -> Option<&Colorbar> {
        self.colorbars.get(handle.0)
    }

    pub fn get_colorbar_mut(&mut self, handle: ColorbarHandle) -> Option<&mut Colorbar> {
        self.colorbars.get_mut(handle.0)
    }

    /// Handle of a scatter added directly through [`Axes3d::scatter`]
    pub fn scatter_handle(&self, axes: AxesHandle, index: usize) -> Option<ScatterHandle> {
        let handle = ScatterHandle { axes, index };
        self.get_scatter(handle).map(|_| handle)
    }

    /// Total number of scatter glyphs over all axes
    pub fn glyph_count(&self) -> usize {
        self.axes
            .iter()
            .flat_map(|ax| ax.scatters())
            .map(|s| s.len())
            .sum()
    }

    /// Total number of text labels over all 3D axes
    pub fn text_count(&self) -> usize {
        self.axes.iter().map(|ax| ax.texts().len()).sum()
    }
}

impl Index<AxesHandle> for Figure {
    type Output = Axes3d;

    fn index(&self, handle: AxesHandle) -> &Self::Output {
        &self.axes[handle.0]
    }
}

impl IndexMut<AxesHandle> for Figure {
    fn index_mut(&mut self, handle: AxesHandle) -> &mut Self::Output {
        &mut self.axes[handle.0]
    }
}

impl Index<Axes2dHandle> for Figure {
    type Output = Axes2d;

    fn index(&self, handle: Axes2dHandle) -> &Self::Output {
        &self.plain_axes[handle.0]
    }
}

impl Index<ScatterHandle> for Figure {
    type Output = Scatter3d;

    fn index(&self, handle: ScatterHandle) -> &Self::Output {
        &self.axes[handle.axes.0].scatters()[handle.index]
    }
}

impl IndexMut<ScatterHandle> for Figure {
    fn index_mut(&mut self, handle: ScatterHandle) -> &mut Self::Output {
        &mut self.axes[handle.axes.0].scatters_mut()[handle.index]
    }
}

impl Index<ColorbarHandle> for Figure {
    type Output = Colorbar;

    fn index(&self, handle: ColorbarHandle) -> &Self::Output {
        &self.colorbars[handle.0]
    }
}

impl IndexMut<ColorbarHandle> for Figure {
    fn index_mut(&mut self, handle: ColorbarHandle) -> &mut Self::Output {
        &mut self.colorbars[handle.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artists::ScatterStyle;
    use approx::assert_abs_diff_eq;
    use netlocal_core::{Colormap, Point3d};

    #[test]
    fn test_pixel_size() {
        let fig = Figure::new(8.0, 8.0, 600.0).unwrap();
        assert_eq!(fig.pixel_size(fig.dpi()), (4800, 4800));
        assert_eq!(fig.pixel_size(50.0), (400, 400));
    }

    #[test]
    fn test_invalid_figure() {
        assert!(Figure::new(0.0, 8.0, 100.0).is_err());
        assert!(Figure::new(8.0, 8.0, f64::NAN).is_err());
    }

    #[test]
    fn test_subplots_adjust_moves_subplot_axes() {
        let mut fig = Figure::new(8.0, 8.0, 100.0).unwrap();
        let ax = fig.add_subplot_3d();
        let cax = fig.add_axes(Rect::new(0.83, 0.25, 0.03, 0.5));

        fig.subplots_adjust(None, None, Some(0.85), None).unwrap();
        assert_abs_diff_eq!(fig[ax].rect().right(), 0.85, epsilon = 1e-12);
        assert_abs_diff_eq!(fig[ax].rect().left, 0.125, epsilon = 1e-12);
        // manual axes do not move
        assert_eq!(fig[cax].rect(), Rect::new(0.83, 0.25, 0.03, 0.5));

        assert!(fig.subplots_adjust(Some(0.9), None, Some(0.1), None).is_err());
    }

    #[test]
    fn test_tight_layout_respects_colorbar_strip() {
        let mut fig = Figure::new(8.0, 8.0, 100.0).unwrap();
        let ax = fig.add_subplot_3d();
        fig.add_axes(Rect::new(0.83, 0.25, 0.03, 0.5));
        fig.tight_layout();

        let pad = TIGHT_LAYOUT_PAD * 10.0 / 72.0 / 8.0;
        let rect = fig[ax].rect();
        assert_abs_diff_eq!(rect.left, pad, epsilon = 1e-12);
        assert_abs_diff_eq!(rect.bottom, pad, epsilon = 1e-12);
        assert_abs_diff_eq!(rect.top(), 1.0 - pad, epsilon = 1e-12);
        assert_abs_diff_eq!(rect.right(), 0.83 - pad, epsilon = 1e-12);
    }

    #[test]
    fn test_handles_resolve() {
        let mut fig = Figure::new(4.0, 4.0, 100.0).unwrap();
        let ax = fig.add_subplot_3d();
        let index = fig[ax]
            .scatter(
                vec![Point3d::origin(); 2],
                vec![10.0],
                vec![0.0, 1.0],
                Colormap::default(),
                &ScatterStyle::default(),
            )
            .unwrap();
        let scatter = fig.scatter_handle(ax, index).unwrap();
        let cax = fig.add_axes(Rect::new(0.9, 0.1, 0.05, 0.8));
        let cbar = fig.colorbar(scatter, cax).unwrap();

        assert_eq!(fig[scatter].len(), 2);
        assert_eq!(fig[cbar].mappable(), scatter);
        assert_eq!(fig.glyph_count(), 2);
        assert!(fig.scatter_handle(ax, 5).is_none());
        assert!(fig.colorbar(scatter, Axes2dHandle(7)).is_err());
    }
}
