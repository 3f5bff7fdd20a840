//! Colorbar legend keyed to a scatter's colormap and norm

use crate::artists::{FontProperties, Scatter3d};
use crate::figure::{Axes2dHandle, ScatterHandle};
use crate::ticker;
use netlocal_core::{Colormap, Normalize, Rgba};

/// Upper bound on tick intervals along the bar
pub const DEFAULT_MAX_BINS: usize = 9;

/// Major tick length in points
pub const DEFAULT_TICK_LENGTH: f64 = 3.5;

/// A vertical colorbar drawn into its own axes
#[derive(Debug, Clone)]
pub struct Colorbar {
    mappable: ScatterHandle,
    cax: Axes2dHandle,
    cmap: Colormap,
    norm: Normalize,
    alpha: f64,
    pub tick_font: FontProperties,
    pub tick_color: Rgba,
    /// Tick line width in points
    pub tick_width: f64,
    /// Tick line length in points
    pub tick_length: f64,
    pub outline_visible: bool,
    pub max_bins: usize,
    fixed_ticks: Option<Vec<f64>>,
}

impl Colorbar {
    pub(crate) fn new(mappable: ScatterHandle, scatter: &Scatter3d, cax: Axes2dHandle) -> Self {
        Self {
            mappable,
            cax,
            cmap: scatter.cmap().clone(),
            norm: scatter.norm(),
            alpha: scatter.style().alpha,
            tick_font: FontProperties::default(),
            tick_color: Rgba::BLACK,
            tick_width: 0.8,
            tick_length: DEFAULT_TICK_LENGTH,
            outline_visible: true,
            max_bins: DEFAULT_MAX_BINS,
            fixed_ticks: None,
        }
    }

    /// The scatter this colorbar describes
    pub fn mappable(&self) -> ScatterHandle {
        self.mappable
    }

    /// The axes the bar is drawn into
    pub fn cax(&self) -> Axes2dHandle {
        self.cax
    }

    pub fn cmap(&self) -> &Colormap {
        &self.cmap
    }

    pub fn norm(&self) -> Normalize {
        self.norm
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Re-read colormap, norm and alpha after the scatter changed
    pub fn update_normal(&mut self, scatter: &Scatter3d) {
        self.cmap = scatter.cmap().clone();
        self.norm = scatter.norm();
        self.alpha = scatter.style().alpha;
    }

    /// Replace the automatic tick locations
    pub fn set_ticks(&mut self, ticks: Vec<f64>) {
        self.fixed_ticks = Some(ticks);
    }

    /// Tick positions in data units, ascending
    pub fn ticks(&self) -> Vec<f64> {
        match &self.fixed_ticks {
            Some(ticks) => {
                let (lo, hi) = self.range();
                ticks.iter().copied().filter(|t| *t >= lo && *t <= hi).collect()
            }
            None => ticker::nice_ticks(self.norm.vmin, self.norm.vmax, self.max_bins),
        }
    }

    pub fn tick_labels(&self) -> Vec<String> {
        ticker::format_ticks(&self.ticks())
    }

    fn range(&self) -> (f64, f64) {
        let Normalize { vmin, vmax } = self.norm;
        (vmin.min(vmax), vmin.max(vmax))
    }

    /// Position of a data value along the bar, 0 at the bottom and 1 at the top
    pub fn fraction(&self, value: f64) -> f64 {
        if self.norm.vmin == self.norm.vmax {
            return 0.5;
        }
        self.norm.apply(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artists::ScatterStyle;
    use crate::figure::AxesHandle;
    use netlocal_core::Point3d;

    fn scatter(values: Vec<f64>) -> Scatter3d {
        let offsets = vec![Point3d::origin(); values.len()];
        Scatter3d::new(offsets, vec![1.0], values, Colormap::default(), &ScatterStyle::default().alpha(0.8))
            .unwrap()
    }

    fn colorbar(values: Vec<f64>) -> Colorbar {
        let handle = ScatterHandle { axes: AxesHandle(0), index: 0 };
        Colorbar::new(handle, &scatter(values), Axes2dHandle(0))
    }

    #[test]
    fn test_keyed_to_scatter() {
        let cbar = colorbar(vec![-1.0, 0.0, 3.0]);
        assert_eq!(cbar.norm(), Normalize::new(-1.0, 3.0));
        assert_eq!(cbar.alpha(), 0.8);
        assert_eq!(cbar.cmap().name(), "custom_colormap");
        assert_eq!(cbar.fraction(1.0), 0.5);
    }

    #[test]
    fn test_ticks_and_labels() {
        let cbar = colorbar(vec![0.0, 1.0]);
        let ticks = cbar.ticks();
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert_eq!(ticks.last().copied(), Some(1.0));
        assert_eq!(cbar.tick_labels().first().map(String::as_str), Some("0.0"));
    }

    #[test]
    fn test_fixed_ticks_clipped_to_range() {
        let mut cbar = colorbar(vec![0.0, 10.0]);
        cbar.set_ticks(vec![-5.0, 0.0, 5.0, 10.0, 15.0]);
        assert_eq!(cbar.ticks(), vec![0.0, 5.0, 10.0]);
        assert_eq!(cbar.tick_labels(), vec!["0", "5", "10"]);
    }

    #[test]
    fn test_update_normal() {
        let mut cbar = colorbar(vec![0.0, 1.0]);
        let mut other = scatter(vec![0.0, 1.0]);
        other.set_norm(Normalize::new(-2.0, 2.0));
        cbar.update_normal(&other);
        assert_eq!(cbar.norm(), Normalize::new(-2.0, 2.0));
    }
}
