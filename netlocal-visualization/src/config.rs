//! Configuration of the local metric plot

use crate::artists::{FontProperties, FontSlant};
use netlocal_core::{Colormap, Result, Rgba, DEFAULT_COLORMAP_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cosmetic constants of [`crate::plot_3d_local_metric`]
///
/// Deserializes from partial JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Figure width and height in inches
    pub figure_size: (f64, f64),
    /// Dots per inch
    pub dpi: f64,
    /// Marker alpha unless the caller's style sets one
    pub alpha: f64,
    /// Marker edge width in points unless the caller's style sets one
    pub linewidth: f64,
    /// Label font size in points
    pub label_font_size: f64,
    pub label_color: Rgba,
    pub elevation: f64,
    pub azimuth: f64,
    pub show_grid: bool,
    pub show_axis: bool,
    /// Fill of the three background panes
    pub pane_color: Rgba,
    /// Right edge of the subplot area, leaves room for the colorbar
    pub subplot_right: f64,
    /// Colorbar axes as `[left, bottom, width, height]` in figure fraction
    pub colorbar_rect: [f64; 4],
    pub tick_font: FontProperties,
    /// Colorbar tick line width in points
    pub tick_width: f64,
    pub colorbar_outline: bool,
    pub tight_layout: bool,
    /// Stops of the default colormap, evenly spaced
    pub colormap_colors: Vec<Rgba>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            figure_size: (8.0, 8.0),
            dpi: 600.0,
            alpha: 0.8,
            linewidth: 0.5,
            label_font_size: 3.0,
            label_color: Rgba::GREY,
            elevation: 90.0,
            azimuth: -90.0,
            show_grid: false,
            show_axis: false,
            pane_color: Rgba::new(1.0, 1.0, 1.0, 0.0),
            subplot_right: 0.85,
            colorbar_rect: [0.83, 0.25, 0.03, 0.5],
            tick_font: FontProperties::new("Arial", FontSlant::Normal, 18.0),
            tick_width: 1.5,
            colorbar_outline: false,
            tight_layout: true,
            colormap_colors: Colormap::default_diverging()
                .stops()
                .iter()
                .map(|stop| stop.color)
                .collect(),
        }
    }
}

impl PlotConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from a JSON string
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| netlocal_core::Error::InvalidData(format!("plot config: {}", e)))
    }

    /// The default colormap described by `colormap_colors`
    pub fn colormap(&self) -> Result<Colormap> {
        Colormap::from_list(DEFAULT_COLORMAP_NAME, &self.colormap_colors)
    }
}
