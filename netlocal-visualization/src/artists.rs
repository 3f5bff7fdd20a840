//! Artists drawn inside a 3D axes: scatter collections and text labels

use netlocal_core::{Colormap, Error, Normalize, Point3d, Result, Rgba};
use serde::{Deserialize, Serialize};

/// Font slant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Font selection for text artists, sizes in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontProperties {
    pub family: String,
    pub style: FontSlant,
    pub size: f64,
}

impl FontProperties {
    pub fn new(family: impl Into<String>, style: FontSlant, size: f64) -> Self {
        Self {
            family: family.into(),
            style,
            size,
        }
    }
}

impl Default for FontProperties {
    fn default() -> Self {
        Self::new("sans-serif", FontSlant::Normal, 10.0)
    }
}

/// Marker glyph shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    #[default]
    Circle,
    Square,
    Triangle,
    Cross,
}

/// Marker edge color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeColor {
    /// Same color as the marker face
    #[default]
    Face,
    /// No edge
    None,
    Color(Rgba),
}

/// Pass-through styling options for a scatter draw call
///
/// Every field left as `None` falls back to the caller's defaults
/// (see [`ScatterStyle::or`]) and then to [`ResolvedStyle::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterStyle {
    pub alpha: Option<f64>,
    pub linewidth: Option<f64>,
    pub edgecolor: Option<EdgeColor>,
    pub marker: Option<Marker>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub depthshade: Option<bool>,
    pub zorder: Option<i32>,
    pub label: Option<String>,
}

impl ScatterStyle {
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn linewidth(mut self, linewidth: f64) -> Self {
        self.linewidth = Some(linewidth);
        self
    }

    pub fn edgecolor(mut self, edgecolor: EdgeColor) -> Self {
        self.edgecolor = Some(edgecolor);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn vmin(mut self, vmin: f64) -> Self {
        self.vmin = Some(vmin);
        self
    }

    pub fn vmax(mut self, vmax: f64) -> Self {
        self.vmax = Some(vmax);
        self
    }

    pub fn depthshade(mut self, depthshade: bool) -> Self {
        self.depthshade = Some(depthshade);
        self
    }

    pub fn zorder(mut self, zorder: i32) -> Self {
        self.zorder = Some(zorder);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Fill every unset field from `fallback`; values already set win
    pub fn or(self, fallback: ScatterStyle) -> Self {
        Self {
            alpha: self.alpha.or(fallback.alpha),
            linewidth: self.linewidth.or(fallback.linewidth),
            edgecolor: self.edgecolor.or(fallback.edgecolor),
            marker: self.marker.or(fallback.marker),
            vmin: self.vmin.or(fallback.vmin),
            vmax: self.vmax.or(fallback.vmax),
            depthshade: self.depthshade.or(fallback.depthshade),
            zorder: self.zorder.or(fallback.zorder),
            label: self.label.or(fallback.label),
        }
    }

    /// Resolve against the library defaults
    pub fn resolve(&self) -> Result<ResolvedStyle> {
        let defaults = ResolvedStyle::default();
        let alpha = self.alpha.unwrap_or(defaults.alpha);
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::InvalidData(format!(
                "alpha must be within [0, 1], got {}",
                alpha
            )));
        }
        let linewidth = self.linewidth.unwrap_or(defaults.linewidth);
        if linewidth.is_nan() || linewidth < 0.0 {
            return Err(Error::InvalidData(format!(
                "linewidth must be non-negative, got {}",
                linewidth
            )));
        }
        Ok(ResolvedStyle {
            alpha,
            linewidth,
            edgecolor: self.edgecolor.unwrap_or(defaults.edgecolor),
            marker: self.marker.unwrap_or(defaults.marker),
            depthshade: self.depthshade.unwrap_or(defaults.depthshade),
            zorder: self.zorder.unwrap_or(defaults.zorder),
            label: self.label.clone(),
        })
    }
}

/// Fully resolved scatter styling
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub alpha: f64,
    /// Edge line width in points
    pub linewidth: f64,
    pub edgecolor: EdgeColor,
    pub marker: Marker,
    pub depthshade: bool,
    pub zorder: i32,
    pub label: Option<String>,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            linewidth: 1.0,
            edgecolor: EdgeColor::Face,
            marker: Marker::Circle,
            depthshade: true,
            zorder: 1,
            label: None,
        }
    }
}

/// A 3D scatter collection with per-point size and color value
#[derive(Debug, Clone)]
pub struct Scatter3d {
    offsets: Vec<Point3d>,
    sizes: Vec<f64>,
    values: Vec<f64>,
    cmap: Colormap,
    norm: Normalize,
    style: ResolvedStyle,
}

impl Scatter3d {
    /// Build a collection; `sizes` may hold one entry shared by all points
    pub fn new(
        offsets: Vec<Point3d>,
        sizes: Vec<f64>,
        values: Vec<f64>,
        cmap: Colormap,
        style: &ScatterStyle,
    ) -> Result<Self> {
        if sizes.len() != 1 {
            Error::check_len("sizes", offsets.len(), sizes.len())?;
        }
        Error::check_len("color values", offsets.len(), values.len())?;

        let norm = Normalize::autoscale_with(&values, style.vmin, style.vmax);
        Ok(Self {
            offsets,
            sizes,
            values,
            cmap,
            norm,
            style: style.resolve()?,
        })
    }

    /// Number of point glyphs
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[Point3d] {
        &self.offsets
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Marker area in points² of point `index`
    pub fn size(&self, index: usize) -> f64 {
        if self.sizes.len() == 1 {
            self.sizes[0]
        } else {
            self.sizes[index]
        }
    }

    pub fn cmap(&self) -> &Colormap {
        &self.cmap
    }

    pub fn set_cmap(&mut self, cmap: Colormap) {
        self.cmap = cmap;
    }

    pub fn norm(&self) -> Normalize {
        self.norm
    }

    pub fn set_norm(&mut self, norm: Normalize) {
        self.norm = norm;
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ResolvedStyle {
        &mut self.style
    }

    /// Face color of every point after colormapping, alpha applied
    pub fn facecolors(&self) -> Vec<Rgba> {
        let alpha = self.style.alpha as f32;
        self.values
            .iter()
            .map(|&v| {
                let c = self.cmap.sample(self.norm.apply(v));
                c.with_alpha(c.a * alpha)
            })
            .collect()
    }

    /// Edge color of every point, `None` when edges are off
    pub fn edgecolors(&self) -> Option<Vec<Rgba>> {
        match self.style.edgecolor {
            EdgeColor::None => None,
            EdgeColor::Face => Some(self.facecolors()),
            EdgeColor::Color(c) => {
                let c = c.with_alpha(c.a * self.style.alpha as f32);
                Some(vec![c; self.len()])
            }
        }
    }
}

/// Horizontal text alignment relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    Center,
    #[default]
    Baseline,
}

/// A text label anchored at a 3D position
#[derive(Debug, Clone, PartialEq)]
pub struct Text3d {
    pub position: Point3d,
    pub content: String,
    pub font: FontProperties,
    pub color: Rgba,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl Text3d {
    pub fn new(position: Point3d, content: impl Into<String>, font: FontProperties, color: Rgba) -> Self {
        Self {
            position,
            content: content.into(),
            font,
            color,
            halign: HAlign::default(),
            valign: VAlign::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(n: usize) -> Vec<Point3d> {
        (0..n).map(|i| Point3d::new(i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_caller_style_wins() {
        let defaults = ScatterStyle::default().alpha(0.8).linewidth(0.5);
        let merged = ScatterStyle::default().alpha(0.3).or(defaults);
        let resolved = merged.resolve().unwrap();
        assert_eq!(resolved.alpha, 0.3);
        assert_eq!(resolved.linewidth, 0.5);
        assert_eq!(resolved.marker, Marker::Circle);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        assert!(ScatterStyle::default().alpha(1.5).resolve().is_err());
        assert!(ScatterStyle::default().linewidth(f64::NAN).resolve().is_err());
    }

    #[test]
    fn test_scatter_length_checks() {
        let cmap = Colormap::default();
        let style = ScatterStyle::default();

        assert!(Scatter3d::new(offsets(3), vec![1.0; 3], vec![0.0; 3], cmap.clone(), &style).is_ok());
        // a single size broadcasts
        let shared = Scatter3d::new(offsets(3), vec![9.0], vec![0.0; 3], cmap.clone(), &style).unwrap();
        assert_eq!(shared.size(2), 9.0);

        let err = Scatter3d::new(offsets(3), vec![1.0; 2], vec![0.0; 3], cmap.clone(), &style);
        assert!(matches!(err, Err(Error::LengthMismatch { what: "sizes", .. })));
        let err = Scatter3d::new(offsets(3), vec![1.0; 3], vec![0.0; 4], cmap, &style);
        assert!(matches!(err, Err(Error::LengthMismatch { what: "color values", .. })));
    }

    #[test]
    fn test_facecolors_follow_norm() {
        let cmap = Colormap::from_list("bw", &[Rgba::BLACK, Rgba::WHITE]).unwrap();
        let style = ScatterStyle::default().alpha(0.5);
        let scatter = Scatter3d::new(offsets(2), vec![1.0; 2], vec![-4.0, 4.0], cmap, &style).unwrap();

        assert_eq!(scatter.norm(), Normalize::new(-4.0, 4.0));
        let colors = scatter.facecolors();
        assert_eq!(colors[0].with_alpha(1.0), Rgba::BLACK);
        assert_eq!(colors[1].with_alpha(1.0), Rgba::WHITE);
        assert_eq!(colors[0].a, 0.5);

        let edges = scatter.edgecolors().unwrap();
        assert_eq!(edges, colors);
    }
}
