//! Linear-segmented colormaps and value normalisation
//!
//! A [`Colormap`] is a lookup table built by linear interpolation between
//! `(position, color)` stops. Scalar data reaches it through a [`Normalize`]
//! that maps the data range onto `[0, 1]`.

use crate::color::Rgba;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of entries in a colormap lookup table
pub const DEFAULT_LUT_SIZE: usize = 256;

/// Name of the default diverging map
pub const DEFAULT_COLORMAP_NAME: &str = "custom_colormap";

/// Stops of the default diverging map, dark blue through white to dark red
pub const DEFAULT_COLORMAP_COLORS: [&str; 7] = [
    "#11205E",
    "#203FB6",
    "#86CAFF",
    "white",
    "#FFEC4A",
    "#F62336",
    "#80121B",
];

/// A color stop: position in `[0, 1]` and the color at that position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgba,
}

/// A named colormap backed by a lookup table
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<ColorStop>,
    lut: Vec<Rgba>,
    bad: Rgba,
}

impl Colormap {
    /// Build a colormap from explicit stops
    ///
    /// Requires at least two stops, the first at 0, the last at 1 and
    /// positions in non-decreasing order.
    pub fn from_stops(name: impl Into<String>, stops: Vec<ColorStop>) -> Result<Self> {
        Self::with_lut_size(name, stops, DEFAULT_LUT_SIZE)
    }

    /// Build a colormap from colors spaced evenly over `[0, 1]`
    pub fn from_list(name: impl Into<String>, colors: &[Rgba]) -> Result<Self> {
        if colors.len() < 2 {
            return Err(Error::InvalidColormap(format!(
                "need at least 2 colors, got {}",
                colors.len()
            )));
        }
        let last = (colors.len() - 1) as f64;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| ColorStop {
                position: i as f64 / last,
                color,
            })
            .collect();
        Self::from_stops(name, stops)
    }

    /// Build a colormap from evenly spaced color spec strings
    pub fn from_specs<S: AsRef<str>>(name: impl Into<String>, specs: &[S]) -> Result<Self> {
        let colors = specs
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<Rgba>>>()?;
        Self::from_list(name, &colors)
    }

    /// The default 7-stop diverging map
    pub fn default_diverging() -> Self {
        let colors: Vec<Rgba> = DEFAULT_COLORMAP_COLORS
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        // The stop table is a compile-time constant of valid color specs
        match Self::from_list(DEFAULT_COLORMAP_NAME, &colors) {
            Ok(cmap) => cmap,
            Err(_) => unreachable!("default colormap stops are valid"),
        }
    }

    /// Build a colormap with an explicit lookup table size
    pub fn with_lut_size(
        name: impl Into<String>,
        stops: Vec<ColorStop>,
        lut_size: usize,
    ) -> Result<Self> {
        validate_stops(&stops)?;
        if lut_size < 2 {
            return Err(Error::InvalidColormap(format!(
                "lookup table needs at least 2 entries, got {}",
                lut_size
            )));
        }

        let lut = (0..lut_size)
            .map(|i| interpolate(&stops, i as f64 / (lut_size - 1) as f64))
            .collect();

        Ok(Self {
            name: name.into(),
            stops,
            lut,
            bad: Rgba::TRANSPARENT,
        })
    }

    /// Colormap name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stops this map was built from
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Number of lookup table entries
    pub fn len(&self) -> usize {
        self.lut.len()
    }

    /// Lookup tables always hold at least two entries
    pub fn is_empty(&self) -> bool {
        self.lut.is_empty()
    }

    /// Color used for NaN samples
    pub fn bad(&self) -> Rgba {
        self.bad
    }

    /// Replace the color used for NaN samples
    pub fn with_bad(mut self, bad: Rgba) -> Self {
        self.bad = bad;
        self
    }

    /// Sample the map at a normalised position
    ///
    /// Positions are clamped to `[0, 1]`; NaN yields [`Colormap::bad`].
    pub fn sample(&self, t: f64) -> Rgba {
        if t.is_nan() {
            return self.bad;
        }
        let n = self.lut.len();
        let index = (t.clamp(0.0, 1.0) * n as f64) as usize;
        self.lut[index.min(n - 1)]
    }

    /// Lookup table entry by index, clamped to the table
    pub fn sample_index(&self, index: usize) -> Rgba {
        self.lut[index.min(self.lut.len() - 1)]
    }

    /// The same map traversed from 1 to 0
    pub fn reversed(&self) -> Self {
        let stops = self
            .stops
            .iter()
            .rev()
            .map(|stop| ColorStop {
                position: 1.0 - stop.position,
                color: stop.color,
            })
            .collect();
        let mut lut = self.lut.clone();
        lut.reverse();
        Self {
            name: format!("{}_r", self.name),
            stops,
            lut,
            bad: self.bad,
        }
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::default_diverging()
    }
}

fn validate_stops(stops: &[ColorStop]) -> Result<()> {
    if stops.len() < 2 {
        return Err(Error::InvalidColormap(format!(
            "need at least 2 stops, got {}",
            stops.len()
        )));
    }
    if stops.iter().any(|s| !s.position.is_finite()) {
        return Err(Error::InvalidColormap("stop positions must be finite".into()));
    }
    if stops[0].position != 0.0 || stops[stops.len() - 1].position != 1.0 {
        return Err(Error::InvalidColormap(
            "stops must start at 0 and end at 1".into(),
        ));
    }
    if stops.windows(2).any(|w| w[1].position < w[0].position) {
        return Err(Error::InvalidColormap(
            "stop positions must be non-decreasing".into(),
        ));
    }
    Ok(())
}

/// Interpolate the stop list at `t`; stops are already validated
fn interpolate(stops: &[ColorStop], t: f64) -> Rgba {
    let upper = stops
        .iter()
        .position(|s| s.position >= t)
        .unwrap_or(stops.len() - 1);
    if upper == 0 {
        return stops[0].color;
    }
    let lo = &stops[upper - 1];
    let hi = &stops[upper];
    let span = hi.position - lo.position;
    if span <= 0.0 {
        return hi.color;
    }
    lo.color.lerp(hi.color, ((t - lo.position) / span) as f32)
}

/// Linear map from a data interval onto `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// Fit the interval to the finite values in `values`
    ///
    /// Returns `Normalize::new(0.0, 1.0)` when no value is finite.
    pub fn autoscale(values: &[f64]) -> Self {
        let (vmin, vmax) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if vmin > vmax {
            return Self::new(0.0, 1.0);
        }
        Self::new(vmin, vmax)
    }

    /// Autoscale, keeping any bound the caller fixed
    pub fn autoscale_with(values: &[f64], vmin: Option<f64>, vmax: Option<f64>) -> Self {
        let auto = Self::autoscale(values);
        Self::new(vmin.unwrap_or(auto.vmin), vmax.unwrap_or(auto.vmax))
    }

    /// Map a value into `[0, 1]` (values outside the interval map outside it)
    ///
    /// A degenerate interval maps everything to 0; NaN stays NaN.
    pub fn apply(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        let span = self.vmax - self.vmin;
        if span == 0.0 {
            return 0.0;
        }
        (value - self.vmin) / span
    }

    /// Map a normalised position back to data space
    pub fn inverse(&self, t: f64) -> f64 {
        self.vmin + t * (self.vmax - self.vmin)
    }
}

impl Default for Normalize {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}
