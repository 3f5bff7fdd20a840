//! 3D scatter plot of a local network metric
//!
//! Points are sized by one metric and colored by another, labelled with their
//! names and viewed from straight above, with a colorbar on the right.

use crate::artists::{FontProperties, FontSlant, ScatterStyle};
use crate::config::PlotConfig;
use crate::figure::{AxesHandle, ColorbarHandle, Figure, Rect, ScatterHandle};
use ndarray::{Array2, ArrayView2};
use netlocal_core::{Colormap, Error, MetricPointCloud, Normalize, Point3d, Result};
use tracing::debug;

/// What [`plot_3d_local_metric`] hands back
#[derive(Debug, Clone)]
pub enum PlotOutput {
    /// The figure and its 3D axes
    Figure { figure: Figure, axes: AxesHandle },
    /// Additionally the scatter and colorbar handles
    WithHandles {
        figure: Figure,
        axes: AxesHandle,
        scatter: ScatterHandle,
        colorbar: ColorbarHandle,
    },
}

impl PlotOutput {
    pub fn figure(&self) -> &Figure {
        match self {
            PlotOutput::Figure { figure, .. } | PlotOutput::WithHandles { figure, .. } => figure,
        }
    }

    pub fn figure_mut(&mut self) -> &mut Figure {
        match self {
            PlotOutput::Figure { figure, .. } | PlotOutput::WithHandles { figure, .. } => figure,
        }
    }

    pub fn axes(&self) -> AxesHandle {
        match self {
            PlotOutput::Figure { axes, .. } | PlotOutput::WithHandles { axes, .. } => *axes,
        }
    }

    /// Scatter handle, present only when handles were requested
    pub fn scatter(&self) -> Option<ScatterHandle> {
        match self {
            PlotOutput::Figure { .. } => None,
            PlotOutput::WithHandles { scatter, .. } => Some(*scatter),
        }
    }

    /// Colorbar handle, present only when handles were requested
    pub fn colorbar(&self) -> Option<ColorbarHandle> {
        match self {
            PlotOutput::Figure { .. } => None,
            PlotOutput::WithHandles { colorbar, .. } => Some(*colorbar),
        }
    }

    pub fn into_figure(self) -> Figure {
        match self {
            PlotOutput::Figure { figure, .. } | PlotOutput::WithHandles { figure, .. } => figure,
        }
    }
}

/// Render a 3D scatter plot with per-point sizes and colors
///
/// * `sizes` - marker areas in points², one per point
/// * `colors` - values mapped through `cmap`, one per point
/// * `coordinates` - N×3 array of x, y, z
/// * `labels` - text drawn next to each point
/// * `cmap` - colormap, the default diverging map when `None`
/// * `return_handles` - also return the scatter and colorbar handles
/// * `style` - options forwarded to the scatter call; they take precedence
///   over the plot's own alpha and line width
pub fn plot_3d_local_metric<S: AsRef<str>>(
    sizes: &[f64],
    colors: &[f64],
    coordinates: ArrayView2<'_, f64>,
    labels: &[S],
    cmap: Option<Colormap>,
    return_handles: bool,
    style: ScatterStyle,
) -> Result<PlotOutput> {
    plot_3d_local_metric_with_config(
        sizes,
        colors,
        coordinates,
        labels,
        cmap,
        return_handles,
        style,
        &PlotConfig::default(),
    )
}

/// [`plot_3d_local_metric`] with explicit cosmetic settings
#[allow(clippy::too_many_arguments)]
pub fn plot_3d_local_metric_with_config<S: AsRef<str>>(
    sizes: &[f64],
    colors: &[f64],
    coordinates: ArrayView2<'_, f64>,
    labels: &[S],
    cmap: Option<Colormap>,
    return_handles: bool,
    style: ScatterStyle,
    config: &PlotConfig,
) -> Result<PlotOutput> {
    if coordinates.ncols() != 3 {
        return Err(Error::Shape(format!(
            "coordinates must have 3 columns, got {}",
            coordinates.ncols()
        )));
    }
    let n = coordinates.nrows();
    Error::check_len("sizes", n, sizes.len())?;
    Error::check_len("color values", n, colors.len())?;
    Error::check_len("labels", n, labels.len())?;

    let cmap = match cmap {
        Some(cmap) => cmap,
        None => config.colormap()?,
    };
    debug!(points = n, cmap = cmap.name(), "building local metric plot");

    let (width, height) = config.figure_size;
    let mut figure = Figure::new(width, height, config.dpi)?;
    let axes = figure.add_subplot_3d();

    let positions: Vec<Point3d> = coordinates
        .rows()
        .into_iter()
        .map(|row| Point3d::new(row[0], row[1], row[2]))
        .collect();

    let defaults = ScatterStyle::default()
        .alpha(config.alpha)
        .linewidth(config.linewidth);
    let style = style.or(defaults);

    let ax = &mut figure[axes];
    let index = ax.scatter(
        positions.clone(),
        sizes.to_vec(),
        colors.to_vec(),
        cmap,
        &style,
    )?;
    let norm: Normalize = ax.scatters()[index].norm();
    debug!(vmin = norm.vmin, vmax = norm.vmax, "color norm");

    let label_font = FontProperties::new("sans-serif", FontSlant::Normal, config.label_font_size);
    for (position, label) in positions.iter().zip(labels) {
        ax.text(*position, label.as_ref(), label_font.clone(), config.label_color);
    }

    ax.view_init(config.elevation, config.azimuth);
    ax.grid(config.show_grid);
    if config.show_axis {
        ax.set_axis_on();
    } else {
        ax.set_axis_off();
    }
    for pane in 0..3 {
        ax.set_pane_color(pane, config.pane_color);
    }

    figure.subplots_adjust(None, None, Some(config.subplot_right), None)?;
    let cax = figure.add_axes(Rect::from_array(config.colorbar_rect));

    let scatter = figure
        .scatter_handle(axes, index)
        .ok_or_else(|| Error::InvalidData("scatter vanished from its axes".into()))?;
    let colorbar = figure.colorbar(scatter, cax)?;
    {
        let cbar = &mut figure[colorbar];
        cbar.tick_font = config.tick_font.clone();
        cbar.tick_width = config.tick_width;
        cbar.outline_visible = config.colorbar_outline;
    }

    if config.tight_layout {
        figure.tight_layout();
    }

    if return_handles {
        Ok(PlotOutput::WithHandles {
            figure,
            axes,
            scatter,
            colorbar,
        })
    } else {
        Ok(PlotOutput::Figure { figure, axes })
    }
}

/// [`plot_3d_local_metric`] over a metric point set
pub fn plot_point_cloud(
    cloud: &MetricPointCloud,
    cmap: Option<Colormap>,
    return_handles: bool,
    style: ScatterStyle,
) -> Result<PlotOutput> {
    let columns = cloud.columns();
    let coordinates = Array2::from_shape_vec((columns.len(), 3), columns.flat_coordinates())
        .map_err(|e| Error::Shape(e.to_string()))?;
    plot_3d_local_metric(
        &columns.sizes,
        &columns.values,
        coordinates.view(),
        columns.labels.as_slice(),
        cmap,
        return_handles,
        style,
    )
}
