//! Integration tests for netlocal-visualization
//!
//! These tests build complete local metric plots and check the resulting
//! figure model and its SVG rendering.

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use netlocal_core::{Colormap, Error, MetricPoint, MetricPointCloud, Normalize, Point3d, Rgba};
use netlocal_visualization::*;

/// Low resolution keeps rendered documents small
const TEST_DPI: f64 = 20.0;

/// Create a ring of labelled points with increasing size and value
fn create_ring(n: usize) -> (Vec<f64>, Vec<f64>, Array2<f64>, Vec<String>) {
    let sizes = (0..n).map(|i| 10.0 + 5.0 * i as f64).collect();
    let values = (0..n).map(|i| i as f64 / n as f64 * 2.0 - 1.0).collect();
    let coords = Array2::from_shape_fn((n, 3), |(i, axis)| {
        let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
        match axis {
            0 => angle.cos(),
            1 => angle.sin(),
            _ => 0.1 * i as f64,
        }
    });
    let labels = (0..n).map(|i| format!("node{}", i)).collect();
    (sizes, values, coords, labels)
}

fn plot_ring(n: usize, return_handles: bool) -> PlotOutput {
    let (sizes, values, coords, labels) = create_ring(n);
    plot_3d_local_metric(
        &sizes,
        &values,
        coords.view(),
        &labels,
        None,
        return_handles,
        ScatterStyle::default(),
    )
    .unwrap()
}

#[test]
fn test_one_glyph_and_label_per_point() {
    let output = plot_ring(12, false);
    let figure = output.figure();

    assert_eq!(figure.axes().len(), 1);
    assert_eq!(figure.glyph_count(), 12);
    assert_eq!(figure.text_count(), 12);

    let ax = &figure[output.axes()];
    let labels: Vec<&str> = ax.texts().iter().map(|t| t.content.as_str()).collect();
    assert_eq!(labels[0], "node0");
    assert_eq!(labels[11], "node11");
    assert_eq!(ax.texts()[3].position, ax.scatters()[0].offsets()[3]);
}

#[test]
fn test_rendered_svg_contains_every_glyph_and_label() {
    let output = plot_ring(7, true);
    let figure = output.figure();
    let tick_count = figure[output.colorbar().unwrap()].ticks().len();

    let svg = figure.render_svg(Some(TEST_DPI)).unwrap();
    // Each point is a filled face plus an edge stroke
    assert_eq!(svg.matches("<circle").count(), 2 * 7);
    assert_eq!(svg.matches("<text").count(), 7 + tick_count);
    assert!(svg.contains("node6"));
    assert!(svg.contains("Arial"));
}

#[test]
fn test_default_colormap_stops() {
    let output = plot_ring(4, true);
    let scatter = &output.figure()[output.scatter().unwrap()];
    let cmap = scatter.cmap();

    let dark_blue: Rgba = "#11205E".parse().unwrap();
    let dark_red: Rgba = "#80121B".parse().unwrap();
    for (sample, expected, tol) in [
        (cmap.sample(0.0), dark_blue, 1e-6),
        (cmap.sample(0.5), Rgba::WHITE, 0.02),
        (cmap.sample(1.0), dark_red, 1e-6),
    ] {
        assert_abs_diff_eq!(sample.r, expected.r, epsilon = tol);
        assert_abs_diff_eq!(sample.g, expected.g, epsilon = tol);
        assert_abs_diff_eq!(sample.b, expected.b, epsilon = tol);
    }
}

#[test]
fn test_return_handles_flag() {
    let plain = plot_ring(3, false);
    assert!(matches!(plain, PlotOutput::Figure { .. }));
    assert!(plain.scatter().is_none());
    assert!(plain.colorbar().is_none());

    let full = plot_ring(3, true);
    match &full {
        PlotOutput::WithHandles { figure, scatter, colorbar, .. } => {
            assert!(figure.get_scatter(*scatter).is_some());
            let cbar = figure.get_colorbar(*colorbar).unwrap();
            assert_eq!(cbar.mappable(), *scatter);
        }
        PlotOutput::Figure { .. } => panic!("expected handles"),
    }
}

#[test]
fn test_camera_and_chrome() {
    let output = plot_ring(5, false);
    let ax = &output.figure()[output.axes()];

    assert_eq!(ax.elevation(), 90.0);
    assert_eq!(ax.azimuth(), -90.0);
    assert!(!ax.grid_visible());
    assert!(!ax.axis_visible());
    assert!(ax.panes().iter().all(|pane| pane.color == Rgba::new(1.0, 1.0, 1.0, 0.0)));
}

#[test]
fn test_colorbar_styling_and_layout() {
    let output = plot_ring(6, true);
    let figure = output.figure();
    let cbar = &figure[output.colorbar().unwrap()];

    assert_eq!(cbar.tick_font, FontProperties::new("Arial", FontSlant::Normal, 18.0));
    assert_eq!(cbar.tick_width, 1.5);
    assert!(!cbar.outline_visible);

    let cax = figure[cbar.cax()].rect();
    assert_eq!(cax, Rect::new(0.83, 0.25, 0.03, 0.5));

    // the subplot stays clear of the colorbar strip
    let ax = figure[output.axes()].rect();
    assert!(ax.right() < cax.left);
    assert_eq!(figure.size_inches(), (8.0, 8.0));
    assert_eq!(figure.dpi(), 600.0);
}

#[test]
fn test_mismatched_lengths_rejected() {
    let coords = Array2::<f64>::zeros((5, 3));
    let labels = vec!["a"; 5];

    let err = plot_3d_local_metric(&[1.0; 4], &[0.0; 5], coords.view(), &labels, None, false, ScatterStyle::default())
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { what: "sizes", expected: 5, actual: 4 }));

    let err = plot_3d_local_metric(&[1.0; 5], &[0.0; 6], coords.view(), &labels, None, false, ScatterStyle::default())
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { what: "color values", .. }));

    let err = plot_3d_local_metric(&[1.0; 5], &[0.0; 5], coords.view(), &labels[..3], None, false, ScatterStyle::default())
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { what: "labels", expected: 5, actual: 3 }));
}

#[test]
fn test_pass_through_style_wins() {
    let (sizes, values, coords, labels) = create_ring(4);
    let style = ScatterStyle::default()
        .alpha(0.25)
        .marker(Marker::Square)
        .vmin(-5.0)
        .vmax(5.0);
    let output = plot_3d_local_metric(&sizes, &values, coords.view(), &labels, None, true, style).unwrap();
    let figure = output.figure();
    let scatter = &figure[output.scatter().unwrap()];

    assert_eq!(scatter.style().alpha, 0.25);
    assert_eq!(scatter.style().linewidth, 0.5);
    assert_eq!(scatter.style().marker, Marker::Square);
    assert_eq!(scatter.norm(), Normalize::new(-5.0, 5.0));

    // the colorbar follows the scatter's mapping
    let cbar = &figure[output.colorbar().unwrap()];
    assert_eq!(cbar.norm(), Normalize::new(-5.0, 5.0));
    assert_eq!(cbar.alpha(), 0.25);
}

#[test]
fn test_custom_colormap() {
    let (sizes, values, coords, labels) = create_ring(4);
    let cmap = Colormap::from_specs("greys", &["black", "white"]).unwrap();
    let output =
        plot_3d_local_metric(&sizes, &values, coords.view(), &labels, Some(cmap), true, ScatterStyle::default())
            .unwrap();
    let figure = output.figure();
    assert_eq!(figure[output.scatter().unwrap()].cmap().name(), "greys");
    assert_eq!(figure[output.colorbar().unwrap()].cmap().name(), "greys");

    let faces = figure[output.scatter().unwrap()].facecolors();
    assert_eq!(faces[0].with_alpha(1.0), Rgba::BLACK);
    assert_abs_diff_eq!(faces[0].a, 0.8, epsilon = 1e-6);
}

#[test]
fn test_point_cloud_entry_point() {
    let cloud: MetricPointCloud = vec![
        MetricPoint::new(Point3d::new(0.0, 0.0, 0.0), 30.0, 0.1, "hub"),
        MetricPoint::new(Point3d::new(1.0, 0.0, 0.0), 10.0, 0.9, "leaf-a"),
        MetricPoint::new(Point3d::new(0.0, 1.0, 0.0), 10.0, -0.4, "leaf-b"),
    ]
    .into_iter()
    .collect();

    let output = plot_point_cloud(&cloud, None, true, ScatterStyle::default()).unwrap();
    let figure = output.figure();
    let scatter = &figure[output.scatter().unwrap()];
    assert_eq!(scatter.len(), 3);
    assert_eq!(scatter.size(0), 30.0);
    assert_eq!(scatter.values(), &[0.1, 0.9, -0.4]);
    assert_eq!(figure[output.axes()].texts()[0].content, "hub");
}

#[test]
fn test_config_overrides() {
    let (sizes, values, coords, labels) = create_ring(3);
    let config = PlotConfig::from_json_str(r#"{ "dpi": 100, "colorbar_outline": true, "show_grid": true }"#).unwrap();
    let output = plot_3d_local_metric_with_config(
        &sizes,
        &values,
        coords.view(),
        &labels,
        None,
        true,
        ScatterStyle::default(),
        &config,
    )
    .unwrap();
    let figure = output.figure();
    assert_eq!(figure.dpi(), 100.0);
    assert!(figure[output.colorbar().unwrap()].outline_visible);
    assert!(figure[output.axes()].grid_visible());
    assert_eq!(figure.pixel_size(figure.dpi()), (800, 800));
}

#[test]
fn test_figure_remains_customisable() {
    let mut output = plot_ring(4, true);
    let axes = output.axes();
    let colorbar = output.colorbar().unwrap();
    let figure = output.figure_mut();

    figure[axes].view_init(30.0, 45.0);
    figure[colorbar].set_ticks(vec![-1.0, 0.0]);

    assert_eq!(figure[axes].azimuth(), 45.0);
    assert_eq!(figure[colorbar].tick_labels(), vec!["\u{2212}1", "0"]);
    assert!(figure.render_svg(Some(TEST_DPI)).is_ok());
}

#[test]
fn test_empty_point_set() {
    let coords = Array2::<f64>::zeros((0, 3));
    let labels: Vec<String> = Vec::new();
    let output = plot_3d_local_metric(&[], &[], coords.view(), &labels, None, false, ScatterStyle::default()).unwrap();
    assert_eq!(output.figure().glyph_count(), 0);
    assert!(output.figure().render_svg(Some(TEST_DPI)).is_ok());
}

#[test]
fn test_small_literal_input() {
    let coords = array![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]];
    let output = plot_3d_local_metric(&[5.0, 50.0], &[1.0, -1.0], coords.view(), &["x", "y"], None, false, ScatterStyle::default())
        .unwrap();
    assert_eq!(output.into_figure().text_count(), 2);
}

#[test]
#[ignore = "bitmap text needs fonts registered with register_font"]
fn test_render_png_with_labels() {
    let output = plot_ring(5, false);
    let png = output.figure().render_png(Some(TEST_DPI)).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
