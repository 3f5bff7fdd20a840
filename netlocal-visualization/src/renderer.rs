//! Figure rendering through plotters
//!
//! Draw order: figure face, each 3D axes (chrome, scatter glyphs far to near,
//! labels), then colorbars. Lengths given in points scale by `dpi / 72`.

use crate::artists::{FontProperties, FontSlant, HAlign, Marker, Scatter3d, Text3d, VAlign};
use crate::axes3d::{Axes3d, Projector};
use crate::colorbar::Colorbar;
use crate::figure::Figure;
use crate::ticker;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use netlocal_core::{Error, Point3d, Result, Rgba};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle, TextStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info, warn};

/// Points per inch
const POINTS_PER_INCH: f64 = 72.0;

/// Colorbar tick label padding in points
const TICK_PAD: f64 = 3.5;

/// Colorbar outline width in points
const OUTLINE_WIDTH: f64 = 0.8;

/// Grid line color and width in points
const GRID_COLOR: Rgba = Rgba::new(0.69, 0.69, 0.69, 1.0);
const GRID_WIDTH: f64 = 0.8;

/// Register font bytes under a family name for bitmap rendering
///
/// SVG output only references family names and needs no registration.
pub fn register_font(family: &str, style: FontSlant, bytes: &'static [u8]) -> Result<()> {
    plotters::style::register_font(family, font_style(style), bytes)
        .map_err(|_| Error::Render(format!("register font '{}': not a valid font file", family)))
}

impl Figure {
    /// Rasterise to PNG bytes; `dpi` overrides the figure's own
    pub fn render_png(&self, dpi: Option<f64>) -> Result<Vec<u8>> {
        let dpi = dpi.unwrap_or(self.dpi());
        let (width, height) = self.pixel_size(dpi);
        let mut buf = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            draw_figure(self, &root, dpi)?;
            root.present().map_err(render_err("present"))?;
        }

        encode_rgb_to_png(&buf, width, height)
    }

    /// Serialise to an SVG document; `dpi` overrides the figure's own
    pub fn render_svg(&self, dpi: Option<f64>) -> Result<String> {
        let dpi = dpi.unwrap_or(self.dpi());
        let (width, height) = self.pixel_size(dpi);
        let mut svg = String::new();

        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            draw_figure(self, &root, dpi)?;
            root.present().map_err(render_err("present"))?;
        }

        Ok(svg)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P, dpi: Option<f64>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.render_png(dpi)?;
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "saved PNG");
        Ok(())
    }

    pub fn save_svg<P: AsRef<Path>>(&self, path: P, dpi: Option<f64>) -> Result<()> {
        let path = path.as_ref();
        let svg = self.render_svg(dpi)?;
        std::fs::write(path, svg.as_bytes())?;
        info!(path = %path.display(), bytes = svg.len(), "saved SVG");
        Ok(())
    }

    /// Save by file extension, `.png` or `.svg`
    pub fn save<P: AsRef<Path>>(&self, path: P, dpi: Option<f64>) -> Result<()> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match extension.as_deref() {
            Some("png") => self.save_png(path, dpi),
            Some("svg") => self.save_svg(path, dpi),
            other => Err(Error::UnsupportedFormat(format!(
                "cannot save figure as '{}'",
                other.unwrap_or("")
            ))),
        }
    }
}

fn render_err<E: std::fmt::Display>(stage: &'static str) -> impl Fn(E) -> Error {
    move |e| Error::Render(format!("{}: {}", stage, e))
}

fn draw_figure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
    dpi: f64,
) -> Result<()> {
    let size = figure.pixel_size(dpi);
    let pt = dpi / POINTS_PER_INCH;
    debug!(width = size.0, height = size.1, dpi, "rendering figure");

    root.fill(&to_color(figure.facecolor))
        .map_err(render_err("fill"))?;

    for ax in figure.axes() {
        draw_axes3d(root, ax, size, pt)?;
    }
    for cbar in figure.colorbars() {
        let rect = figure[cbar.cax()].rect();
        draw_colorbar(root, cbar, rect.to_pixels(size), pt)?;
    }
    Ok(())
}

fn to_color(c: Rgba) -> RGBAColor {
    let [r, g, b, _] = c.to_rgba8();
    RGBAColor(r, g, b, c.a.clamp(0.0, 1.0) as f64)
}

fn px(v: f64) -> i32 {
    v.round() as i32
}

fn stroke(color: Rgba, width_px: f64) -> ShapeStyle {
    ShapeStyle {
        color: to_color(color),
        filled: false,
        stroke_width: width_px.round().max(1.0) as u32,
    }
}

fn draw_axes3d<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    ax: &Axes3d,
    size: (u32, u32),
    pt: f64,
) -> Result<()> {
    let (x, y, w, h) = ax.rect().to_pixels(size);
    let projector = ax.projector((x, y), (w, h));

    if ax.axis_visible() {
        draw_panes(root, ax, &projector, pt)?;
    }

    let mut scatters: Vec<&Scatter3d> = ax.scatters().iter().collect();
    scatters.sort_by_key(|s| s.style().zorder);
    for scatter in scatters {
        draw_scatter(root, scatter, &projector, pt)?;
    }

    for text in ax.texts() {
        draw_text3d(root, text, &projector, pt)?;
    }
    Ok(())
}

/// Draw the three far-side panes with their edges, plus grid lines
fn draw_panes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    ax: &Axes3d,
    projector: &Projector,
    pt: f64,
) -> Result<()> {
    let (_, _, eye) = projector.view().basis();
    let half = projector.half_extents();
    let limits = projector.limits();

    for (axis, pane) in ax.panes().iter().enumerate() {
        let (j, k) = ((axis + 1) % 3, (axis + 2) % 3);
        let far = if eye[axis] >= 0.0 { -half[axis] } else { half[axis] };

        let corner = |sj: f64, sk: f64| {
            let mut c = [0.0; 3];
            c[axis] = far;
            c[j] = sj * half[j];
            c[k] = sk * half[k];
            let (px_x, px_y) = projector.box_to_pixel(&Point3d::new(c[0], c[1], c[2]));
            (px(px_x), px(px_y))
        };
        let outline = vec![corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)];

        if pane.color.is_visible() {
            root.draw(&Polygon::new(outline.clone(), to_color(pane.color).filled()))
                .map_err(render_err("pane"))?;
        }

        if ax.grid_visible() {
            for (along, across) in [(j, k), (k, j)] {
                let (lo, hi) = (limits.min[along], limits.max[along]);
                for tick in ticker::nice_ticks(lo, hi, 5) {
                    let t = ((tick - lo) / (hi - lo) - 0.5) * 2.0 * half[along];
                    let end = |s: f64| {
                        let mut c = [0.0; 3];
                        c[axis] = far;
                        c[along] = t;
                        c[across] = s * half[across];
                        let (gx, gy) = projector.box_to_pixel(&Point3d::new(c[0], c[1], c[2]));
                        (px(gx), px(gy))
                    };
                    root.draw(&PathElement::new(vec![end(-1.0), end(1.0)], stroke(GRID_COLOR, GRID_WIDTH * pt)))
                        .map_err(render_err("grid"))?;
                }
            }
        }

        if pane.edge_color.is_visible() {
            let mut closed = outline;
            closed.push(closed[0]);
            root.draw(&PathElement::new(closed, stroke(pane.edge_color, 0.8 * pt)))
                .map_err(render_err("pane edge"))?;
        }
    }
    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scatter: &Scatter3d,
    projector: &Projector,
    pt: f64,
) -> Result<()> {
    let faces = scatter.facecolors();
    let edges = scatter.edgecolors();
    let style = scatter.style();

    let mut glyphs: Vec<(usize, f64, (f64, f64))> = scatter
        .offsets()
        .iter()
        .enumerate()
        .filter(|(i, p)| {
            let size = scatter.size(*i);
            p.iter().all(|v| v.is_finite()) && size.is_finite() && size >= 0.0
        })
        .map(|(i, p)| (i, projector.depth(p), projector.to_pixel(p)))
        .collect();

    let skipped = scatter.len() - glyphs.len();
    if skipped > 0 {
        warn!(skipped, "skipping scatter points with non-finite coordinates or invalid sizes");
    }

    // Painter's order: furthest first
    glyphs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let (near, far) = glyphs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), g| (lo.min(g.1), hi.max(g.1)));

    for (index, depth, center) in glyphs {
        let shade: f32 = if style.depthshade && far > near {
            (1.0 - 0.7 * (depth - near) / (far - near)) as f32
        } else {
            1.0
        };

        let radius = scatter.size(index).sqrt() / 2.0 * pt;
        let face = faces[index];
        let face = face.with_alpha(face.a * shade);
        let edge = edges.as_ref().map(|e| {
            let c = e[index];
            c.with_alpha(c.a * shade)
        });
        let edge_width = style.linewidth * pt;

        draw_marker(root, style.marker, center, radius, face, edge.filter(|_| edge_width > 0.0), edge_width)?;
    }
    Ok(())
}

fn draw_marker<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    marker: Marker,
    center: (f64, f64),
    radius: f64,
    face: Rgba,
    edge: Option<Rgba>,
    edge_width: f64,
) -> Result<()> {
    if radius <= 0.0 {
        return Ok(());
    }
    let (cx, cy) = center;
    let err = render_err("marker");

    match marker {
        Marker::Circle => {
            let r = radius.round().max(1.0) as u32;
            root.draw(&Circle::new((px(cx), px(cy)), r, to_color(face).filled()))
                .map_err(&err)?;
            if let Some(edge) = edge {
                root.draw(&Circle::new((px(cx), px(cy)), r, stroke(edge, edge_width)))
                    .map_err(&err)?;
            }
        }
        Marker::Square => {
            let corners = [(px(cx - radius), px(cy - radius)), (px(cx + radius), px(cy + radius))];
            root.draw(&Rectangle::new(corners, to_color(face).filled()))
                .map_err(&err)?;
            if let Some(edge) = edge {
                root.draw(&Rectangle::new(corners, stroke(edge, edge_width)))
                    .map_err(&err)?;
            }
        }
        Marker::Triangle => {
            let dx = radius * 0.866;
            let points = vec![
                (px(cx), px(cy - radius)),
                (px(cx - dx), px(cy + radius * 0.5)),
                (px(cx + dx), px(cy + radius * 0.5)),
            ];
            root.draw(&Polygon::new(points.clone(), to_color(face).filled()))
                .map_err(&err)?;
            if let Some(edge) = edge {
                let mut closed = points;
                closed.push(closed[0]);
                root.draw(&PathElement::new(closed, stroke(edge, edge_width)))
                    .map_err(&err)?;
            }
        }
        Marker::Cross => {
            // Unfilled marker: strokes in the face color
            let line = stroke(face, edge_width.max(min_cross_width(radius)));
            for (dx, dy) in [(1.0, 1.0), (1.0, -1.0)] {
                let a = (px(cx - dx * radius), px(cy - dy * radius));
                let b = (px(cx + dx * radius), px(cy + dy * radius));
                root.draw(&PathElement::new(vec![a, b], line))
                    .map_err(&err)?;
            }
        }
    }
    Ok(())
}

/// Minimum stroke for unfilled markers, a fraction of their radius
fn min_cross_width(radius: f64) -> f64 {
    (radius / 4.0).max(1.0)
}

fn draw_text3d<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    text: &Text3d,
    projector: &Projector,
    pt: f64,
) -> Result<()> {
    if text.content.is_empty() || !text.position.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    let (x, y) = projector.to_pixel(&text.position);
    let pos = Pos::new(h_pos(text.halign), v_pos(text.valign));
    draw_text(root, &text.content, (x, y), &text.font, text.color, pos, pt)
}

fn draw_text<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    content: &str,
    at: (f64, f64),
    font: &FontProperties,
    color: Rgba,
    pos: Pos,
    pt: f64,
) -> Result<()> {
    let color = to_color(color);
    let style = TextStyle::from(FontDesc::new(
        font_family(&font.family),
        font.size * pt,
        font_style(font.style),
    ))
    .color(&color)
    .pos(pos);
    root.draw(&Text::new(content.to_string(), (px(at.0), px(at.1)), style))
        .map_err(render_err("text"))?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cbar: &Colorbar,
    (x, y, w, h): (f64, f64, f64, f64),
    pt: f64,
) -> Result<()> {
    let cmap = cbar.cmap();
    let alpha = cbar.alpha() as f32;
    let bands = cmap.len();
    let bottom = y + h;

    for i in 0..bands {
        let y_hi = bottom - (i + 1) as f64 / bands as f64 * h;
        let y_lo = bottom - i as f64 / bands as f64 * h;
        let c = cmap.sample_index(i);
        root.draw(&Rectangle::new(
            [(px(x), px(y_hi)), (px(x + w), px(y_lo))],
            to_color(c.with_alpha(c.a * alpha)).filled(),
        ))
        .map_err(render_err("colorbar"))?;
    }

    let tick_len = cbar.tick_length * pt;
    let tick_style = stroke(cbar.tick_color, cbar.tick_width * pt);
    let ticks = cbar.ticks();
    let labels = ticker::format_ticks(&ticks);
    let label_pos = Pos::new(HPos::Left, VPos::Center);

    for (value, label) in ticks.iter().zip(&labels) {
        let ty = bottom - cbar.fraction(*value) * h;
        root.draw(&PathElement::new(
            vec![(px(x + w), px(ty)), (px(x + w + tick_len), px(ty))],
            tick_style,
        ))
        .map_err(render_err("colorbar tick"))?;

        let label_x = x + w + tick_len + TICK_PAD * pt;
        draw_text(root, label, (label_x, ty), &cbar.tick_font, cbar.tick_color, label_pos, pt)?;
    }

    if cbar.outline_visible {
        root.draw(&Rectangle::new(
            [(px(x), px(y)), (px(x + w), px(bottom))],
            stroke(Rgba::BLACK, OUTLINE_WIDTH * pt),
        ))
        .map_err(render_err("colorbar outline"))?;
    }
    Ok(())
}

fn font_family(name: &str) -> FontFamily<'_> {
    match name.to_lowercase().as_str() {
        "serif" => FontFamily::Serif,
        "sans-serif" | "sans" => FontFamily::SansSerif,
        "monospace" => FontFamily::Monospace,
        _ => FontFamily::Name(name),
    }
}

fn font_style(slant: FontSlant) -> FontStyle {
    match slant {
        FontSlant::Normal => FontStyle::Normal,
        FontSlant::Italic => FontStyle::Italic,
        FontSlant::Oblique => FontStyle::Oblique,
    }
}

fn h_pos(align: HAlign) -> HPos {
    match align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    }
}

fn v_pos(align: VAlign) -> VPos {
    match align {
        VAlign::Top => VPos::Top,
        VAlign::Center => VPos::Center,
        VAlign::Baseline => VPos::Bottom,
    }
}

/// Encode a raw RGB pixel buffer to PNG
fn encode_rgb_to_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder
        .write_image(rgb, width, height, image::ColorType::Rgb8)
        .map_err(render_err("PNG encode"))?;
    Ok(png)
}
