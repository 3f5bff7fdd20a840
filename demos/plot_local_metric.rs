//! Render a local metric plot from a delimited file or synthetic data
//!
//! Input rows are `x y z size value label`, separated by commas, tabs,
//! semicolons or spaces. A leading header row is skipped.
//!
//! ```text
//! plot_local_metric --input nodes.csv --output nodes.svg
//! plot_local_metric --synthetic 40 --output ring.png --font DejaVuSans.ttf
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use ndarray::Array2;
use netlocal_visualization::{
    plot_3d_local_metric_with_config, register_font, EdgeColor, FontSlant, PlotConfig, ScatterStyle,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "plot_local_metric", about = "Top-down 3D scatter plot of a local network metric")]
struct Args {
    /// Delimited input file with x, y, z, size, value and label columns
    #[arg(short, long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Generate this many random points instead of reading a file
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic data
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Output image, `.png` or `.svg`
    #[arg(short, long, default_value = "local_metric.svg")]
    output: PathBuf,

    /// Override the output resolution
    #[arg(long)]
    dpi: Option<f64>,

    /// JSON file with plot settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TrueType font used for all text in PNG output
    #[arg(long)]
    font: Option<PathBuf>,

    /// Scatter alpha, overriding the plot default
    #[arg(long)]
    alpha: Option<f64>,

    /// Draw markers without edges
    #[arg(long)]
    no_edges: bool,
}

/// Columns of a metric table
#[derive(Debug, Default)]
struct MetricTable {
    coordinates: Vec<f64>,
    sizes: Vec<f64>,
    values: Vec<f64>,
    labels: Vec<String>,
}

impl MetricTable {
    fn len(&self) -> usize {
        self.sizes.len()
    }

    fn push(&mut self, xyz: [f64; 3], size: f64, value: f64, label: String) {
        self.coordinates.extend_from_slice(&xyz);
        self.sizes.push(size);
        self.values.push(value);
        self.labels.push(label);
    }
}

/// Most frequent delimiter in `line`; ties go to the earlier one in
/// `, \t ; space` order so `", "` separated rows split on commas
fn detect_delimiter(line: &str) -> Option<char> {
    let mut best: Option<(usize, char)> = None;
    for d in [',', '\t', ';', ' '] {
        let count = line.matches(d).count();
        if count > 0 && best.map_or(true, |(top, _)| count > top) {
            best = Some((count, d));
        }
    }
    best.map(|(_, d)| d)
}

fn read_table(path: &Path) -> Result<MetricTable> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_table(&text).with_context(|| format!("parsing {}", path.display()))
}

fn parse_table(text: &str) -> Result<MetricTable> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')).peekable();

    let first = match lines.peek() {
        Some(line) => *line,
        None => bail!("no rows"),
    };
    let delimiter = detect_delimiter(first).context("could not detect a column delimiter")?;

    let mut table = MetricTable::default();
    for (row, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split(delimiter).map(str::trim).filter(|f| !f.is_empty()).collect();
        if fields.len() < 6 {
            bail!("row {}: expected 6 columns, got {}", row + 1, fields.len());
        }
        let numbers: Result<Vec<f64>, _> = fields[..5].iter().map(|f| f.parse::<f64>()).collect();
        let numbers = match numbers {
            Ok(numbers) => numbers,
            Err(_) if row == 0 => {
                info!(header = line, "skipping header row");
                continue;
            }
            Err(e) => bail!("row {}: {}", row + 1, e),
        };
        // labels may contain the delimiter
        let label = fields[5..].join(delimiter.to_string().as_str());
        table.push([numbers[0], numbers[1], numbers[2]], numbers[3], numbers[4], label);
    }
    Ok(table)
}

/// A noisy ring of nodes with a hub in the middle
fn synthetic_table(n: usize, seed: u64) -> MetricTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table = MetricTable::default();
    table.push([0.0, 0.0, 0.0], 200.0, 0.0, "hub".to_string());
    for i in 1..n {
        let angle = 2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64;
        let radius = rng.gen_range(0.6..1.0);
        table.push(
            [radius * angle.cos(), radius * angle.sin(), rng.gen_range(-0.2..0.2)],
            rng.gen_range(10.0..120.0),
            angle.sin() * rng.gen_range(0.5..1.0),
            format!("n{}", i),
        );
    }
    table
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PlotConfig::from_json_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => PlotConfig::default(),
    };
    if let Some(dpi) = args.dpi {
        config.dpi = dpi;
    }

    if let Some(path) = &args.font {
        let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        for family in ["sans-serif", config.tick_font.family.as_str()] {
            register_font(family, FontSlant::Normal, bytes).with_context(|| format!("registering {}", family))?;
        }
    }

    let table = match (&args.input, args.synthetic) {
        (Some(path), _) => read_table(path)?,
        (None, Some(n)) if n > 1 => synthetic_table(n, args.seed),
        (None, Some(n)) => bail!("--synthetic needs at least 2 points, got {}", n),
        (None, None) => bail!("pass --input <file> or --synthetic <n>"),
    };
    info!(points = table.len(), "loaded metric table");

    let coordinates = Array2::from_shape_vec((table.len(), 3), table.coordinates)?;

    let mut style = ScatterStyle::default();
    if let Some(alpha) = args.alpha {
        style = style.alpha(alpha);
    }
    if args.no_edges {
        style = style.edgecolor(EdgeColor::None);
    }

    let output = plot_3d_local_metric_with_config(
        &table.sizes,
        &table.values,
        coordinates.view(),
        &table.labels,
        None,
        false,
        style,
        &config,
    )?;

    let is_png = args.output.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png && args.font.is_none() {
        warn!("PNG text needs a font, pass --font if rendering fails");
    }

    output
        .figure()
        .save(&args.output, Some(config.dpi))
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = %args.output.display(), "saved plot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("1,2,3,4,5,a"), Some(','));
        assert_eq!(detect_delimiter("1\t2\t3\t4\t5\ta"), Some('\t'));
        assert_eq!(detect_delimiter("1;2;3;4;5;a"), Some(';'));
        assert_eq!(detect_delimiter("1 2 3 4 5 a"), Some(' '));
        assert_eq!(detect_delimiter("x, y, z, size, value, label"), Some(','));
        assert_eq!(detect_delimiter("single"), None);
    }

    #[test]
    fn test_parse_each_delimiter() {
        for delimiter in [",", "\t", ";", " ", ", "] {
            let text = ["0.1", "0.2", "0.3", "10", "0.5", "a"].join(delimiter)
                + "\n"
                + &["1", "2", "3", "20", "-0.5", "b"].join(delimiter);
            let table = parse_table(&text).unwrap();
            assert_eq!(table.len(), 2, "delimiter {:?}", delimiter);
            assert_eq!(table.coordinates, vec![0.1, 0.2, 0.3, 1.0, 2.0, 3.0]);
            assert_eq!(table.sizes, vec![10.0, 20.0]);
            assert_eq!(table.values, vec![0.5, -0.5]);
            assert_eq!(table.labels, vec!["a", "b"]);
        }
    }

    #[test]
    fn test_parse_comma_space_with_header() {
        let text = "x, y, z, size, value, label\n0.1, 0.2, 0.3, 10, 0.5, a\n1, 1, 1, 5, 0.0, b\n";
        let table = parse_table(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.labels, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_without_header_and_comments() {
        let text = "# exported nodes\n\n0 0 0 1 0 hub\n";
        let table = parse_table(text).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.labels, vec!["hub"]);
    }

    #[test]
    fn test_label_keeps_delimiter() {
        let table = parse_table("0 0 0 1 0.5 node one\n").unwrap();
        assert_eq!(table.labels, vec!["node one"]);
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        assert!(parse_table("").is_err());
        assert!(parse_table("1,2,3,4,5\n").is_err());

        let err = parse_table("1,2,3,4,5,a\n1,2,oops,4,5,b\n").unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_read_table_from_file() {
        let path = std::env::temp_dir().join(format!("netlocal_demo_{}.csv", std::process::id()));
        std::fs::write(&path, "x,y,z,size,value,label\n1,2,3,4,5,n\n").unwrap();
        let table = read_table(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(table.len(), 1);

        assert!(read_table(Path::new("/nonexistent/netlocal.csv")).is_err());
    }

    #[test]
    fn test_synthetic_table() {
        for n in [2, 3, 40] {
            let table = synthetic_table(n, 7);
            assert_eq!(table.len(), n);
            assert_eq!(table.coordinates.len(), 3 * n);
            assert_eq!(table.labels.len(), n);
        }
        let a = synthetic_table(10, 1);
        let b = synthetic_table(10, 1);
        assert_eq!(a.values, b.values);
    }
}
