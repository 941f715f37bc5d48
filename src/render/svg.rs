//! SVG chart output through `plotters`
//!
//! Each figure becomes one file in the output directory, numbered in the
//! order figures are shown: `00_layer_1.svg`, `01_mean_lifetime_grid.svg`, ...

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use super::{ChartSink, Figure, Panel};
use crate::error::{Result, TdaError};

/// Writes every figure as an SVG file
#[derive(Debug, Clone)]
pub struct SvgSink {
    dir: PathBuf,
    size: (u32, u32),
    written: Vec<PathBuf>,
}

impl SvgSink {
    /// Output into `dir`, created on first use
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            size: (1000, 800),
            written: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn next_path(&self, figure: &Figure) -> PathBuf {
        self.dir
            .join(format!("{:02}_{}.svg", self.written.len(), slug(figure.name())))
    }
}

impl ChartSink for SvgSink {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.next_path(figure);
        draw_figure(&path, self.size, figure).map_err(|e| TdaError::Render(e.to_string()))?;
        debug!(path = %path.display(), "figure written");
        self.written.push(path);
        Ok(())
    }
}

fn slug(name: &str) -> String {
    let s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let s = s.trim_matches('_').to_string();
    if s.is_empty() {
        "figure".to_string()
    } else {
        s
    }
}

/// Axis range with padding, widened when all values coincide
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    let span = hi - lo;
    if span.abs() < 1e-12 {
        let pad = lo.abs().max(1.0) * 0.1;
        return (lo - pad, hi + pad);
    }
    (lo - 0.05 * span, hi + 0.05 * span)
}

fn draw_figure(
    path: &Path,
    size: (u32, u32),
    figure: &Figure,
) -> std::result::Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = match &figure.title {
        Some(title) => root.titled(title, ("sans-serif", 22))?,
        None => root,
    };

    let n = figure.panels.len().max(1);
    let areas = root.split_evenly((n, 1));
    // Shared labels go on the middle panel (y) and the bottom panel (x)
    let y_label_panel = figure.panels.len() / 2;
    let x_label_panel = figure.panels.len().saturating_sub(1);

    for (i, (panel, area)) in figure.panels.iter().zip(areas.iter()).enumerate() {
        let x_label = panel.x_label.clone().or_else(|| {
            (i == x_label_panel).then(|| figure.shared_x_label.clone()).flatten()
        });
        let y_label = panel.y_label.clone().or_else(|| {
            (i == y_label_panel).then(|| figure.shared_y_label.clone()).flatten()
        });
        draw_panel(area, panel, x_label, y_label)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    panel: &Panel,
    x_label: Option<String>,
    y_label: Option<String>,
) -> std::result::Result<(), Box<dyn Error>> {
    let ((x_lo, x_hi), (y_lo, y_hi)) = panel.bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
    let (x_lo, x_hi) = padded(x_lo, x_hi);
    let (y_lo, y_hi) = padded(y_lo, y_hi);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    let mut mesh = chart.configure_mesh();
    if let Some(label) = x_label {
        mesh.x_desc(label);
    }
    if let Some(label) = y_label {
        mesh.y_desc(label);
    }
    mesh.draw()?;

    for trace in &panel.traces {
        chart.draw_series(LineSeries::new(trace.points.iter().copied(), &BLUE))?;
        if trace.markers {
            chart.draw_series(
                trace
                    .points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Trace;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Layer 1"), "layer_1");
        assert_eq!(slug("Mean lifetime, batch=1000"), "mean_lifetime__batch_1000");
        assert_eq!(slug("***"), "figure");
    }

    #[test]
    fn test_padded_degenerate_range() {
        let (lo, hi) = padded(2.0, 2.0);
        assert!(lo < 2.0 && hi > 2.0);
        assert_eq!(padded(f64::NAN, 1.0), (-1.0, 1.0));
    }

    #[test]
    fn test_svg_files_numbered_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = SvgSink::new(dir.path().join("plots")).with_size(400, 300);

        let single = Figure::single(
            Panel::new("layer_1")
                .x_label("Data amounts")
                .y_label("Mean lifetime")
                .trace(Trace::new(vec![(1000.0, 0.5), (2000.0, 0.7)]).with_markers()),
        );
        let grid = Figure {
            title: Some("grid".into()),
            panels: vec![
                Panel::new("Layer 1").trace(Trace::new(vec![(1.0, 1.0), (2.0, 3.0)])),
                Panel::new("Layer 2").trace(Trace::new(vec![(1.0, 2.0), (2.0, 2.0)])),
            ],
            shared_x_label: Some("Data amounts".into()),
            shared_y_label: Some("Entropy".into()),
        };

        sink.show(&single).unwrap();
        sink.show(&grid).unwrap();

        let names: Vec<_> = sink
            .written()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["00_layer_1.svg", "01_grid.svg"]);
        for path in sink.written() {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"));
        }
    }
}
