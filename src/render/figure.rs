//! Backend-neutral description of a chart
//!
//! `ChartRenderer` builds figures, sinks decide what to do with them.

/// One polyline in a panel
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub points: Vec<(f64, f64)>,
    /// Draw a marker on every point
    pub markers: bool,
}

impl Trace {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            points,
            markers: false,
        }
    }

    pub fn with_markers(mut self) -> Self {
        self.markers = true;
        self
    }

    /// (min, max) over x and y, None when there are no points
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = self.points.first()?;
        let init = ((first.0, first.0), (first.1, first.1));
        Some(self.points.iter().fold(init, |((x0, x1), (y0, y1)), &(x, y)| {
            ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))
        }))
    }
}

/// One set of axes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub traces: Vec<Trace>,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Bounds over every trace of the panel
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        self.traces
            .iter()
            .filter_map(Trace::bounds)
            .reduce(|((ax0, ax1), (ay0, ay1)), ((bx0, bx1), (by0, by1))| {
                ((ax0.min(bx0), ax1.max(bx1)), (ay0.min(by0), ay1.max(by1)))
            })
    }
}

/// A full chart: stacked panels sharing the x axis, optional shared labels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Figure {
    pub title: Option<String>,
    pub panels: Vec<Panel>,
    pub shared_x_label: Option<String>,
    pub shared_y_label: Option<String>,
}

impl Figure {
    /// Single-panel figure
    pub fn single(panel: Panel) -> Self {
        Self {
            panels: vec![panel],
            ..Self::default()
        }
    }

    /// Title used for file names and logs
    pub fn name(&self) -> &str {
        self.title
            .as_deref()
            .or_else(|| self.panels.first().map(|p| p.title.as_str()))
            .unwrap_or("figure")
    }
}
