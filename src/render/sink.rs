//! Chart sinks: where finished figures go
//!
//! Rendering never touches global state. Every `ChartRenderer` owns a sink,
//! so headless runs and tests substitute a no-op or recording sink for the
//! SVG writer.

use tracing::debug;

use super::Figure;
use crate::error::Result;

/// Receives each figure as it is completed
pub trait ChartSink {
    fn show(&mut self, figure: &Figure) -> Result<()>;
}

impl<S: ChartSink + ?Sized> ChartSink for &mut S {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        (**self).show(figure)
    }
}

/// Discards figures
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSink;

impl ChartSink for HeadlessSink {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        debug!(figure = figure.name(), "headless: figure discarded");
        Ok(())
    }
}

/// Keeps every figure in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub figures: Vec<Figure>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartSink for RecordingSink {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}
