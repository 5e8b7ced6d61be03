use serde::Serialize;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{ArcShape, BarShape, HitRegion, HitTarget, PathShape, TextShape};

/// Backend-agnostic scene for one chart draw pass.
///
/// Shapes are listed in paint order within each kind; backends paint paths,
/// then bars, then arcs, then text. `hit_regions` runs parallel to the
/// interactive shapes and carries back-references into the chart input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub paths: Vec<PathShape>,
    pub bars: Vec<BarShape>,
    pub arcs: Vec<ArcShape>,
    pub texts: Vec<TextShape>,
    pub hit_regions: Vec<HitRegion>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            paths: Vec::new(),
            bars: Vec::new(),
            arcs: Vec::new(),
            texts: Vec::new(),
            hit_regions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: PathShape) -> Self {
        self.paths.push(path);
        self
    }

    #[must_use]
    pub fn with_bar(mut self, bar: BarShape) -> Self {
        self.bars.push(bar);
        self
    }

    #[must_use]
    pub fn with_arc(mut self, arc: ArcShape) -> Self {
        self.arcs.push(arc);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextShape) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_hit_region(mut self, region: HitRegion) -> Self {
        self.hit_regions.push(region);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidData(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }

        for path in &self.paths {
            path.validate()?;
        }
        for bar in &self.bars {
            bar.validate()?;
        }
        for arc in &self.arcs {
            arc.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        for region in &self.hit_regions {
            region.validate()?;
        }

        Ok(())
    }

    /// `true` when nothing would be painted; hosts show a "no data" state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.bars.is_empty() && self.arcs.is_empty() && self.texts.is_empty()
    }

    /// Topmost hit region containing the point. Later regions win.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<HitTarget> {
        self.hit_regions
            .iter()
            .rev()
            .find(|region| region.contains(x, y))
            .map(|region| region.target)
    }
}
