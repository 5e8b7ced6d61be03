use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless hosts.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend sees it.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_path_count: usize,
    pub last_shape_count: usize,
    pub last_text_count: usize,
    pub last_hit_region_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_path_count = frame.paths.len();
        self.last_shape_count = frame.bars.len() + frame.arcs.len();
        self.last_text_count = frame.texts.len();
        self.last_hit_region_count = frame.hit_regions.len();
        Ok(())
    }
}
