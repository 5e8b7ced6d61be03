mod axis;
mod frame;
mod null_renderer;
mod primitives;
mod svg_renderer;

pub use axis::{
    AXIS_FONT_SIZE_PX, AxisTick, MIN_CATEGORY_LABEL_SPACING_PX, append_break_marker,
    append_category_axis, append_value_axis, category_axis_ticks, month_axis_ticks,
    value_axis_ticks,
};
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    AXIS_COLOR, ArcShape, BarShape, Color, HitRegion, HitTarget, PathShape, SERIES_PALETTE,
    TEXT_COLOR, TextHAlign, TextShape, series_color,
};
pub use svg_renderer::{SvgRenderer, to_svg};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from aggregation and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
