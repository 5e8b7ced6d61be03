mod format;
mod tooltip;

use serde::{Deserialize, Serialize};

pub use format::{ValueFormat, percent_of};
pub use tooltip::{
    AlignedTooltip, TooltipDescriptor, TooltipEntry, bar_at, describe_aligned_at,
    describe_aligned_drawn_at, describe_at, describe_vertex_at, slice_at,
};

use crate::render::{HitTarget, RenderFrame};

/// Pointer state a host keeps between events for one chart.
///
/// The chart itself holds no state; hosts feed pointer events here and read
/// back which element of the last rendered frame is hovered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HoverState {
    pointer: Option<(f64, f64)>,
    target: Option<HitTarget>,
}

impl HoverState {
    #[must_use]
    pub fn pointer(self) -> Option<(f64, f64)> {
        self.pointer
    }

    #[must_use]
    pub fn target(self) -> Option<HitTarget> {
        self.target
    }

    /// Records the pointer and hit-tests it against `frame`.
    pub fn on_pointer_move(&mut self, frame: &RenderFrame, x: f64, y: f64) -> Option<HitTarget> {
        if !x.is_finite() || !y.is_finite() {
            self.on_pointer_leave();
            return None;
        }
        self.pointer = Some((x, y));
        self.target = frame.hit_test(x, y);
        self.target
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
        self.target = None;
    }
}
