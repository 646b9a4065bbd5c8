//! Vertical scrolling: the measured frame, the content offset, and the
//! autoscroller that nudges the viewport while a drag hovers near an edge.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::drag::{ActiveDrag, DragPhase};
use crate::gesture::PressState;
use crate::layout;
use crate::reorder;
use crate::state::{GridItem, GridState};
use crate::tween::Animations;
use crate::{GridConfig, LockedCells};

/// Offset changes at or below this magnitude are swallowed; they are clamp
/// residue, not scrolling.
pub const SCROLL_DEAD_ZONE: f32 = 0.2;

/// Content offset of the scrollable container, in points from the top.
#[derive(Resource, Debug, Default)]
pub struct ScrollState {
    pub offset: f32,
}

/// Measured viewport and margins, refreshed every frame from the window.
#[derive(Resource, Debug, Default, Clone)]
pub struct GridFrame {
    pub viewport: Vec2,
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl GridFrame {
    pub fn content_height(&self, rows: usize, cell_size: f32) -> f32 {
        (rows as f32).mul_add(cell_size, self.top + self.bottom)
    }

    pub fn max_offset(&self, rows: usize, cell_size: f32) -> f32 {
        (self.content_height(rows, cell_size) - self.viewport.y).max(0.0)
    }

    /// Window position (top-left origin, y down) to content space.
    pub fn screen_to_content(&self, screen: Vec2, scroll_offset: f32) -> Vec2 {
        Vec2::new(
            screen.x - self.left,
            screen.y - self.top + scroll_offset,
        )
    }

    /// Content-space top-left corner of a cell to the world position of its
    /// center (Bevy world space, y up, origin at the window center).
    pub fn content_to_world(&self, pos: Vec2, cell_size: f32, scroll_offset: f32) -> Vec2 {
        let screen = Vec2::new(
            self.left + pos.x + cell_size / 2.0,
            self.top + pos.y - scroll_offset + cell_size / 2.0,
        );
        Vec2::new(
            screen.x - self.viewport.x / 2.0,
            self.viewport.y / 2.0 - screen.y,
        )
    }
}

/// Edge-proximity acceleration: zero in the middle band, ramping linearly to
/// plus/minus half a cell at the viewport edges.
pub fn edge_acceleration(
    pointer_y: f32,
    half_cell: f32,
    top: f32,
    bottom: f32,
    viewport_height: f32,
) -> f32 {
    if pointer_y < top + half_cell {
        (pointer_y - (top + half_cell)).max(-half_cell)
    } else if pointer_y > viewport_height - bottom - half_cell {
        (pointer_y - (viewport_height - bottom - half_cell)).min(half_cell)
    } else {
        0.0
    }
}

/// The offset change that survives clamping into `[0, max]`.
pub fn clamped_scroll_delta(offset: f32, requested: f32, max: f32) -> f32 {
    (offset + requested).clamp(0.0, max.max(0.0)) - offset
}

/// Refreshes the frame from the window and reflows the grid when the derived
/// cell size or column count changed.
pub(crate) fn measure<I: GridItem>(
    windows: Query<&Window>,
    config: Res<GridConfig>,
    drag: Res<ActiveDrag>,
    mut frame: ResMut<GridFrame>,
    mut state: ResMut<GridState<I>>,
    mut animations: ResMut<Animations<I>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    frame.viewport = Vec2::new(window.width(), window.height());
    frame.top = config.margins.top;
    frame.bottom = config.margins.bottom;
    frame.left = config.margins.left;
    frame.right = config.margins.right;

    let width = config.width.unwrap_or(frame.viewport.x);
    let columns = config.columns.max(1);
    let cell_size = ((width - frame.left - frame.right) / columns as f32).max(0.0);
    if state.columns == columns && (state.cell_size - cell_size).abs() <= f32::EPSILON {
        return;
    }

    debug!("grid reflow: {columns} columns, cell size {cell_size}");
    state.columns = columns;
    state.cell_size = cell_size;
    state.rows = layout::row_count(state.cells.len(), columns);
    state.slots = layout::compute_slots(state.cells.len(), columns, cell_size);
    animations.clear();
    let dragged = drag.dragged_key().map(str::to_owned);
    let state = &mut *state;
    for (cell, slot) in state.cells.iter_mut().zip(state.slots.iter()) {
        if dragged.as_deref() != Some(cell.key.as_str()) {
            cell.pos = *slot;
        }
    }
}

/// While the drag hovers near an edge, nudges the offset, feeds the
/// displacement back into the dragged cell, and retargets the reorder.
pub(crate) fn autoscroll<I: GridItem>(
    frame: Res<GridFrame>,
    locked: Res<LockedCells<I>>,
    mut scroll: ResMut<ScrollState>,
    mut drag: ResMut<ActiveDrag>,
    mut state: ResMut<GridState<I>>,
    mut animations: ResMut<Animations<I>>,
) {
    let Some(session) = drag.0.as_mut() else {
        return;
    };
    if session.phase != DragPhase::Dragging {
        return;
    }
    let half = state.cell_size / 2.0;
    if half <= 0.0 {
        return;
    }
    let acceleration = edge_acceleration(
        session.last_screen.y,
        half,
        frame.top,
        frame.bottom,
        frame.viewport.y,
    );
    if acceleration == 0.0 {
        return;
    }
    let requested = (acceleration / half) * 10.0;
    let max = frame.max_offset(state.rows, state.cell_size);
    let delta = clamped_scroll_delta(scroll.offset, requested, max);
    if delta.abs() <= SCROLL_DEAD_ZONE {
        return;
    }

    scroll.offset += delta;
    session.scroll_accum += delta;
    let pos = session.cell_pos(session.last_screen);
    let key = session.key.clone();
    let Some(cell) = state.cell_mut(&key) else {
        return;
    };
    cell.pos = pos;
    if !animations.reorder_blocked() {
        if let Some(group) =
            reorder::reorder(&mut state, &key, pos, &|item, index| locked.check(item, index))
        {
            animations.settle = Some(group);
        }
    }
}

/// Wheel and touch-pan scrolling while no drag owns the gesture.
pub(crate) fn scroll_container<I: GridItem>(
    mut wheel: EventReader<MouseWheel>,
    touches: Res<Touches>,
    drag: Res<ActiveDrag>,
    press: Res<PressState>,
    frame: Res<GridFrame>,
    state: Res<GridState<I>>,
    mut scroll: ResMut<ScrollState>,
) {
    if drag.0.is_some() {
        // scroll control is ceded to the drag session
        wheel.clear();
        return;
    }
    let mut delta = 0.0;
    for event in wheel.read() {
        delta -= match event.unit {
            MouseScrollUnit::Line => event.y * state.cell_size.max(40.0) * 0.5,
            MouseScrollUnit::Pixel => event.y,
        };
    }
    if press.0.is_none() {
        for touch in touches.iter() {
            delta -= touch.delta().y;
        }
    }
    if delta == 0.0 {
        return;
    }
    let max = frame.max_offset(state.rows, state.cell_size);
    scroll.offset = (scroll.offset + delta).clamp(0.0, max);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceleration_is_zero_in_the_middle_band() {
        let half = 50.0;
        assert_eq!(edge_acceleration(300.0, half, 0.0, 0.0, 640.0), 0.0);
        assert_eq!(edge_acceleration(50.0, half, 0.0, 0.0, 640.0), 0.0, "exactly at the band edge");
    }

    #[test]
    fn acceleration_ramps_and_saturates_near_edges() {
        let half = 50.0;
        assert_eq!(edge_acceleration(30.0, half, 0.0, 0.0, 640.0), -20.0, "partial ramp above");
        assert_eq!(edge_acceleration(-400.0, half, 0.0, 0.0, 640.0), -half, "saturated above");
        assert_eq!(edge_acceleration(620.0, half, 0.0, 0.0, 640.0), 30.0, "partial ramp below");
        assert_eq!(edge_acceleration(2000.0, half, 0.0, 0.0, 640.0), half, "saturated below");
    }

    #[test]
    fn margins_shift_the_edge_bands() {
        let half = 50.0;
        assert_eq!(edge_acceleration(100.0, half, 60.0, 0.0, 640.0), -10.0, "top margin pushes the band down");
        assert_eq!(edge_acceleration(560.0, half, 0.0, 40.0, 640.0), 10.0, "bottom margin pulls the band up");
    }

    #[test]
    fn scroll_delta_clamps_to_content_bounds() {
        assert_eq!(clamped_scroll_delta(0.0, -30.0, 500.0), 0.0, "cannot scroll above the top");
        assert_eq!(clamped_scroll_delta(490.0, 30.0, 500.0), 10.0, "clipped at the bottom");
        assert_eq!(clamped_scroll_delta(200.0, 30.0, 500.0), 30.0, "free in the middle");
        assert_eq!(clamped_scroll_delta(100.0, -500.0, 500.0), -100.0, "clipped at the top");
        assert_eq!(clamped_scroll_delta(0.0, 30.0, -50.0), 0.0, "content shorter than the viewport never scrolls");
    }

    #[test]
    fn dead_zone_swallows_clamp_residue() {
        let delta = clamped_scroll_delta(499.9, 10.0, 500.0);
        assert!(delta.abs() <= SCROLL_DEAD_ZONE, "residual {delta} is below the dead-zone");
    }

    #[test]
    fn max_offset_accounts_for_margins() {
        let frame = GridFrame {
            viewport: Vec2::new(360.0, 640.0),
            top: 60.0,
            bottom: 20.0,
            ..Default::default()
        };
        assert_eq!(frame.max_offset(10, 100.0), 440.0, "rows plus margins minus viewport");
        assert_eq!(frame.max_offset(2, 100.0), 0.0, "short content clamps to zero");
    }

    #[test]
    fn content_and_world_mappings_agree() {
        let frame = GridFrame {
            viewport: Vec2::new(360.0, 640.0),
            top: 60.0,
            left: 2.0,
            ..Default::default()
        };
        let screen = Vec2::new(120.0, 300.0);
        let content = frame.screen_to_content(screen, 75.0);
        assert_eq!(content, Vec2::new(118.0, 315.0), "margins and offset applied");

        let world = frame.content_to_world(Vec2::ZERO, 100.0, 0.0);
        assert_eq!(
            world,
            Vec2::new(2.0 + 50.0 - 180.0, 320.0 - (60.0 + 50.0)),
            "first cell center in world space"
        );
        let scrolled = frame.content_to_world(Vec2::ZERO, 100.0, 40.0);
        assert_eq!(scrolled.y, world.y + 40.0, "scrolling down moves cells up");
    }
}
