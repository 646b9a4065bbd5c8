//! Pointer gesture adaptation: tap delivery, long-press arming, 1:1 drag
//! tracking, and the release snap.

use bevy::prelude::*;
use grid_helpers::input::{
    current_screen_position, just_pressed_screen_position, pointer_just_released,
};

use crate::drag::{ActiveDrag, DragPhase, DragSession};
use crate::events::{CellPressed, DragBegin, DragEnd};
use crate::reorder;
use crate::scroll::{GridFrame, ScrollState};
use crate::state::{GridItem, GridState};
use crate::tween::{
    Animations, CellTween, Easing, GroupKind, RELEASE_DURATION_MS, TweenGroup,
};
use crate::{GridConfig, LockedCells};

/// Pointer travel beyond this radius turns a pending press back into a scroll.
const PRESS_SLOP: f32 = 10.0;

/// A finger/button down on a cell that has not yet resolved into a tap, a
/// long-press, or a scroll.
#[derive(Debug, Clone)]
pub struct PendingPress {
    pub key: String,
    pub index: usize,
    pub screen: Vec2,
    pub timer: Timer,
}

#[derive(Resource, Debug, Default)]
pub struct PressState(pub Option<PendingPress>);

/// Array index of the cell whose slot contains the content-space point.
fn hit_test<I: GridItem>(state: &GridState<I>, content: Vec2) -> Option<usize> {
    if state.cell_size <= 0.0 || content.x < 0.0 || content.y < 0.0 {
        return None;
    }
    let col = (content.x / state.cell_size) as usize;
    let row = (content.y / state.cell_size) as usize;
    if col >= state.columns.max(1) {
        return None;
    }
    let index = col + row * state.columns.max(1);
    (index < state.cells.len()).then_some(index)
}

pub(crate) fn begin_press<I: GridItem>(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    frame: Res<GridFrame>,
    scroll: Res<ScrollState>,
    config: Res<GridConfig>,
    drag: Res<ActiveDrag>,
    locked: Res<LockedCells<I>>,
    mut press: ResMut<PressState>,
    mut state: ResMut<GridState<I>>,
) {
    let Some(screen) = just_pressed_screen_position(&buttons, &touches, &windows) else {
        return;
    };
    if press.0.is_some() || drag.0.is_some() {
        return;
    }
    let content = frame.screen_to_content(screen, scroll.offset);
    let Some(index) = hit_test(&state, content) else {
        return;
    };
    let Some(cell) = state.cells.get_mut(index) else {
        return;
    };
    let key = cell.key.clone();
    // press feedback; restored when the press resolves. Locked cells render
    // as plain views and get none, though the tap is still tracked.
    if !locked.check(&cell.item, index) {
        cell.opacity = config.active_opacity;
    }
    press.0 = Some(PendingPress {
        key,
        index,
        screen,
        timer: Timer::from_seconds(config.long_press_delay_ms / 1000.0, TimerMode::Once),
    });
}

pub(crate) fn fire_long_press<I: GridItem>(
    time: Res<Time>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    locked: Res<LockedCells<I>>,
    animations: Res<Animations<I>>,
    mut press: ResMut<PressState>,
    mut drag: ResMut<ActiveDrag>,
    mut state: ResMut<GridState<I>>,
    mut begin: EventWriter<DragBegin>,
) {
    let Some(pending) = press.0.as_mut() else {
        return;
    };
    if let Some(now) = current_screen_position(&buttons, &touches, &windows) {
        if now.distance(pending.screen) > PRESS_SLOP {
            // the gesture became a scroll
            let key = pending.key.clone();
            press.0 = None;
            if let Some(cell) = state.cell_mut(&key) {
                cell.opacity = 1.0;
            }
            return;
        }
    }
    if !pending.timer.tick(time.delta()).just_finished() {
        return;
    }
    let Some(pending) = press.0.take() else {
        return;
    };
    if let Some(cell) = state.cell_mut(&pending.key) {
        cell.opacity = 1.0;
    }
    // re-entrancy guard: no session while a rebuild/transition is mid-flight
    if animations.transition_running() {
        debug!("long-press ignored during a transition");
        return;
    }
    let Some(index) = state.index_of_key(&pending.key) else {
        return;
    };
    let Some(cell) = state.cells.get(index) else {
        return;
    };
    if locked.check(&cell.item, index) {
        return;
    }
    let Some(&origin) = state.slots.get(index) else {
        return;
    };
    drag.0 = Some(DragSession::new(pending.key, origin, pending.screen));
    begin.send(DragBegin);
}

pub(crate) fn drag_move<I: GridItem>(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    locked: Res<LockedCells<I>>,
    mut drag: ResMut<ActiveDrag>,
    mut state: ResMut<GridState<I>>,
    mut animations: ResMut<Animations<I>>,
) {
    let Some(session) = drag.0.as_mut() else {
        return;
    };
    if session.phase == DragPhase::Releasing {
        return;
    }
    let Some(now) = current_screen_position(&buttons, &touches, &windows) else {
        return;
    };
    if now == session.last_screen {
        return;
    }
    // the first move after arming takes scroll ownership
    session.phase = DragPhase::Dragging;
    session.last_screen = now;
    let pos = session.cell_pos(now);
    let key = session.key.clone();
    let Some(cell) = state.cell_mut(&key) else {
        return;
    };
    // direct write: the dragged cell tracks the pointer 1:1, never a tween
    cell.pos = pos;
    if animations.reorder_blocked() {
        return;
    }
    if let Some(group) =
        reorder::reorder(&mut state, &key, pos, &|item, index| locked.check(item, index))
    {
        animations.settle = Some(group);
    }
}

pub(crate) fn finish_press<I: GridItem>(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut press: ResMut<PressState>,
    mut drag: ResMut<ActiveDrag>,
    mut state: ResMut<GridState<I>>,
    mut animations: ResMut<Animations<I>>,
    mut pressed: EventWriter<CellPressed<I>>,
    mut drag_end: EventWriter<DragEnd<I>>,
) {
    if !pointer_just_released(&buttons, &touches) {
        return;
    }
    if let Some(pending) = press.0.take() {
        // released before the long-press fired: a tap
        if let Some(cell) = state.cell_mut(&pending.key) {
            cell.opacity = 1.0;
            pressed.send(CellPressed {
                item: cell.item.clone(),
                index: pending.index,
            });
        }
        return;
    }

    let Some(phase) = drag.0.as_ref().map(|s| s.phase) else {
        return;
    };
    if phase == DragPhase::Releasing {
        return;
    }
    let Some(key) = drag.dragged_key().map(str::to_owned) else {
        return;
    };
    if let Some(index) = state.index_of_key(&key) {
        // the cell may have moved during the drag; settle onto its current slot
        let from = state.cells.get(index).map(|c| c.pos).unwrap_or_default();
        let slot = state.slots.get(index).copied().unwrap_or_default();
        if let Some(session) = drag.0.as_mut() {
            session.phase = DragPhase::Releasing;
        }
        animations.release = Some(TweenGroup::new(
            GroupKind::Release,
            vec![CellTween::position(&key, from, slot)],
            Easing::EaseOutQuad,
            RELEASE_DURATION_MS,
            0.0,
        ));
    } else {
        // deleted out from under the drag: skip the settle entirely
        debug!("dragged cell vanished before release");
        drag.0 = None;
        drag_end.send(DragEnd {
            order: state.order(),
        });
    }
}
