//! Live reordering: maps the dragged cell's position to a target slot and
//! swaps it with the occupant, letting the neighbors settle into place.

use bevy::prelude::*;

use crate::state::{GridItem, GridState};
use crate::tween::{CellTween, Easing, GroupKind, SETTLE_DURATION_MS, TweenGroup};

/// Target index for a dragged cell at `pos` (content space, top-left corner).
/// The column and row round to the nearest slot and clamp into the grid, so
/// an out-of-range pointer can never index out of bounds.
pub fn target_index<I: GridItem>(state: &GridState<I>, pos: Vec2) -> Option<usize> {
    let len = state.cells.len();
    if len == 0 || state.cell_size <= 0.0 {
        return None;
    }
    let s = state.cell_size;
    let columns = state.columns.max(1);
    let max_col = columns as i64 - 1;
    let max_row = state.rows.max(1) as i64 - 1;
    let col = (((pos.x + s / 2.0) / s).floor() as i64).clamp(0, max_col) as usize;
    let row = (((pos.y + s / 2.0) / s).floor() as i64).clamp(0, max_row) as usize;
    Some((col + row * columns).min(len - 1))
}

/// Swaps the dragged cell with the occupant of the slot under `pos` and
/// returns the settle group for the displaced neighbors. `None` when nothing
/// changes: the target is the dragged cell's own slot, the occupant is
/// locked, or the grid is degenerate. Serialization against running
/// animations is the caller's job (the group must only be started when the
/// settle channel is free).
pub fn reorder<I: GridItem>(
    state: &mut GridState<I>,
    dragged_key: &str,
    pos: Vec2,
    locked: &dyn Fn(&I, usize) -> bool,
) -> Option<TweenGroup<I>> {
    let index = target_index(state, pos)?;
    let dragged_index = state.index_of_key(dragged_key)?;
    let occupant = state.cells.get(index)?;
    if index == dragged_index || locked(&occupant.item, index) {
        return None;
    }

    state.cells.swap(index, dragged_index);

    // every displaced cell slides to the slot of its new index; the dragged
    // cell keeps following the pointer
    let mut tweens = Vec::new();
    for (i, cell) in state.cells.iter().enumerate() {
        if cell.key == dragged_key {
            continue;
        }
        let Some(&slot) = state.slots.get(i) else {
            continue;
        };
        if cell.pos != slot {
            tweens.push(CellTween::position(&cell.key, cell.pos, slot));
        }
    }
    Some(TweenGroup::new(
        GroupKind::Settle,
        tweens,
        Easing::EaseInOut,
        SETTLE_DURATION_MS,
        0.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner;

    const CELL: f32 = 100.0;

    fn fixture(keys: &[&str], columns: usize) -> GridState<String> {
        let mut state = GridState::default();
        state.columns = columns;
        state.cell_size = CELL;
        let items: Vec<String> = keys.iter().map(|k| (*k).to_owned()).collect();
        planner::rebuild(&mut state, &items);
        state
    }

    fn unlocked(_: &String, _: usize) -> bool {
        false
    }

    #[test]
    fn target_rounds_to_nearest_slot() {
        let state = fixture(&["a", "b", "c", "d", "e"], 3);
        assert_eq!(target_index(&state, Vec2::new(0.0, 0.0)), Some(0));
        assert_eq!(target_index(&state, Vec2::new(200.0, 0.0)), Some(2));
        assert_eq!(target_index(&state, Vec2::new(160.0, 90.0)), Some(4), "nearest is (2,1), capped to the last cell");
        assert_eq!(target_index(&state, Vec2::new(40.0, 40.0)), Some(0), "within half a cell of the origin slot");
    }

    #[test]
    fn target_clamps_out_of_range_pointers() {
        let state = fixture(&["a", "b", "c", "d", "e"], 3);
        assert_eq!(target_index(&state, Vec2::new(-500.0, -500.0)), Some(0), "clamped to the first slot");
        assert_eq!(target_index(&state, Vec2::new(9000.0, 9000.0)), Some(4), "clamped into the last cell");
        assert_eq!(
            target_index(&state, Vec2::new(9000.0, 0.0)),
            Some(2),
            "x clamps to the last column, not past it"
        );
    }

    #[test]
    fn swap_produces_settle_for_displaced_only() {
        let mut state = fixture(&["a", "b", "c", "d", "e"], 3);
        let group = reorder(&mut state, "a", Vec2::new(200.0, 0.0), &unlocked);
        let group = group.expect("swap happened");

        let keys: Vec<_> = state.cells.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "b", "a", "d", "e"], "array positions swapped");
        let moved: Vec<_> = group.tweens.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(moved, vec!["c"], "only the displaced occupant settles");
    }

    #[test]
    fn dropping_on_own_slot_is_a_noop() {
        let mut state = fixture(&["a", "b", "c"], 3);
        let group = reorder(&mut state, "b", Vec2::new(100.0, 0.0), &unlocked);
        assert!(group.is_none(), "target equals the dragged index");
        let keys: Vec<_> = state.cells.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"], "order untouched");
    }

    #[test]
    fn locked_occupant_is_never_a_swap_target() {
        let mut state = fixture(&["+", "a", "b", "c"], 3);
        let locked = |item: &String, _: usize| item == "+";
        let group = reorder(&mut state, "c", Vec2::new(0.0, 0.0), &locked);
        assert!(group.is_none(), "locked slot rejected");
        let keys: Vec<_> = state.cells.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["+", "a", "b", "c"], "order untouched");
    }

    #[test]
    fn vanished_dragged_key_is_a_noop() {
        let mut state = fixture(&["a", "b"], 2);
        let group = reorder(&mut state, "ghost", Vec2::ZERO, &unlocked);
        assert!(group.is_none(), "cell deleted mid-drag");
    }

    #[test]
    fn empty_grid_has_no_target() {
        let state = fixture(&[], 3);
        assert_eq!(target_index(&state, Vec2::ZERO), None);
    }
}
