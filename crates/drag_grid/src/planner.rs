//! Collection diff classification and transition planning.
//!
//! Invoked whenever the host's collection resource changes. A length delta of
//! exactly one is treated as a single insert or delete and animated; any other
//! length change, or a same-length identity change, rebuilds the arrays with
//! no animation. The classification is deliberately approximate: two
//! simultaneous changes that happen to report a net delta of one are animated
//! as if a single element changed.

use bevy::prelude::*;

use crate::layout;
use crate::state::{Cell, GridItem, GridState, PendingCommit};
use crate::tween::{AnimationConfig, CellTween, GroupKind, TweenGroup};

#[derive(Debug)]
pub enum SyncOutcome<I: GridItem> {
    Noop,
    /// Arrays were replaced wholesale; any running animation must be dropped.
    Rebuilt,
    /// A single-element transition; the group belongs in the transition channel.
    Transition(TweenGroup<I>),
}

pub fn sync<I: GridItem>(
    state: &mut GridState<I>,
    data: &[I],
    dragged: Option<&str>,
    config: &AnimationConfig,
) -> SyncOutcome<I> {
    let committed = state.slots.len() as i64;
    let diff = data.len() as i64 - committed;
    if diff.abs() == 1 {
        let group = if diff > 0 {
            plan_insert(state, data, dragged, config)
        } else {
            plan_delete(state, data, dragged, config)
        };
        SyncOutcome::Transition(group)
    } else if diff != 0 {
        rebuild(state, data);
        SyncOutcome::Rebuilt
    } else if state
        .cells
        .iter()
        .zip(data)
        .any(|(cell, item)| cell.item != *item)
    {
        // a staged delete commit is meaningless once the cells are replaced
        state.pending = None;
        rebuild_cells(state, data);
        SyncOutcome::Rebuilt
    } else {
        SyncOutcome::Noop
    }
}

/// Recomputes slots and cells directly from the collection, no animation.
pub fn rebuild<I: GridItem>(state: &mut GridState<I>, data: &[I]) {
    state.pending = None;
    state.rows = layout::row_count(data.len(), state.columns);
    state.slots = layout::compute_slots(data.len(), state.columns, state.cell_size);
    rebuild_cells(state, data);
}

/// Same-length identity change: slots stay, cells are rebuilt in place.
fn rebuild_cells<I: GridItem>(state: &mut GridState<I>, data: &[I]) {
    state.cells = data
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Cell::new(item.clone(), state.slots.get(i).copied().unwrap_or_default())
        })
        .collect();
}

/// Insert: the new arrays are committed immediately. Survivors keep their
/// current animatable values, the new element fades in from zero, and every
/// cell whose slot moved is tweened there. The dragged cell is excluded so
/// pointer tracking is never overridden.
fn plan_insert<I: GridItem>(
    state: &mut GridState<I>,
    data: &[I],
    dragged: Option<&str>,
    config: &AnimationConfig,
) -> TweenGroup<I> {
    state.pending = None;
    let old_cells = core::mem::take(&mut state.cells);
    state.rows = layout::row_count(data.len(), state.columns);
    state.slots = layout::compute_slots(data.len(), state.columns, state.cell_size);

    let mut tweens = Vec::new();
    let mut added = None;
    state.cells = data
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let key = item.key();
            let slot = state.slots.get(i).copied().unwrap_or_default();
            if let Some(old) = old_cells.iter().find(|c| c.key == key) {
                let mut cell = old.clone();
                cell.item = item.clone();
                if dragged != Some(key.as_str()) && cell.pos != slot {
                    tweens.push(CellTween::position(&key, cell.pos, slot));
                }
                cell
            } else {
                let mut cell = Cell::new(item.clone(), slot);
                if added.is_none() {
                    cell.opacity = 0.0;
                    tweens.push(CellTween::opacity(&key, 0.0, 1.0));
                    added = Some(item.clone());
                }
                cell
            }
        })
        .collect();

    if added.is_none() {
        // ambiguous diff reported as +1; nothing fades, the reflow still runs
        debug!("insert transition without an identifiable diff item");
    }
    TweenGroup::new(
        GroupKind::Insert { added },
        tweens,
        config.easing,
        config.duration_ms,
        config.delay_ms,
    )
}

/// Delete: the old arrays stay committed while the removed cell fades out and
/// the survivors slide to their compacted slots; the staged arrays are
/// committed when the group completes.
fn plan_delete<I: GridItem>(
    state: &mut GridState<I>,
    data: &[I],
    dragged: Option<&str>,
    config: &AnimationConfig,
) -> TweenGroup<I> {
    let new_slots = layout::compute_slots(data.len(), state.columns, state.cell_size);

    let mut tweens = Vec::new();
    let mut removed = None;
    for cell in &state.cells {
        match data.iter().position(|item| item.key() == cell.key) {
            Some(new_index) => {
                if dragged == Some(cell.key.as_str()) {
                    continue;
                }
                let to = new_slots.get(new_index).copied().unwrap_or_default();
                if cell.pos != to {
                    tweens.push(CellTween::position(&cell.key, cell.pos, to));
                }
            }
            None => {
                if removed.is_none() {
                    removed = Some(cell.item.clone());
                    tweens.push(CellTween::opacity(&cell.key, cell.opacity, 0.0));
                }
            }
        }
    }
    if removed.is_none() {
        debug!("delete transition without an identifiable diff item");
    }

    state.pending = Some(PendingCommit {
        order: data.to_vec(),
        slots: new_slots,
    });
    TweenGroup::new(
        GroupKind::Delete { removed },
        tweens,
        config.easing,
        config.duration_ms,
        config.delay_ms,
    )
}
