//! Shared grid state: the committed cell and slot arrays every other part of
//! the widget reads and mutates in place.

use bevy::prelude::*;

use crate::layout;

/// Stable identity for a grid payload.
///
/// The key must survive reordering and collection rebuilds; the widget
/// re-resolves the dragged cell by key, never by index.
pub trait GridItem: Clone + PartialEq + Send + Sync + 'static {
    fn key(&self) -> String;
}

impl GridItem for String {
    fn key(&self) -> String {
        self.clone()
    }
}

/// One visual unit bound to one payload element.
///
/// `pos` and `opacity` are the animatable values: tween channels and the
/// direct drag write both target them, and the render sync reads them every
/// frame.
#[derive(Debug, Clone)]
pub struct Cell<I: GridItem> {
    pub item: I,
    pub key: String,
    /// Top-left corner in content space (y grows downward).
    pub pos: Vec2,
    pub opacity: f32,
}

impl<I: GridItem> Cell<I> {
    pub fn new(item: I, pos: Vec2) -> Self {
        let key = item.key();
        Self {
            item,
            key,
            pos,
            opacity: 1.0,
        }
    }
}

/// Replacement arrays staged by a delete transition, committed when the
/// fade-out group completes.
#[derive(Debug, Clone)]
pub struct PendingCommit<I: GridItem> {
    pub order: Vec<I>,
    pub slots: Vec<Vec2>,
}

#[derive(Resource, Debug)]
pub struct GridState<I: GridItem> {
    pub cells: Vec<Cell<I>>,
    pub slots: Vec<Vec2>,
    pub cell_size: f32,
    pub columns: usize,
    pub rows: usize,
    pub pending: Option<PendingCommit<I>>,
}

impl<I: GridItem> Default for GridState<I> {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            slots: Vec::new(),
            cell_size: 0.0,
            columns: 1,
            rows: 0,
            pending: None,
        }
    }
}

impl<I: GridItem> GridState<I> {
    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        self.cells.iter().position(|c| c.key == key)
    }

    pub fn cell_mut(&mut self, key: &str) -> Option<&mut Cell<I>> {
        self.cells.iter_mut().find(|c| c.key == key)
    }

    /// Payloads in their current array order.
    pub fn order(&self) -> Vec<I> {
        self.cells.iter().map(|c| c.item.clone()).collect()
    }

    /// Swaps in the arrays staged by a delete transition. Live cells are
    /// carried over so an actively dragged cell keeps its pointer-driven
    /// position across the commit.
    pub fn commit_pending(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let old_cells = core::mem::take(&mut self.cells);
        self.cells = pending
            .order
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let key = item.key();
                old_cells
                    .iter()
                    .find(|c| c.key == key)
                    .cloned()
                    .unwrap_or_else(|| {
                        Cell::new(
                            item.clone(),
                            pending.slots.get(i).copied().unwrap_or_default(),
                        )
                    })
            })
            .collect();
        self.rows = layout::row_count(pending.order.len(), self.columns);
        self.slots = pending.slots;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(key: &str, x: f32) -> Cell<String> {
        Cell::new(key.to_owned(), Vec2::new(x, 0.0))
    }

    #[test]
    fn index_lookup_is_by_key() {
        let mut state = GridState::<String>::default();
        state.cells = vec![cell("a", 0.0), cell("b", 10.0)];
        assert_eq!(state.index_of_key("b"), Some(1), "existing key");
        assert_eq!(state.index_of_key("missing"), None, "absent key");
    }

    #[test]
    fn commit_pending_preserves_live_cells() {
        let mut state = GridState::<String>::default();
        state.columns = 2;
        state.cells = vec![cell("a", 0.0), cell("b", 10.0), cell("c", 20.0)];
        state.slots = vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)];
        // b was deleted; c has been dragged to an off-slot position
        if let Some(c) = state.cell_mut("c") {
            c.pos = Vec2::new(55.0, 5.0);
        }
        state.pending = Some(PendingCommit {
            order: vec!["a".to_owned(), "c".to_owned()],
            slots: vec![Vec2::ZERO, Vec2::new(10.0, 0.0)],
        });

        assert!(state.commit_pending(), "pending arrays were staged");
        assert_eq!(state.cells.len(), 2, "deleted cell dropped");
        assert_eq!(state.slots.len(), 2, "slots compacted");
        assert_eq!(state.rows, 1, "row count rederived");
        let c = state.cells.get(1).map(|c| c.pos);
        assert_eq!(c, Some(Vec2::new(55.0, 5.0)), "live position carried over");
        assert!(!state.commit_pending(), "second commit is a no-op");
    }
}
