//! A reorderable grid widget: fixed-column layout, long-press drag with live
//! neighbor reordering, edge autoscroll, and animated insert/delete
//! transitions.
//!
//! The host owns the collection in [`GridData`] and mutates it freely; the
//! widget diffs the collection every change, animates single-element inserts
//! and deletes, and rebuilds silently for anything larger. A long-press on a
//! cell starts a drag session; the committed order is reported through
//! [`DragEnd`] once the released cell settles.

use core::marker::PhantomData;
use std::sync::Arc;

use bevy::prelude::*;

mod drag;
mod error;
mod events;
mod gesture;
mod layout;
mod planner;
mod render;
mod reorder;
mod scroll;
mod state;
mod tween;

pub use drag::{ActiveDrag, DragPhase, DragSession};
pub use error::GridConfigError;
pub use events::{CellPressed, DeleteAnimationEnd, DragBegin, DragEnd, InsertAnimationEnd};
pub use render::{CellEntities, CellRenderer, CellVisual, GridRoot, LockedCellRenderer};
pub use scroll::{GridFrame, ScrollState};
pub use state::{Cell, GridItem, GridState};
pub use tween::{AnimationConfig, Animations, Easing};

/// The host-owned collection the grid mirrors. Reorders performed by the
/// widget are reported through [`DragEnd`]; writing the new order back is the
/// host's decision.
#[derive(Resource, Debug)]
pub struct GridData<I: GridItem>(pub Vec<I>);

impl<I: GridItem> Default for GridData<I> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

/// Outer spacing around the grid content, in points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Widget configuration. Cells are square; their size is derived from the
/// content width and the column count, never set directly.
#[derive(Resource, Debug, Clone)]
pub struct GridConfig {
    pub columns: usize,
    /// Content width override; the window width when `None`.
    pub width: Option<f32>,
    pub margins: Margins,
    /// Opacity feedback while a press is held on a cell.
    pub active_opacity: f32,
    pub long_press_delay_ms: f32,
    /// Scale applied to the dragged cell while it floats.
    pub selected_scale: f32,
    pub animation: AnimationConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            width: None,
            margins: Margins::default(),
            active_opacity: 0.5,
            long_press_delay_ms: 500.0,
            selected_scale: 1.1,
            animation: AnimationConfig::default(),
        }
    }
}

impl GridConfig {
    pub fn new(columns: usize) -> Result<Self, GridConfigError> {
        if columns == 0 {
            return Err(GridConfigError::ZeroColumns);
        }
        Ok(Self {
            columns,
            ..Self::default()
        })
    }

    pub fn with_width(mut self, width: f32) -> Result<Self, GridConfigError> {
        if width <= 0.0 {
            return Err(GridConfigError::NonPositiveWidth(width));
        }
        self.width = Some(width);
        Ok(self)
    }
}

type LockFn<I> = dyn Fn(&I, usize) -> bool + Send + Sync;

/// Predicate marking cells that neither drag nor yield their slot to a
/// dragged neighbor. Locked cells still receive taps.
#[derive(Resource, Clone)]
pub struct LockedCells<I: GridItem>(pub Option<Arc<LockFn<I>>>);

impl<I: GridItem> Default for LockedCells<I> {
    fn default() -> Self {
        Self(None)
    }
}

impl<I: GridItem> LockedCells<I> {
    pub fn from_fn(f: impl Fn(&I, usize) -> bool + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(f)))
    }

    pub fn check(&self, item: &I, index: usize) -> bool {
        self.0.as_ref().is_some_and(|f| f(item, index))
    }
}

/// Diffs the host collection against the committed arrays whenever it
/// changes and starts the matching transition.
fn sync_collection<I: GridItem>(
    data: Res<GridData<I>>,
    config: Res<GridConfig>,
    drag: Res<ActiveDrag>,
    mut grid: ResMut<GridState<I>>,
    mut animations: ResMut<Animations<I>>,
) {
    if !data.is_changed() {
        return;
    }
    let dragged = drag.dragged_key().map(str::to_owned);
    match planner::sync(&mut grid, &data.0, dragged.as_deref(), &config.animation) {
        planner::SyncOutcome::Noop => {}
        planner::SyncOutcome::Rebuilt => {
            // a bulk load lands instantly; anything mid-flight is stale
            animations.clear();
        }
        planner::SyncOutcome::Transition(group) => {
            animations.transition = Some(group);
        }
    }
}

/// Adds the grid for one item type. The host supplies [`GridData`],
/// [`GridConfig`], [`CellRenderer`] and optionally [`LockedCells`] /
/// [`LockedCellRenderer`]; everything else is internal.
pub struct DragGridPlugin<I: GridItem> {
    _marker: PhantomData<I>,
}

impl<I: GridItem> Default for DragGridPlugin<I> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<I: GridItem> Plugin for DragGridPlugin<I> {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridData<I>>()
            .init_resource::<GridConfig>()
            .init_resource::<LockedCells<I>>()
            .init_resource::<GridState<I>>()
            .init_resource::<Animations<I>>()
            .init_resource::<ActiveDrag>()
            .init_resource::<gesture::PressState>()
            .init_resource::<ScrollState>()
            .init_resource::<GridFrame>()
            .init_resource::<CellEntities>()
            .init_resource::<CellRenderer<I>>()
            .init_resource::<LockedCellRenderer<I>>()
            .add_event::<DragBegin>()
            .add_event::<CellPressed<I>>()
            .add_event::<DragEnd<I>>()
            .add_event::<InsertAnimationEnd<I>>()
            .add_event::<DeleteAnimationEnd<I>>()
            .add_systems(Startup, render::spawn_grid_root)
            .add_systems(
                Update,
                (
                    scroll::measure::<I>,
                    sync_collection::<I>,
                    gesture::begin_press::<I>,
                    gesture::fire_long_press::<I>,
                    gesture::drag_move::<I>,
                    scroll::autoscroll::<I>,
                    scroll::scroll_container::<I>,
                    gesture::finish_press::<I>,
                    tween::drive_animations::<I>,
                    render::sync_visuals::<I>,
                    render::apply_cell_transforms::<I>,
                    render::apply_opacity::<I>,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_zero_columns() {
        assert!(matches!(
            GridConfig::new(0),
            Err(GridConfigError::ZeroColumns)
        ));
    }

    #[test]
    fn config_rejects_non_positive_width() {
        let config = GridConfig::new(3).expect("valid columns");
        assert!(matches!(
            config.with_width(0.0),
            Err(GridConfigError::NonPositiveWidth(_))
        ));
        let config = GridConfig::new(3).expect("valid columns");
        assert!(config.with_width(360.0).is_ok());
    }

    #[test]
    fn locked_cells_default_to_unlocked() {
        let locked = LockedCells::<String>::default();
        assert!(!locked.check(&"a".to_owned(), 0));
        let locked = LockedCells::from_fn(|item: &String, index| item == "+" || index == 9);
        assert!(locked.check(&"+".to_owned(), 3));
        assert!(locked.check(&"x".to_owned(), 9));
        assert!(!locked.check(&"x".to_owned(), 1));
    }
}
