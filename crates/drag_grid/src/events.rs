//! Host-facing notifications mirroring the widget's callback surface.

use bevy::prelude::*;

use crate::state::GridItem;

/// A long-press armed a drag session.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct DragBegin;

/// A cell was tapped (pressed and released before the long-press delay).
#[derive(Event, Debug, Clone)]
pub struct CellPressed<I: GridItem> {
    pub item: I,
    pub index: usize,
}

/// A drag session finished settling; carries the full payload order.
#[derive(Event, Debug, Clone)]
pub struct DragEnd<I: GridItem> {
    pub order: Vec<I>,
}

/// The fade-in for an inserted element completed.
#[derive(Event, Debug, Clone)]
pub struct InsertAnimationEnd<I: GridItem> {
    pub item: I,
}

/// The fade-out for a removed element completed and the arrays compacted.
#[derive(Event, Debug, Clone)]
pub struct DeleteAnimationEnd<I: GridItem> {
    pub item: I,
}
