//! The single active drag session.
//!
//! At most one session exists at a time (single-touch model). The session
//! holds the dragged cell's identity key, never an index or entity: the cell
//! arrays may be swapped or rebuilt underneath it and the session re-resolves
//! its cell by key on every use.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Long-press fired; waiting for the first move.
    Armed,
    /// Pointer tracking; scroll control is ceded to the drag.
    Dragging,
    /// Pointer lifted; the release snap is in flight.
    Releasing,
}

#[derive(Debug, Clone)]
pub struct DragSession {
    pub key: String,
    pub phase: DragPhase,
    /// The cell's slot position at press time (content space).
    pub origin: Vec2,
    /// Pointer window position at press time.
    pub press_screen: Vec2,
    /// Pointer window position from the latest move.
    pub last_screen: Vec2,
    /// Scroll displacement accumulated by the autoscroller while dragging.
    pub scroll_accum: f32,
}

impl DragSession {
    pub fn new(key: String, origin: Vec2, press_screen: Vec2) -> Self {
        Self {
            key,
            phase: DragPhase::Armed,
            origin,
            press_screen,
            last_screen: press_screen,
            scroll_accum: 0.0,
        }
    }

    /// Content-space position of the dragged cell for a pointer position:
    /// origin plus pointer delta plus everything the viewport scrolled away
    /// underneath the finger.
    pub fn cell_pos(&self, pointer_screen: Vec2) -> Vec2 {
        self.origin + (pointer_screen - self.press_screen) + Vec2::new(0.0, self.scroll_accum)
    }
}

#[derive(Resource, Debug, Default)]
pub struct ActiveDrag(pub Option<DragSession>);

impl ActiveDrag {
    pub fn dragged_key(&self) -> Option<&str> {
        self.0.as_ref().map(|s| s.key.as_str())
    }

    pub fn is_dragging(&self) -> bool {
        self.0
            .as_ref()
            .is_some_and(|s| s.phase == DragPhase::Dragging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_pos_tracks_pointer_and_scroll() {
        let mut session = DragSession::new(
            "a".to_owned(),
            Vec2::new(100.0, 200.0),
            Vec2::new(150.0, 250.0),
        );
        assert_eq!(session.phase, DragPhase::Armed);
        assert_eq!(
            session.cell_pos(Vec2::new(150.0, 250.0)),
            Vec2::new(100.0, 200.0),
            "no movement, no displacement"
        );
        assert_eq!(
            session.cell_pos(Vec2::new(160.0, 230.0)),
            Vec2::new(110.0, 180.0),
            "1:1 pointer tracking"
        );
        session.scroll_accum += 35.0;
        assert_eq!(
            session.cell_pos(Vec2::new(160.0, 230.0)),
            Vec2::new(110.0, 215.0),
            "scrolled content shifts the cell, not the pointer"
        );
    }

    #[test]
    fn active_drag_accessors() {
        let mut drag = ActiveDrag::default();
        assert_eq!(drag.dragged_key(), None);
        assert!(!drag.is_dragging());
        let mut session = DragSession::new("a".to_owned(), Vec2::ZERO, Vec2::ZERO);
        session.phase = DragPhase::Dragging;
        drag.0 = Some(session);
        assert_eq!(drag.dragged_key(), Some("a"));
        assert!(drag.is_dragging());
    }
}
