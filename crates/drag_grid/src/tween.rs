//! Tween groups and the per-channel animation state.
//!
//! Three channels exist: `transition` (insert/delete fades and reflows),
//! `settle` (neighbors sliding after a reorder swap) and `release` (the
//! dragged cell snapping home). At most one group runs per channel; writing a
//! new group into a channel drops the old one, which is the widget's only
//! cancellation mechanism. Divergent targets cannot accumulate because a
//! replaced group stops writing on the same frame.

use bevy::prelude::*;

use crate::drag::{ActiveDrag, DragPhase};
use crate::events::{DeleteAnimationEnd, DragEnd, InsertAnimationEnd};
use crate::state::{GridItem, GridState};

/// Neighbor settle time after a swap, and the release snap time.
pub const SETTLE_DURATION_MS: f32 = 200.0;
pub const RELEASE_DURATION_MS: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
    EaseOutQuad,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Timing parameters for the insert/delete transition channel.
#[derive(Debug, Clone, Copy)]
pub struct AnimationConfig {
    pub easing: Easing,
    pub duration_ms: f32,
    pub delay_ms: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            easing: Easing::EaseInOut,
            duration_ms: 300.0,
            delay_ms: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    Position { from: Vec2, to: Vec2 },
    Opacity { from: f32, to: f32 },
}

/// One interpolated value bound to a cell by identity, not by index.
#[derive(Debug, Clone, PartialEq)]
pub struct CellTween {
    pub key: String,
    pub value: TweenValue,
}

impl CellTween {
    pub fn position(key: &str, from: Vec2, to: Vec2) -> Self {
        Self {
            key: key.to_owned(),
            value: TweenValue::Position { from, to },
        }
    }

    pub fn opacity(key: &str, from: f32, to: f32) -> Self {
        Self {
            key: key.to_owned(),
            value: TweenValue::Opacity { from, to },
        }
    }
}

/// What finishing a group means to the rest of the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKind<I: GridItem> {
    Insert { added: Option<I> },
    Delete { removed: Option<I> },
    Settle,
    Release,
}

#[derive(Debug, Clone)]
pub struct TweenGroup<I: GridItem> {
    pub kind: GroupKind<I>,
    pub tweens: Vec<CellTween>,
    pub easing: Easing,
    /// Seconds left before interpolation starts.
    delay: f32,
    /// Seconds, not counting the delay.
    duration: f32,
    elapsed: f32,
}

impl<I: GridItem> TweenGroup<I> {
    pub fn new(
        kind: GroupKind<I>,
        tweens: Vec<CellTween>,
        easing: Easing,
        duration_ms: f32,
        delay_ms: f32,
    ) -> Self {
        Self {
            kind,
            tweens,
            easing,
            delay: delay_ms.max(0.0) / 1000.0,
            duration: duration_ms.max(0.0) / 1000.0,
            elapsed: 0.0,
        }
    }

    /// Advances by `dt` seconds and writes the interpolated values into the
    /// grid. Returns true once finished; the final write lands exactly on the
    /// target values, so no floating residue survives a completed group.
    pub fn tick(&mut self, dt: f32, state: &mut GridState<I>) -> bool {
        if self.delay > 0.0 {
            self.delay -= dt;
            if self.delay > 0.0 {
                return false;
            }
        }
        self.elapsed += dt;
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        let k = self.easing.sample(t);
        for tween in &self.tweens {
            let Some(cell) = state.cell_mut(&tween.key) else {
                // the cell may have been rebuilt away mid-flight
                continue;
            };
            match tween.value {
                TweenValue::Position { from, to } => cell.pos = from.lerp(to, k),
                TweenValue::Opacity { from, to } => {
                    cell.opacity = (to - from).mul_add(k, from);
                }
            }
        }
        t >= 1.0
    }
}

/// The per-channel animation handles.
#[derive(Resource, Debug)]
pub struct Animations<I: GridItem> {
    pub transition: Option<TweenGroup<I>>,
    pub settle: Option<TweenGroup<I>>,
    pub release: Option<TweenGroup<I>>,
}

impl<I: GridItem> Default for Animations<I> {
    fn default() -> Self {
        Self {
            transition: None,
            settle: None,
            release: None,
        }
    }
}

impl<I: GridItem> Animations<I> {
    pub fn transition_running(&self) -> bool {
        self.transition.is_some()
    }

    /// Reorders are serialized behind both the settle and the transition
    /// channel; a blocked call is dropped, not queued.
    pub fn reorder_blocked(&self) -> bool {
        self.settle.is_some() || self.transition.is_some()
    }

    pub fn clear(&mut self) {
        self.transition = None;
        self.settle = None;
        self.release = None;
    }
}

/// Ticks every channel and fires the completion edges: insert/delete
/// notifications, the pending-commit swap after a delete, and the drag-end
/// notification once the release snap lands.
pub(crate) fn drive_animations<I: GridItem>(
    time: Res<Time>,
    mut state: ResMut<GridState<I>>,
    mut animations: ResMut<Animations<I>>,
    mut drag: ResMut<ActiveDrag>,
    mut insert_end: EventWriter<InsertAnimationEnd<I>>,
    mut delete_end: EventWriter<DeleteAnimationEnd<I>>,
    mut drag_end: EventWriter<DragEnd<I>>,
) {
    let dt = time.delta_secs();

    let finished = animations
        .transition
        .as_mut()
        .is_some_and(|g| g.tick(dt, &mut state));
    if finished {
        match animations.transition.take().map(|g| g.kind) {
            Some(GroupKind::Insert { added: Some(item) }) => {
                insert_end.send(InsertAnimationEnd { item });
            }
            Some(GroupKind::Delete { removed }) => {
                state.commit_pending();
                if let Some(item) = removed {
                    delete_end.send(DeleteAnimationEnd { item });
                }
            }
            _ => {}
        }
    }

    let finished = animations
        .settle
        .as_mut()
        .is_some_and(|g| g.tick(dt, &mut state));
    if finished {
        animations.settle = None;
    }

    let finished = animations
        .release
        .as_mut()
        .is_some_and(|g| g.tick(dt, &mut state));
    if finished {
        animations.release = None;
        if drag.0.take().is_some() {
            debug!("drag session settled");
            drag_end.send(DragEnd {
                order: state.order(),
            });
        }
    }

    // a rebuild or reflow may have dropped the release group out from under
    // the session; finish the drag here so input is never stranded
    let stranded = animations.release.is_none()
        && drag
            .0
            .as_ref()
            .is_some_and(|s| s.phase == DragPhase::Releasing);
    if stranded {
        drag.0 = None;
        drag_end.send(DragEnd {
            order: state.order(),
        });
    }
}
