//! Unified mouse and touch pointer helpers.
//!
//! Positions are window coordinates: origin at the top-left corner, y growing
//! downward. Only the primary pointer is reported (single-touch model).

use bevy::prelude::*;

pub fn just_pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        let window = windows.get_single().ok()?;
        window.cursor_position()
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

/// Position of the pointer while it is held down, if any.
pub fn current_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.pressed(MouseButton::Left) {
        let window = windows.get_single().ok()?;
        window.cursor_position()
    } else {
        touch_input.iter().next().map(|t| t.position())
    }
}

/// True on the frame the primary pointer is lifted or the touch is canceled.
pub fn pointer_just_released(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
) -> bool {
    button_input.just_released(MouseButton::Left)
        || touch_input.iter_just_released().next().is_some()
        || touch_input.iter_just_canceled().next().is_some()
}
