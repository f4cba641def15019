//! Raw keyboard state to tick-command translation
//!
//! The window layer records which keys are held and which were pressed since
//! the last tick; this adapter folds that into one `TickInput`. Held keys
//! drive continuous actions (movement, fire), pressed keys drive
//! edge-triggered ones (pause, quit, FPS overlay, the cheat).

use crate::sim::tick::TickInput;

/// Raw key sampling for one tick
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    // Held state
    pub left_held: bool,
    pub right_held: bool,
    pub fire_held: bool,
    // Pressed since the last tick
    pub pause_pressed: bool,
    pub quit_pressed: bool,
    pub fps_toggle_pressed: bool,
    pub cheat_pressed: bool,
}

impl KeyState {
    /// Fold current key state into this tick's commands
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left_held,
            right: self.right_held,
            fire: self.fire_held,
            pause: self.pause_pressed,
            quit: self.quit_pressed,
            toggle_fps: self.fps_toggle_pressed,
            clear_enemies: self.cheat_pressed,
            demo: false,
        }
    }

    /// Consume edge-triggered presses after the tick has seen them
    pub fn clear_pressed(&mut self) {
        self.pause_pressed = false;
        self.quit_pressed = false;
        self.fps_toggle_pressed = false;
        self.cheat_pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_map_to_continuous_commands() {
        let keys = KeyState {
            left_held: true,
            fire_held: true,
            ..Default::default()
        };
        let input = keys.tick_input();
        assert!(input.left);
        assert!(!input.right);
        assert!(input.fire);
        assert!(!input.pause);
    }

    #[test]
    fn test_clear_pressed_keeps_held_state() {
        let mut keys = KeyState {
            right_held: true,
            pause_pressed: true,
            quit_pressed: true,
            fps_toggle_pressed: true,
            cheat_pressed: true,
            ..Default::default()
        };
        keys.clear_pressed();
        assert!(keys.right_held);
        assert!(!keys.pause_pressed);
        assert!(!keys.quit_pressed);
        assert!(!keys.fps_toggle_pressed);
        assert!(!keys.cheat_pressed);

        let input = keys.tick_input();
        assert!(input.right);
        assert!(!input.quit);
    }
}
