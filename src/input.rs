use macroquad::prelude::*;

use crate::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Turn(Direction),
    Char(char),
    Backspace,
    Confirm,
    Cancel,
}

/// Letter keys that steer when no text field has focus.
pub fn letter_direction(ch: char) -> Option<Direction> {
    match ch.to_ascii_lowercase() {
        'w' => Some(Direction::Up),
        's' => Some(Direction::Down),
        'a' => Some(Direction::Left),
        'd' => Some(Direction::Right),
        _ => None,
    }
}

/// Collects this frame's key presses.
pub fn poll_input() -> Vec<InputEvent> {
    let mut events = Vec::new();

    for (key, direction) in [
        (KeyCode::Up, Direction::Up),
        (KeyCode::Down, Direction::Down),
        (KeyCode::Left, Direction::Left),
        (KeyCode::Right, Direction::Right),
    ] {
        if is_key_pressed(key) {
            events.push(InputEvent::Turn(direction));
        }
    }

    if is_key_pressed(KeyCode::Backspace) {
        events.push(InputEvent::Backspace);
    }
    if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
        events.push(InputEvent::Confirm);
    }
    if is_key_pressed(KeyCode::Escape) {
        events.push(InputEvent::Cancel);
    }

    while let Some(ch) = get_char_pressed() {
        if !ch.is_control() {
            events.push(InputEvent::Char(ch));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_steers() {
        assert_eq!(letter_direction('W'), Some(Direction::Up));
        assert_eq!(letter_direction('a'), Some(Direction::Left));
        assert_eq!(letter_direction('r'), None);
    }
}
