use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use serde::Serialize;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit offset in grid cells; `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Resolved commands consumed by the controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Reset,
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
///
/// A stationary snake may turn anywhere.
#[must_use]
pub fn direction_change_is_valid(current: Option<Direction>, next: Direction) -> bool {
    current.is_none_or(|current| next != current.opposite())
}

/// Maps a key press to a command. Unrecognized keys and key releases yield `None`.
#[must_use]
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Command::Turn(Direction::Up),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Command::Turn(Direction::Right),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Command::Turn(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Command::Turn(Direction::Left),
        KeyCode::Char(' ' | 'p' | 'P') => Command::TogglePause,
        KeyCode::Enter | KeyCode::Char('r' | 'R') => Command::Reset,
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Command::Quit,
        _ => return None,
    };

    Some(command)
}

/// Resolves a drag delta into the direction of its dominant axis.
///
/// Terminal rows are roughly twice as tall as columns are wide, so vertical
/// travel is weighted accordingly. A zero-length drag is a click, not a swipe.
#[must_use]
pub fn direction_for_swipe(dx: i32, dy: i32) -> Option<Direction> {
    let weighted_dy = dy.saturating_mul(2);
    if dx == 0 && dy == 0 {
        return None;
    }

    if dx.abs() > weighted_dy.abs() {
        Some(if dx < 0 { Direction::Left } else { Direction::Right })
    } else {
        Some(if dy < 0 { Direction::Up } else { Direction::Down })
    }
}

/// Turns left-button drags into swipe directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    /// Feeds one mouse event; returns a direction when a drag is released.
    pub fn on_mouse(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (start_column, start_row) = self.start.take()?;
                direction_for_swipe(
                    i32::from(event.column) - i32::from(start_column),
                    i32::from(event.row) - i32::from(start_row),
                )
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };

    use super::{
        Command, Direction, SwipeTracker, command_for_key, direction_change_is_valid,
        direction_for_swipe,
    };

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn opposite_directions_cancel_out() {
        for direction in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn reversal_is_rejected_unless_stationary() {
        assert!(!direction_change_is_valid(Some(Direction::Up), Direction::Down));
        assert!(!direction_change_is_valid(Some(Direction::Left), Direction::Right));
        assert!(direction_change_is_valid(Some(Direction::Up), Direction::Left));
        assert!(direction_change_is_valid(None, Direction::Down));
    }

    #[test]
    fn arrows_and_wasd_map_to_turns() {
        assert_eq!(
            command_for_key(press(KeyCode::Up)),
            Some(Command::Turn(Direction::Up))
        );
        assert_eq!(
            command_for_key(press(KeyCode::Char('a'))),
            Some(Command::Turn(Direction::Left))
        );
        assert_eq!(
            command_for_key(press(KeyCode::Char(' '))),
            Some(Command::TogglePause)
        );
        assert_eq!(command_for_key(press(KeyCode::Enter)), Some(Command::Reset));
    }

    #[test]
    fn unknown_keys_and_releases_are_ignored() {
        assert_eq!(command_for_key(press(KeyCode::Char('x'))), None);
        assert_eq!(command_for_key(press(KeyCode::F(5))), None);

        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(command_for_key(release), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(key), Some(Command::Quit));
    }

    #[test]
    fn swipe_uses_dominant_axis() {
        assert_eq!(direction_for_swipe(-6, 1), Some(Direction::Left));
        assert_eq!(direction_for_swipe(3, -2), Some(Direction::Up));
        assert_eq!(direction_for_swipe(0, 0), None);
    }

    #[test]
    fn swipe_tracker_reports_on_release() {
        let mut tracker = SwipeTracker::default();

        assert_eq!(
            tracker.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5)),
            None
        );
        assert_eq!(
            tracker.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20, 6)),
            Some(Direction::Right)
        );
        // A release without a press is not a swipe.
        assert_eq!(
            tracker.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0)),
            None
        );
    }
}
