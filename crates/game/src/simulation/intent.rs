use crate::state::Side;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Up,
    #[default]
    Hold,
    Down,
}

impl Direction {
    /// Row delta: up is toward row 0.
    pub fn delta(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Hold => 0,
            Direction::Down => 1,
        }
    }
}

/// One logical key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Move { side: Side, direction: Direction },
}

impl InputEvent {
    pub const LEFT_UP: Self = Self::Move {
        side: Side::Left,
        direction: Direction::Up,
    };
    pub const LEFT_DOWN: Self = Self::Move {
        side: Side::Left,
        direction: Direction::Down,
    };
    pub const RIGHT_UP: Self = Self::Move {
        side: Side::Right,
        direction: Direction::Up,
    };
    pub const RIGHT_DOWN: Self = Self::Move {
        side: Side::Right,
        direction: Direction::Down,
    };
}

/// Per-tick directional intent of both paddles. Starts every tick at
/// `Hold` and is set by the input events of that tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: Direction,
    pub right: Direction,
}

impl Intent {
    pub fn new(left: Direction, right: Direction) -> Self {
        Self { left, right }
    }

    pub fn set(&mut self, side: Side, direction: Direction) {
        match side {
            Side::Left => self.left = direction,
            Side::Right => self.right = direction,
        }
    }

    /// Folds one movement event into the intent. With `owner` set, every
    /// movement key steers that paddle, and the other one is left alone.
    /// Returns `false` for `Quit`.
    pub fn apply(&mut self, event: InputEvent, owner: Option<Side>) -> bool {
        match event {
            InputEvent::Quit => false,
            InputEvent::Move { side, direction } => {
                self.set(owner.unwrap_or(side), direction);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_event_per_paddle_wins() {
        let mut intent = Intent::default();
        assert!(intent.apply(InputEvent::LEFT_UP, None));
        assert!(intent.apply(InputEvent::RIGHT_DOWN, None));
        assert!(intent.apply(InputEvent::LEFT_DOWN, None));

        assert_eq!(intent, Intent::new(Direction::Down, Direction::Down));
    }

    #[test]
    fn owner_redirects_movement() {
        let mut intent = Intent::default();
        intent.apply(InputEvent::LEFT_UP, Some(Side::Right));

        assert_eq!(intent, Intent::new(Direction::Hold, Direction::Up));
    }

    #[test]
    fn quit_stops_folding() {
        let mut intent = Intent::default();
        assert!(!intent.apply(InputEvent::Quit, None));
        assert_eq!(intent, Intent::default());
    }
}
