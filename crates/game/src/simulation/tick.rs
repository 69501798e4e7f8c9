use crate::config::GameConfig;
use crate::geometry::{Ball, Bounds, Paddle};
use crate::simulation::intent::{Direction, Intent};
use crate::state::{GameState, Side};

/// Monotonic tick index. Only `tick % ball_speed` is ever looked at, so
/// wrapping is harmless.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickCounter {
    tick: u64,
}

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }
}

/// Fixed-tick physics over a field of known size.
#[derive(Debug, Clone)]
pub struct Simulation {
    bounds: Bounds,
    ball_speed: u64,
    paddle_step: i32,
}

impl Simulation {
    pub fn new(bounds: Bounds, ball_speed: u64, paddle_step: i32) -> Self {
        Self {
            bounds,
            ball_speed: ball_speed.max(1),
            paddle_step: paddle_step.max(1),
        }
    }

    pub fn with_config(bounds: Bounds, config: &GameConfig) -> Self {
        Self::new(bounds, config.ball_speed, config.paddle_step)
    }

    /// Runs one tick. Paddles always follow `intent`; the ball, collisions
    /// and scoring only run on the authoritative side. Returns the side that
    /// scored this tick.
    pub fn advance(
        &self,
        state: &mut GameState,
        intent: Intent,
        tick: u64,
        authoritative: bool,
    ) -> Option<Side> {
        self.move_paddle(&mut state.left, intent.left);
        self.move_paddle(&mut state.right, intent.right);

        if !authoritative {
            return None;
        }

        if tick % self.ball_speed == 0 {
            state.ball.integrate();
        }

        self.bounce_off_walls(&mut state.ball);
        bounce_off_paddles(&mut state.ball, &state.left, &state.right);

        let scorer = self.scorer(&state.ball)?;
        state.score.award(scorer);
        state.ball = match scorer {
            Side::Right => Ball::serve(self.bounds, 1),
            Side::Left => Ball::serve(self.bounds, -1),
        };
        Some(scorer)
    }

    fn move_paddle(&self, paddle: &mut Paddle, direction: Direction) {
        let room = match direction {
            Direction::Hold => return,
            Direction::Up => paddle.y - self.bounds.paddle_min_y(),
            Direction::Down => self.bounds.paddle_max_y(paddle.h) - paddle.y,
        };
        if room > 0 {
            paddle.y += direction.delta() * room.min(self.paddle_step);
        }
    }

    fn bounce_off_walls(&self, ball: &mut Ball) {
        let at_top = ball.y <= 1 && ball.dy < 0;
        let at_bottom = ball.y >= self.bounds.max_y - 2 && ball.dy > 0;
        if at_top || at_bottom {
            ball.dy = -ball.dy;
        }
    }

    fn scorer(&self, ball: &Ball) -> Option<Side> {
        if ball.x <= 0 {
            Some(Side::Right)
        } else if ball.x >= self.bounds.max_x - 1 {
            Some(Side::Left)
        } else {
            None
        }
    }
}

fn bounce_off_paddles(ball: &mut Ball, left: &Paddle, right: &Paddle) {
    let hits_left =
        ball.dx < 0 && ball.x >= left.x && ball.x <= left.x + 1 && left.covers_row(ball.y);
    let hits_right =
        ball.dx > 0 && ball.x >= right.x - 1 && ball.x <= right.x && right.covers_row(ball.y);
    if hits_left || hits_right {
        ball.dx = -ball.dx;
    }
}
