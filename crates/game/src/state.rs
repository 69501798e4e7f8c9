use std::sync::Arc;

use tokio::sync::RwLock;

use crate::geometry::{Ball, Bounds, Paddle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub p1: u32,
    pub p2: u32,
}

impl Score {
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.p1 += 1,
            Side::Right => self.p2 += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    pub score: Score,
}

impl GameState {
    pub fn new(bounds: Bounds, paddle_height: i32) -> Self {
        Self {
            ball: Ball::serve(bounds, 1),
            left: Paddle::centered(bounds, 2, paddle_height),
            right: Paddle::centered(bounds, bounds.max_x - 3, paddle_height),
            score: Score::default(),
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// The one `GameState` of a session, shared by the tick loop and the sync
/// loop. Access goes through `snapshot` and `update` only, and neither
/// holds the lock across an await point of the caller.
#[derive(Debug, Clone)]
pub struct SharedGame {
    inner: Arc<RwLock<GameState>>,
}

impl SharedGame {
    pub fn new(state: GameState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn snapshot(&self) -> GameState {
        *self.inner.read().await
    }

    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut GameState) -> R,
    {
        let mut guard = self.inner.write().await;
        f(&mut *guard)
    }
}
