use std::net::Ipv4Addr;
use std::time::Duration;

use crate::geometry::Bounds;

pub const DEFAULT_PORT: u16 = 6969;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;
pub const DEFAULT_SYNC_INTERVAL_MS: u64 = 10;
pub const DEFAULT_PADDLE_HEIGHT: i32 = 10;
pub const DEFAULT_PADDLE_STEP: i32 = 2;
pub const DEFAULT_BALL_SPEED: u64 = 3;

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Sleep between two ticks of the main loop.
    pub tick_interval: Duration,
    /// Sleep between two snapshot exchanges with the peer.
    pub sync_interval: Duration,
    /// Longest wait for a peer record before the link is considered dead.
    pub link_timeout: Duration,
    pub paddle_height: i32,
    pub paddle_step: i32,
    /// The ball moves once every `ball_speed` ticks.
    pub ball_speed: u64,
    pub bind_addr: Ipv4Addr,
    pub port: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            sync_interval: Duration::from_millis(DEFAULT_SYNC_INTERVAL_MS),
            link_timeout: Duration::from_secs(10),
            paddle_height: DEFAULT_PADDLE_HEIGHT,
            paddle_step: DEFAULT_PADDLE_STEP,
            ball_speed: DEFAULT_BALL_SPEED,
            bind_addr: Ipv4Addr::UNSPECIFIED,
            port: DEFAULT_PORT,
        }
    }
}

impl GameConfig {
    /// Shrinks the paddle so it fits inside `bounds`, and keeps it at least
    /// one row tall.
    pub fn fit_to(mut self, bounds: Bounds) -> Self {
        let fitted = self.paddle_height.clamp(1, bounds.max_paddle_height());
        if fitted != self.paddle_height {
            log::warn!(
                "Paddle height {} does not fit a {}-row field, using {}",
                self.paddle_height,
                bounds.max_y,
                fitted
            );
            self.paddle_height = fitted;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameState;

    #[test]
    fn paddle_that_fits_is_kept() {
        let config = GameConfig::default().fit_to(Bounds::new(24, 80));
        assert_eq!(config.paddle_height, DEFAULT_PADDLE_HEIGHT);
    }

    #[test]
    fn oversized_paddle_is_shrunk_into_the_field() {
        let bounds = Bounds::new(8, 80);
        let config = GameConfig {
            paddle_height: 40,
            ..Default::default()
        }
        .fit_to(bounds);

        assert_eq!(config.paddle_height, 6);
        let state = GameState::new(bounds, config.paddle_height);
        for paddle in [state.left, state.right] {
            assert!(paddle.y >= bounds.paddle_min_y());
            assert!(paddle.y <= bounds.paddle_max_y(paddle.h));
        }
    }

    #[test]
    fn non_positive_paddle_becomes_one_row() {
        let config = GameConfig {
            paddle_height: 0,
            ..Default::default()
        }
        .fit_to(Bounds::new(24, 80));
        assert_eq!(config.paddle_height, 1);
    }
}
