use serde::{Deserialize, Serialize};

use crate::geometry::{Ball, Paddle};
use crate::state::{GameState, Score, Side};

/// Upper bound on one encoded record, newline included. Real records are
/// around a hundred bytes.
pub const MAX_RECORD_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPaddle {
    pub y: i32,
    pub x: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBall {
    pub y: i32,
    pub x: i32,
    pub dy: i32,
    pub dx: i32,
}

/// One full snapshot as it travels over the wire: a JSON object per line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetState {
    #[serde(rename = "b")]
    pub ball: NetBall,
    #[serde(rename = "p_l")]
    pub left: NetPaddle,
    #[serde(rename = "p_r")]
    pub right: NetPaddle,
    pub p1: u32,
    pub p2: u32,
}

impl From<Paddle> for NetPaddle {
    fn from(p: Paddle) -> Self {
        Self {
            y: p.y,
            x: p.x,
            h: p.h,
        }
    }
}

impl From<NetPaddle> for Paddle {
    fn from(p: NetPaddle) -> Self {
        Paddle::new(p.y, p.x, p.h)
    }
}

impl From<Ball> for NetBall {
    fn from(b: Ball) -> Self {
        Self {
            y: b.y,
            x: b.x,
            dy: b.dy,
            dx: b.dx,
        }
    }
}

impl From<NetBall> for Ball {
    fn from(b: NetBall) -> Self {
        Ball::new(b.y, b.x, b.dy, b.dx)
    }
}

impl From<&GameState> for NetState {
    fn from(state: &GameState) -> Self {
        Self {
            ball: state.ball.into(),
            left: state.left.into(),
            right: state.right.into(),
            p1: state.score.p1,
            p2: state.score.p2,
        }
    }
}

impl NetState {
    pub fn paddle(&self, side: Side) -> NetPaddle {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Encodes the record followed by its terminating newline.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut line = serde_json::to_vec(self).map_err(WireError::Encode)?;
        line.push(b'\n');
        Ok(line)
    }

    pub fn decode(line: &str) -> Result<Self, WireError> {
        serde_json::from_str(line.trim_end()).map_err(WireError::Decode)
    }
}

/// Which end of the link this process is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Client,
}

impl Role {
    /// The paddle this peer steers and reports.
    pub fn owned_side(self) -> Side {
        match self {
            Role::Host => Side::Left,
            Role::Client => Side::Right,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Host => "host",
            Role::Client => "client",
        }
    }

    pub fn peer_side(self) -> Side {
        self.owned_side().opposite()
    }

    /// Folds a peer record into local state. Both ends take the peer's
    /// paddle from the record; the client also takes the ball and the score,
    /// while the host keeps its own.
    pub fn merge(self, state: &mut GameState, remote: &NetState) {
        let theirs = self.peer_side();
        *state.paddle_mut(theirs) = remote.paddle(theirs).into();

        if self == Role::Client {
            state.ball = remote.ball.into();
            state.score = Score {
                p1: remote.p1,
                p2: remote.p2,
            };
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding failed: {0}")]
    Encode(serde_json::Error),
    #[error("malformed record: {0}")]
    Decode(serde_json::Error),
    #[error("record exceeds {} bytes", MAX_RECORD_SIZE)]
    Oversized,
    #[error("peer closed the connection")]
    Closed,
    #[error("no record from peer within {0:?}")]
    Timeout(std::time::Duration),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    fn host_state() -> GameState {
        let mut state = GameState::new(Bounds::new(24, 80), 10);
        state.ball = Ball::new(9, 30, -1, 1);
        state.score = Score { p1: 4, p2: 2 };
        state
    }

    fn remote_record() -> NetState {
        NetState {
            ball: NetBall {
                y: 1,
                x: 2,
                dy: 1,
                dx: -1,
            },
            left: NetPaddle { y: 3, x: 4, h: 5 },
            right: NetPaddle { y: 6, x: 75, h: 8 },
            p1: 90,
            p2: 91,
        }
    }

    #[test]
    fn wire_keys_match_line_format() {
        let state = GameState::new(Bounds::new(24, 80), 10);
        let line = NetState::from(&state).encode().unwrap();
        let text = String::from_utf8(line).unwrap();

        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
        assert_eq!(
            text.trim_end(),
            r#"{"b":{"y":12,"x":40,"dy":1,"dx":1},"p_l":{"y":7,"x":2,"h":10},"p_r":{"y":7,"x":77,"h":10},"p1":0,"p2":0}"#
        );
    }

    #[test]
    fn decode_accepts_foreign_key_order() {
        let line = r#"{"p2":1,"p1":2,"p_r":{"h":3,"x":4,"y":5},"p_l":{"y":6,"x":7,"h":8},"b":{"dx":-1,"dy":1,"x":9,"y":10}}"#;
        let record = NetState::decode(line).unwrap();

        assert_eq!(record.ball, NetBall { y: 10, x: 9, dy: 1, dx: -1 });
        assert_eq!(record.right, NetPaddle { y: 5, x: 4, h: 3 });
        assert_eq!((record.p1, record.p2), (2, 1));
    }

    #[test]
    fn decode_rejects_truncated_record() {
        let err = NetState::decode(r#"{"b":{"y":1,"x":2"#).unwrap_err();
        assert!(matches!(err, WireError::Decode(_)));
    }

    #[test]
    fn host_takes_only_client_paddle() {
        let mut state = host_state();
        let before = state;
        let remote = remote_record();

        Role::Host.merge(&mut state, &remote);

        assert_eq!(state.ball, before.ball);
        assert_eq!(state.left, before.left);
        assert_eq!(state.score, before.score);
        assert_eq!(state.right, Paddle::new(6, 75, 8));
    }

    #[test]
    fn client_takes_everything_the_host_owns() {
        let mut state = host_state();
        let own = state.right;
        let remote = remote_record();

        Role::Client.merge(&mut state, &remote);

        let merged = NetState::from(&state);
        assert_eq!(merged.ball, remote.ball);
        assert_eq!(merged.left, remote.left);
        assert_eq!((merged.p1, merged.p2), (remote.p1, remote.p2));
        assert_eq!(state.right, own);
    }

    #[test]
    fn client_copies_velocity_not_position() {
        let mut state = host_state();
        let mut remote = remote_record();
        remote.ball = NetBall {
            y: 11,
            x: 37,
            dy: -1,
            dx: 1,
        };

        Role::Client.merge(&mut state, &remote);

        assert_eq!(state.ball.dx, 1);
        assert_eq!(state.ball.dy, -1);
    }

    #[test]
    fn roles_own_opposite_paddles() {
        assert_eq!(Role::Host.owned_side(), Side::Left);
        assert_eq!(Role::Client.owned_side(), Side::Right);
        assert_eq!(Role::Host.peer_side(), Role::Client.owned_side());
    }
}
