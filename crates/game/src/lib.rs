pub mod config;
pub mod geometry;
pub mod net;
pub mod session;
pub mod simulation;
pub mod state;

pub use config::{
    DEFAULT_BALL_SPEED, DEFAULT_PADDLE_HEIGHT, DEFAULT_PADDLE_STEP, DEFAULT_PORT,
    DEFAULT_SYNC_INTERVAL_MS, DEFAULT_TICK_INTERVAL_MS, GameConfig,
};
pub use geometry::{Ball, Bounds, Paddle};
pub use net::{
    GameId, GameIdError, LinkState, NetBall, NetPaddle, NetState, PeerStream, Role, SyncLoop,
    SyncStats, WireError,
};
pub use session::{Session, SessionError, SessionMode, SessionStatus, resolve_target};
pub use simulation::{Direction, InputEvent, Intent, Simulation, TickCounter};
pub use state::{GameState, Score, SharedGame, Side};
