mod game_id;
mod protocol;
mod stats;
mod sync;
mod transport;

pub use game_id::{GameId, GameIdError, local_ipv4};
pub use protocol::{MAX_RECORD_SIZE, NetBall, NetPaddle, NetState, Role, WireError};
pub use stats::{LinkState, SyncStats};
pub use sync::SyncLoop;
pub use transport::PeerStream;
