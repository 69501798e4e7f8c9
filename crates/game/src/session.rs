use std::io;
use std::net::{IpAddr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::GameConfig;
use crate::net::{GameId, GameIdError, LinkState, Role, SyncLoop, SyncStats, local_ipv4};
use crate::state::{SharedGame, Side};

/// How this process takes part in a game, chosen once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Local,
    Host,
    /// `target` is either `ip:port` or a game id.
    Client { target: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Starting,
    Local,
    WaitingForPeer {
        game_id: GameId,
        listen_addr: SocketAddr,
    },
    Connecting {
        target: SocketAddr,
    },
    Connected {
        peer: SocketAddr,
        role: Role,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to listen on {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
    #[error("failed to accept a peer: {0}")]
    Accept(io::Error),
    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: SocketAddr, source: io::Error },
    #[error("'{target}' is neither an address nor a game id ({source})")]
    InvalidTarget { target: String, source: GameIdError },
}

/// The running sync loop of a networked session.
#[derive(Debug)]
struct PeerLink {
    role: Role,
    peer: SocketAddr,
    state: watch::Receiver<LinkState>,
    task: JoinHandle<SyncStats>,
}

#[derive(Debug)]
pub struct Session {
    shared: SharedGame,
    link: Option<PeerLink>,
}

impl Session {
    pub fn local(shared: SharedGame) -> Self {
        Self { shared, link: None }
    }

    /// Resolves `mode` into a ready session. Host and client modes block
    /// here until the link is up; progress is published on `status`.
    pub async fn establish(
        mode: SessionMode,
        config: &GameConfig,
        shared: SharedGame,
        status: &watch::Sender<SessionStatus>,
    ) -> Result<Self, SessionError> {
        let (stream, peer, role) = match mode {
            SessionMode::Local => {
                status.send_replace(SessionStatus::Local);
                return Ok(Self::local(shared));
            }
            SessionMode::Host => {
                let (stream, peer) = accept_peer(config, status).await?;
                (stream, peer, Role::Host)
            }
            SessionMode::Client { target } => {
                let target = resolve_target(&target)?;
                status.send_replace(SessionStatus::Connecting { target });
                log::info!("Connecting to {}", target);
                let stream = connect_once(target, config.link_timeout).await?;
                (stream, target, Role::Client)
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            log::warn!("Could not disable Nagle on link to {}: {}", peer, e);
        }

        log::info!("Connected to {} as {}", peer, role.as_str());
        status.send_replace(SessionStatus::Connected { peer, role });

        let (sync, state) = SyncLoop::new(shared.clone(), role, config);
        let task = tokio::spawn(sync.run(stream));

        Ok(Self {
            shared,
            link: Some(PeerLink {
                role,
                peer,
                state,
                task,
            }),
        })
    }

    pub fn shared(&self) -> &SharedGame {
        &self.shared
    }

    pub fn role(&self) -> Option<Role> {
        self.link.as_ref().map(|link| link.role)
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.link.as_ref().map(|link| link.peer)
    }

    /// Whether this process runs the ball: always, except as a client.
    pub fn is_authoritative(&self) -> bool {
        self.role() != Some(Role::Client)
    }

    /// The paddle local input steers, or `None` when both are local.
    pub fn owned_side(&self) -> Option<Side> {
        self.role().map(Role::owned_side)
    }

    pub fn link_state(&self) -> Option<LinkState> {
        self.link.as_ref().map(|link| link.state.borrow().clone())
    }

    /// A receiver that observes every published link update.
    pub fn subscribe_link(&self) -> Option<watch::Receiver<LinkState>> {
        self.link.as_ref().map(|link| link.state.clone())
    }

    /// Stops the sync loop, closing the connection, and returns its final
    /// counters.
    pub async fn shutdown(self) -> Option<SyncStats> {
        let link = self.link?;
        link.task.abort();
        match link.task.await {
            Ok(stats) => Some(stats),
            Err(_) => Some(link.state.borrow().stats.clone()),
        }
    }
}

async fn accept_peer(
    config: &GameConfig,
    status: &watch::Sender<SessionStatus>,
) -> Result<(TcpStream, SocketAddr), SessionError> {
    let addr = SocketAddr::from((config.bind_addr, config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| SessionError::Bind { addr, source })?;
    let listen_addr = listener
        .local_addr()
        .map_err(|source| SessionError::Bind { addr, source })?;

    let advertised = match listen_addr.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => ip,
        _ => local_ipv4(),
    };
    let game_id = GameId::new(SocketAddrV4::new(advertised, listen_addr.port()));

    log::info!("Waiting for a peer on {} (game id {})", listen_addr, game_id);
    status.send_replace(SessionStatus::WaitingForPeer {
        game_id,
        listen_addr,
    });

    // The listener is dropped on return: exactly one peer per session.
    listener.accept().await.map_err(SessionError::Accept)
}

/// A single dial, bounded by `timeout`.
async fn connect_once(addr: SocketAddr, timeout: Duration) -> Result<TcpStream, SessionError> {
    let attempt = tokio::time::timeout(timeout, TcpStream::connect(addr)).await;
    match attempt {
        Ok(result) => result.map_err(|source| SessionError::Connect { addr, source }),
        Err(_) => Err(SessionError::Connect {
            addr,
            source: io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no answer within {:?}", timeout),
            ),
        }),
    }
}

/// Accepts a literal socket address or a game id.
pub fn resolve_target(target: &str) -> Result<SocketAddr, SessionError> {
    let target = target.trim();
    if let Ok(addr) = target.parse::<SocketAddr>() {
        return Ok(addr);
    }
    target
        .parse::<GameId>()
        .map(|id| SocketAddr::V4(id.addr()))
        .map_err(|source| SessionError::InvalidTarget {
            target: target.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::geometry::Bounds;
    use crate::state::GameState;

    #[test]
    fn literal_address_resolves_as_is() {
        let addr = resolve_target("10.0.0.7:6969").unwrap();
        assert_eq!(addr, "10.0.0.7:6969".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn game_id_resolves_to_encoded_address() {
        let id = GameId::new(SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 20), 6969));
        let addr = resolve_target(&id.to_string()).unwrap();
        assert_eq!(addr, "192.168.1.20:6969".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn nonsense_target_is_rejected() {
        let err = resolve_target("localhost").unwrap_err();
        assert!(matches!(err, SessionError::InvalidTarget { .. }));
    }

    #[tokio::test]
    async fn unanswered_dial_gives_up_after_timeout() {
        // TEST-NET-1 is never routed; the dial either hangs or fails fast.
        let addr: SocketAddr = "192.0.2.1:9".parse().unwrap();
        let started = std::time::Instant::now();

        let err = connect_once(addr, Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            SessionError::Connect { addr: a, source } => {
                assert_eq!(a, addr);
                if started.elapsed() >= Duration::from_millis(200) {
                    assert_eq!(source.kind(), io::ErrorKind::TimedOut);
                }
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn local_mode_is_authoritative_and_unlinked() {
        let shared = SharedGame::new(GameState::new(Bounds::new(24, 80), 10));
        let (status, status_rx) = watch::channel(SessionStatus::Starting);

        let session = Session::establish(SessionMode::Local, &GameConfig::default(), shared, &status)
            .await
            .unwrap();

        assert!(session.is_authoritative());
        assert_eq!(session.role(), None);
        assert_eq!(session.owned_side(), None);
        assert!(session.link_state().is_none());
        assert_eq!(*status_rx.borrow(), SessionStatus::Local);
        assert!(session.shutdown().await.is_none());
    }
}
