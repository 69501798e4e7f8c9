use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;

use super::protocol::{NetState, Role, WireError};
use super::stats::{LinkState, SyncStats};
use super::transport::PeerStream;
use crate::config::GameConfig;
use crate::state::SharedGame;

/// Push-pull exchange of full snapshots with the peer. Each cycle sends the
/// local state, reads one record back, merges it by role and sleeps.
pub struct SyncLoop {
    shared: SharedGame,
    role: Role,
    interval: Duration,
    timeout: Duration,
    link: watch::Sender<LinkState>,
}

impl SyncLoop {
    pub fn new(
        shared: SharedGame,
        role: Role,
        config: &GameConfig,
    ) -> (Self, watch::Receiver<LinkState>) {
        let (link, link_rx) = watch::channel(LinkState::default());
        let sync = Self {
            shared,
            role,
            interval: config.sync_interval,
            timeout: config.link_timeout,
            link,
        };
        (sync, link_rx)
    }

    /// Runs until the first read or write failure. The stream is dropped,
    /// and so closed, on return.
    pub async fn run<S>(self, stream: S) -> SyncStats
    where
        S: AsyncRead + AsyncWrite,
    {
        log::info!("Sync loop started as {}", self.role.as_str());

        let mut peer = PeerStream::new(stream);
        let mut stats = SyncStats::default();

        let reason = loop {
            if let Err(e) = self.exchange(&mut peer, &mut stats).await {
                break e;
            }
            self.link.send_modify(|link| link.stats = stats.clone());
            tokio::time::sleep(self.interval).await;
        };

        log::info!(
            "Sync loop ended after {} cycles ({} bytes out, {} bytes in): {}",
            stats.cycles,
            stats.bytes_sent,
            stats.bytes_received,
            reason
        );
        self.link.send_modify(|link| {
            link.stats = stats.clone();
            link.closed = Some(reason.to_string());
        });

        stats
    }

    async fn exchange<S>(
        &self,
        peer: &mut PeerStream<S>,
        stats: &mut SyncStats,
    ) -> Result<(), WireError>
    where
        S: AsyncRead + AsyncWrite,
    {
        let local = NetState::from(&self.shared.snapshot().await);
        let sent = peer.send(&local).await?;
        stats.records_sent += 1;
        stats.bytes_sent += sent as u64;

        let (remote, read) = peer.recv(self.timeout).await?;
        stats.records_received += 1;
        stats.bytes_received += read as u64;

        let role = self.role;
        self.shared
            .update(|state| role.merge(state, &remote))
            .await;

        stats.cycles += 1;
        log::trace!("Sync cycle {} merged as {}", stats.cycles, role.as_str());
        Ok(())
    }
}
