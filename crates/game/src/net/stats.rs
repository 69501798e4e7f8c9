/// Counters of one sync loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub cycles: u64,
    pub records_sent: u64,
    pub records_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Live view of a peer link, published by the sync loop after every cycle
/// and once more when it ends.
#[derive(Debug, Clone, Default)]
pub struct LinkState {
    pub stats: SyncStats,
    pub closed: Option<String>,
}

impl LinkState {
    pub fn is_open(&self) -> bool {
        self.closed.is_none()
    }
}
