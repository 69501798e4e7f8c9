use std::time::Duration;

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf,
    WriteHalf,
};

use super::protocol::{MAX_RECORD_SIZE, NetState, WireError};

/// Newline-delimited record framing over any duplex byte stream.
pub struct PeerStream<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    line: String,
}

impl<S> PeerStream<S>
where
    S: AsyncRead + AsyncWrite,
{
    pub fn new(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(reader),
            writer,
            line: String::with_capacity(256),
        }
    }

    /// Writes one record and returns the number of bytes put on the wire.
    pub async fn send(&mut self, record: &NetState) -> Result<usize, WireError> {
        let line = record.encode()?;
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(line.len())
    }

    /// Reads exactly one record, waiting at most `timeout`.
    pub async fn recv(&mut self, timeout: Duration) -> Result<(NetState, usize), WireError> {
        tokio::time::timeout(timeout, self.read_record())
            .await
            .map_err(|_| WireError::Timeout(timeout))?
    }

    async fn read_record(&mut self) -> Result<(NetState, usize), WireError> {
        self.line.clear();
        let read = (&mut self.reader)
            .take(MAX_RECORD_SIZE as u64)
            .read_line(&mut self.line)
            .await?;

        if read == 0 {
            return Err(WireError::Closed);
        }
        if !self.line.ends_with('\n') {
            return Err(if read >= MAX_RECORD_SIZE {
                WireError::Oversized
            } else {
                WireError::Closed
            });
        }

        let record = NetState::decode(&self.line)?;
        Ok((record, read))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_cross_the_stream() {
        let (a, b) = tokio::io::duplex(MAX_RECORD_SIZE);
        let mut left = PeerStream::new(a);
        let mut right = PeerStream::new(b);

        let mut record = NetState::default();
        record.p1 = 7;
        record.right.y = 3;

        let sent = left.send(&record).await.unwrap();
        let (received, read) = right.recv(Duration::from_secs(1)).await.unwrap();

        assert_eq!(received, record);
        assert_eq!(sent, read);
    }

    #[tokio::test]
    async fn back_to_back_records_are_split_on_newlines() {
        let (mut raw, b) = tokio::io::duplex(MAX_RECORD_SIZE);
        let mut peer = PeerStream::new(b);

        let mut first = NetState::default();
        first.p1 = 1;
        let mut second = NetState::default();
        second.p2 = 2;

        let mut bytes = first.encode().unwrap();
        bytes.extend(second.encode().unwrap());
        raw.write_all(&bytes).await.unwrap();

        assert_eq!(peer.recv(Duration::from_secs(1)).await.unwrap().0, first);
        assert_eq!(peer.recv(Duration::from_secs(1)).await.unwrap().0, second);
    }

    #[tokio::test]
    async fn eof_is_reported_as_closed() {
        let (a, b) = tokio::io::duplex(MAX_RECORD_SIZE);
        let mut peer = PeerStream::new(b);
        drop(a);

        let err = peer.recv(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, WireError::Closed));
    }

    #[tokio::test]
    async fn silence_times_out() {
        let (_a, b) = tokio::io::duplex(MAX_RECORD_SIZE);
        let mut peer = PeerStream::new(b);

        let err = peer.recv(Duration::from_millis(20)).await.unwrap_err();
        assert!(matches!(err, WireError::Timeout(_)));
    }

    #[tokio::test]
    async fn endless_line_is_rejected() {
        let (mut raw, b) = tokio::io::duplex(MAX_RECORD_SIZE * 2);
        let mut peer = PeerStream::new(b);

        raw.write_all(&vec![b'x'; MAX_RECORD_SIZE + 10]).await.unwrap();

        let err = peer.recv(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, WireError::Oversized));
    }
}
