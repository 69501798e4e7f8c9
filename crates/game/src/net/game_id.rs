use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

const ENCODED_LEN: usize = 6;

/// Short shareable token for a host's IPv4 endpoint: the four address
/// octets and the big-endian port, unpadded URL-safe base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameId(SocketAddrV4);

#[derive(Debug, thiserror::Error)]
pub enum GameIdError {
    #[error("game id is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("game id decodes to {0} bytes, expected {len}", len = ENCODED_LEN)]
    Length(usize),
}

impl GameId {
    pub fn new(addr: SocketAddrV4) -> Self {
        Self(addr)
    }

    pub fn addr(&self) -> SocketAddrV4 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = [0u8; ENCODED_LEN];
        bytes[..4].copy_from_slice(&self.0.ip().octets());
        bytes[4..].copy_from_slice(&self.0.port().to_be_bytes());
        f.write_str(&URL_SAFE_NO_PAD.encode(bytes))
    }
}

impl FromStr for GameId {
    type Err = GameIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = URL_SAFE_NO_PAD.decode(s.trim())?;
        if bytes.len() != ENCODED_LEN {
            return Err(GameIdError::Length(bytes.len()));
        }
        let ip = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
        let port = u16::from_be_bytes([bytes[4], bytes[5]]);
        Ok(Self(SocketAddrV4::new(ip, port)))
    }
}

/// Address other machines on the LAN most likely reach us at. Connecting a
/// UDP socket only consults the routing table; nothing is sent.
pub fn local_ipv4() -> Ipv4Addr {
    let probe = || -> std::io::Result<Ipv4Addr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9))?;
        match socket.local_addr()? {
            SocketAddr::V4(addr) => Ok(*addr.ip()),
            SocketAddr::V6(_) => Ok(Ipv4Addr::LOCALHOST),
        }
    };

    match probe() {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(_) => Ipv4Addr::LOCALHOST,
        Err(e) => {
            log::debug!("Could not determine LAN address: {}", e);
            Ipv4Addr::LOCALHOST
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_to_eight_chars() {
        let id = GameId::new(SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 20), 6969));
        let text = id.to_string();

        assert_eq!(text.len(), 8);
        assert_eq!(text, "wKgBFBs5");
        assert_eq!(text.parse::<GameId>().unwrap(), id);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = "wKgB".parse::<GameId>().unwrap_err();
        assert!(matches!(err, GameIdError::Length(3)));
    }

    #[test]
    fn rejects_garbage() {
        let err = "not a game id!".parse::<GameId>().unwrap_err();
        assert!(matches!(err, GameIdError::Encoding(_)));
    }

    #[test]
    fn length_error_names_both_sizes() {
        let err = "wKgB".parse::<GameId>().unwrap_err();
        assert_eq!(err.to_string(), "game id decodes to 3 bytes, expected 6");
    }

    #[test]
    fn local_address_is_never_unspecified() {
        assert!(!local_ipv4().is_unspecified());
    }
}
