use std::fmt;
use std::net::IpAddr;

use crate::error::{Error, Result};

/// Kind of routing message carried by an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemType {
    /// One entry of a RIB snapshot
    RibEntry,
    /// Prefix announcement from an updates feed
    Announcement,
    /// Prefix withdrawal from an updates feed
    Withdrawal,
    /// BGP session state change observed by the collector
    PeerState,
}

impl ElemType {
    /// Single-letter code used both in dump payloads and in rendered output.
    pub fn code(&self) -> &'static str {
        match self {
            ElemType::RibEntry => "R",
            ElemType::Announcement => "A",
            ElemType::Withdrawal => "W",
            ElemType::PeerState => "S",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "R" => Some(ElemType::RibEntry),
            "A" => Some(ElemType::Announcement),
            "W" => Some(ElemType::Withdrawal),
            "S" => Some(ElemType::PeerState),
            _ => None,
        }
    }
}

/// One routing-protocol message extracted from a valid record's payload.
///
/// Elements are plain values: the fields present depend on the element type
/// (withdrawals carry no path attributes, state changes carry no prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elem {
    pub elem_type: ElemType,
    /// Capture time of the owning record, in epoch seconds
    pub timestamp: u32,
    pub peer_ip: IpAddr,
    pub peer_asn: u32,
    pub prefix: Option<String>,
    pub next_hop: Option<IpAddr>,
    /// Space-separated AS path, origin last
    pub as_path: Option<String>,
    pub old_state: Option<String>,
    pub new_state: Option<String>,
}

impl Elem {
    /// Parse one comma-separated payload token into an element.
    ///
    /// Token layouts by leading code:
    /// - `R,peer_ip,peer_asn,prefix,next_hop,as_path`
    /// - `A,peer_ip,peer_asn,prefix,next_hop,as_path`
    /// - `W,peer_ip,peer_asn,prefix`
    /// - `S,peer_ip,peer_asn,old_state,new_state`
    pub fn parse(token: &str, timestamp: u32) -> Result<Self> {
        let malformed = || Error::MalformedElem(token.to_string());

        let mut fields = token.split(',');
        let elem_type = fields
            .next()
            .and_then(ElemType::from_code)
            .ok_or_else(malformed)?;
        let peer_ip: IpAddr = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(malformed)?;
        let peer_asn: u32 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(malformed)?;

        let mut elem = Elem {
            elem_type,
            timestamp,
            peer_ip,
            peer_asn,
            prefix: None,
            next_hop: None,
            as_path: None,
            old_state: None,
            new_state: None,
        };

        match elem_type {
            ElemType::RibEntry | ElemType::Announcement => {
                elem.prefix = Some(fields.next().ok_or_else(malformed)?.to_string());
                elem.next_hop = Some(
                    fields
                        .next()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(malformed)?,
                );
                elem.as_path = Some(fields.next().ok_or_else(malformed)?.to_string());
            }
            ElemType::Withdrawal => {
                elem.prefix = Some(fields.next().ok_or_else(malformed)?.to_string());
            }
            ElemType::PeerState => {
                elem.old_state = Some(fields.next().ok_or_else(malformed)?.to_string());
                elem.new_state = Some(fields.next().ok_or_else(malformed)?.to_string());
            }
        }

        if fields.next().is_some() {
            return Err(malformed());
        }
        Ok(elem)
    }
}

/// Canonical single-line representation, pipe-delimited.
impl fmt::Display for Elem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.timestamp,
            self.elem_type.code(),
            self.peer_ip,
            self.peer_asn
        )?;
        match self.elem_type {
            ElemType::RibEntry | ElemType::Announcement => write!(
                f,
                "|{}|{}|{}",
                self.prefix.as_deref().unwrap_or(""),
                self.next_hop
                    .map(|ip| ip.to_string())
                    .unwrap_or_default(),
                self.as_path.as_deref().unwrap_or("")
            ),
            ElemType::Withdrawal => write!(f, "|{}", self.prefix.as_deref().unwrap_or("")),
            ElemType::PeerState => write!(
                f,
                "|{}|{}",
                self.old_state.as_deref().unwrap_or(""),
                self.new_state.as_deref().unwrap_or("")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_announcement() {
        let elem = Elem::parse("A,10.0.0.1,64500,192.0.2.0/24,10.0.0.2,64500 64501", 100).unwrap();
        assert_eq!(elem.elem_type, ElemType::Announcement);
        assert_eq!(elem.peer_asn, 64500);
        assert_eq!(elem.prefix.as_deref(), Some("192.0.2.0/24"));
        assert_eq!(elem.as_path.as_deref(), Some("64500 64501"));
        assert_eq!(
            elem.to_string(),
            "100|A|10.0.0.1|64500|192.0.2.0/24|10.0.0.2|64500 64501"
        );
    }

    #[test]
    fn test_parse_withdrawal() {
        let elem = Elem::parse("W,10.0.0.1,64500,198.51.100.0/24", 42).unwrap();
        assert_eq!(elem.elem_type, ElemType::Withdrawal);
        assert_eq!(elem.next_hop, None);
        assert_eq!(elem.to_string(), "42|W|10.0.0.1|64500|198.51.100.0/24");
    }

    #[test]
    fn test_parse_peer_state() {
        let elem = Elem::parse("S,2001:db8::1,64500,connect,established", 7).unwrap();
        assert_eq!(elem.elem_type, ElemType::PeerState);
        assert_eq!(elem.old_state.as_deref(), Some("connect"));
        assert_eq!(elem.to_string(), "7|S|2001:db8::1|64500|connect|established");
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!(Elem::parse("", 0).is_err());
        assert!(Elem::parse("X,10.0.0.1,64500", 0).is_err());
        assert!(Elem::parse("A,not-an-ip,64500,192.0.2.0/24,10.0.0.2,64500", 0).is_err());
        assert!(Elem::parse("W,10.0.0.1,64500", 0).is_err());
        // trailing garbage
        assert!(Elem::parse("W,10.0.0.1,64500,192.0.2.0/24,extra", 0).is_err());
    }
}
