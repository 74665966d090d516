//! Canned payload material for dump files.

/// An announcement element token with a two-hop AS path.
pub const ANNOUNCEMENT: &str = "A,10.0.0.1,64500,192.0.2.0/24,10.0.0.2,64500 64501";

/// A withdrawal element token.
pub const WITHDRAWAL: &str = "W,10.0.0.1,64500,198.51.100.0/24";

/// A RIB entry element token.
pub const RIB_ENTRY: &str = "R,10.0.0.1,64500,203.0.113.0/24,10.0.0.2,64500 64496";

/// A peer session state-change token.
pub const PEER_STATE: &str = "S,10.0.0.1,64500,connect,established";

/// Build one dump record line from a capture time and element tokens.
pub fn record_line(time: u32, elems: &[&str]) -> String {
    let mut line = time.to_string();
    for elem in elems {
        line.push('|');
        line.push_str(elem);
    }
    line
}
