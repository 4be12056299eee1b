//! Datagram dumps for debug logging.

use std::fmt::Write;

/// Upper-case hex, sixteen bytes per line.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len() * 3 + bytes.len() / 16);
    for (i, b) in bytes.iter().enumerate() {
        let _ = write!(result, "{:02X} ", b);
        if (i + 1) % 16 == 0 {
            result.push('\n');
        }
    }
    result
}

/// Printable ASCII as is, everything else as `.`.
pub fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
        .collect()
}
