//! Lightweight address and hash presentation helpers.
//!
//! These do not decode bech32; they only catch obvious typos before a draft
//! output is exported.

use std::sync::OnceLock;

use regex::Regex;

const ADDRESS_PREFIXES: [&str; 5] = ["addr1", "addr_test1", "stake1", "stake_test1", "script1"];
const MIN_ADDRESS_LEN: usize = 50;

fn bech32_charset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9_]+$").expect("static regex"))
}

/// Heuristic check for a bech32 Cardano payment, stake or script address
pub fn looks_like_cardano_address(address: &str) -> bool {
    ADDRESS_PREFIXES.iter().any(|prefix| address.starts_with(prefix))
        && address.len() >= MIN_ADDRESS_LEN
        && bech32_charset().is_match(address)
}

fn shorten(text: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= head + tail {
        return text.to_string();
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{start}...{end}")
}

/// `addr1qxy2k...abcd1234` style short form
pub fn format_address(address: &str) -> String {
    if address.is_empty() {
        return "(no address)".to_string();
    }
    shorten(address, 12, 8)
}

pub fn format_tx_hash(hash: &str) -> String {
    shorten(hash, 8, 8)
}

/// Relative age of a unix timestamp, e.g. `5 min ago`
pub fn time_ago(timestamp: i64, now: i64) -> String {
    let diff = now.saturating_sub(timestamp);
    match diff {
        d if d < 60 => "just now".to_string(),
        d if d < 3_600 => format!("{} min ago", d / 60),
        d if d < 86_400 => format!("{} h ago", d / 3_600),
        d => format!("{} days ago", d / 86_400),
    }
}
