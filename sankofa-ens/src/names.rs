//! Name formatting, parsing, and hashing helpers.

use sha3::{Digest, Keccak256};

use sankofa_core::constants::{ETH_ADDRESS_SIZE, EXPLORER_ADDRESS_URL, PARENT_DOMAIN};

/// Formats `<label>.<domain>`.
pub fn format_ens_name(label: &str, domain: &str) -> String {
    format!("{}.{}", label, domain)
}

/// Formats `<label>.sankofachain.eth`.
pub fn full_name(label: &str) -> String {
    format_ens_name(label, PARENT_DOMAIN)
}

/// Extracts the label from `<label>.<domain>`.
///
/// Returns None if the name is not directly under `domain`.
pub fn extract_label<'a>(ens_name: &'a str, domain: &str) -> Option<&'a str> {
    ens_name
        .strip_suffix(domain)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|label| !label.is_empty())
}

/// Returns true if the value looks like a dotted name rather than an address.
pub fn is_ens_name(value: &str) -> bool {
    value.contains('.')
}

/// Returns true if the value is a 0x-prefixed 20-byte hex address.
pub fn is_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .map(|hex_part| {
            hex_part.len() == ETH_ADDRESS_SIZE * 2
                && hex_part.bytes().all(|b| b.is_ascii_hexdigit())
        })
        .unwrap_or(false)
}

/// Computes the keccak256 hash of a single label.
pub fn labelhash(label: &str) -> [u8; 32] {
    Keccak256::digest(label.as_bytes()).into()
}

/// Computes the ENS namehash of a dotted name.
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];

    for label in name.rsplit('.') {
        if label.is_empty() {
            continue;
        }

        let mut combined = [0u8; 64];
        combined[..32].copy_from_slice(&node);
        combined[32..].copy_from_slice(&labelhash(label));

        node = Keccak256::digest(combined).into();
    }

    node
}

/// Shortens an address to `0x1234...abcd`.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Shortens text to at most `max_len` characters, ending in "...".
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Block explorer page for an address.
pub fn explorer_address_url(address: &str) -> String {
    format!("{}{}", EXPLORER_ADDRESS_URL, address)
}
