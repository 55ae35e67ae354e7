use sha3::{Digest, Keccak256};

/// Length of a `0x`-prefixed EVM address.
const ADDRESS_LENGTH: usize = 42;

fn has_address_shape(s: &str) -> bool {
    s.len() == ADDRESS_LENGTH
        && (s.starts_with("0x") || s.starts_with("0X"))
        && s.as_bytes()[2..].iter().all(u8::is_ascii_hexdigit)
}

/// Apply the EIP-55 mixed-case checksum to an address.
///
/// Returns `None` if `address` is not `0x` followed by 40 hex digits.
///
/// # Examples
///
/// ```
/// use query_state_util::checksum_address;
///
/// assert_eq!(
///     checksum_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").as_deref(),
///     Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
/// );
/// ```
pub fn checksum_address(address: &str) -> Option<String> {
    if !has_address_shape(address) {
        return None;
    }
    let lower = address[2..].to_ascii_lowercase();
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(ADDRESS_LENGTH);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Check whether a string is an EVM address.
///
/// All-lowercase addresses are accepted as-is. Any other casing must carry a
/// valid EIP-55 checksum.
///
/// # Examples
///
/// ```
/// use query_state_util::is_address;
///
/// assert!(is_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
/// assert!(is_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
/// assert!(!is_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
/// assert!(!is_address("0xdead"));
/// ```
pub fn is_address(s: &str) -> bool {
    if !has_address_shape(s) || !s.starts_with("0x") {
        return false;
    }
    if s[2..].bytes().all(|b| !b.is_ascii_uppercase()) {
        return true;
    }
    checksum_address(s).is_some_and(|checksummed| checksummed == s)
}
