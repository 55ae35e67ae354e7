use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything `encodeURIComponent` escapes: all bytes except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string the way JavaScript's `encodeURIComponent` does.
///
/// # Examples
///
/// ```
/// use query_state_util::encode_uri_component;
///
/// assert_eq!(encode_uri_component("0:0xdead:_:2"), "0%3A0xdead%3A_%3A2");
/// assert_eq!(encode_uri_component("a;b c"), "a%3Bb%20c");
/// assert_eq!(encode_uri_component("(it's)!"), "(it's)!");
/// ```
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Decode a string the way JavaScript's `decodeURIComponent` does.
///
/// Returns `None` where `decodeURIComponent` would throw: a `%` that is not
/// followed by two hex digits, or escapes that do not form valid UTF-8.
///
/// # Examples
///
/// ```
/// use query_state_util::decode_uri_component;
///
/// assert_eq!(decode_uri_component("0%3A0xdead").as_deref(), Some("0:0xdead"));
/// assert_eq!(decode_uri_component("plain").as_deref(), Some("plain"));
/// assert_eq!(decode_uri_component("%zz"), None);
/// assert_eq!(decode_uri_component("%C3"), None);
/// ```
pub fn decode_uri_component(s: &str) -> Option<String> {
    if !s.contains('%') {
        return Some(s.to_string());
    }
    if !has_well_formed_escapes(s) {
        return None;
    }
    percent_decode_str(s)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

fn has_well_formed_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1);
            let lo = bytes.get(i + 2);
            match (hi, lo) {
                (Some(h), Some(l)) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
