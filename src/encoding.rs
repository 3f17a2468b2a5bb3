use iri_string::types::UriStr;
use memchr::memchr_iter;

use crate::errors::{PatternError, PatternErrorKind, PatternResult};

/// Canonicalization applied to concrete (non-pattern) component text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Protocol,
    Username,
    Password,
    Hostname,
    Ipv6Hostname,
    Port,
    Pathname,
    OpaquePathname,
    Search,
    Hash,
}

const USERINFO_ESCAPE_SET: &str = " \"#<>?`{}/:;=@[^";
const PATH_SEGMENT_ESCAPE_SET: &str = " \"#<>?`{}";
const HOSTNAME_VERIFY_SET: &str = " #/:<>?@[\\]^|";
const SEARCH_ESCAPE_SET: &str = " \"#<>?'";
const HASH_ESCAPE_SET: &str = " \"<>`";

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Canonicalizes `input` for one component. The empty string is always left
/// untouched.
pub fn encode(input: &str, encoding: Encoding) -> PatternResult<String> {
    if input.is_empty() {
        return Ok(String::new());
    }
    match encoding {
        Encoding::Protocol => encode_scheme(input),
        Encoding::Username | Encoding::Password => {
            encode_percent(input, USERINFO_ESCAPE_SET, false)
        }
        Encoding::Hostname => encode_host(input, false),
        Encoding::Ipv6Hostname => encode_host(input, true),
        Encoding::Port => encode_port(input),
        Encoding::Pathname => encode_path(input),
        Encoding::OpaquePathname => encode_percent(input, "", false),
        Encoding::Search => encode_percent(input, SEARCH_ESCAPE_SET, false),
        Encoding::Hash => encode_percent(input, HASH_ESCAPE_SET, false),
    }
}

fn fail<T>(input: &str, index: usize) -> PatternResult<T> {
    Err(PatternError::new(PatternErrorKind::Encoder, input, index))
}

// Scheme validity is delegated to the URI parser by probing a synthetic
// absolute URI, then the scheme is lowercased.
fn encode_scheme(input: &str) -> PatternResult<String> {
    let probe = format!("{input}://dummy.test");
    match UriStr::new(&probe) {
        Ok(uri) => Ok(uri.scheme_str().to_ascii_lowercase()),
        Err(_) => fail(&probe, 0),
    }
}

fn encode_host(input: &str, ipv6: bool) -> PatternResult<String> {
    if ipv6 || (input.starts_with('[') && input.ends_with(']')) {
        let mut out = String::with_capacity(input.len());
        for (index, c) in input.char_indices() {
            match c {
                '0'..='9' | 'a'..='f' | '[' | ']' | ':' => out.push(c),
                'A'..='F' => out.push(c.to_ascii_lowercase()),
                _ => return fail(input, index),
            }
        }
        return Ok(out);
    }
    let Ok(host) = idna::domain_to_ascii(input) else {
        return fail(input, 0);
    };
    // IDNA alone admits characters a hostname must not carry; requiring the
    // result to survive percent-encoding unchanged rejects them.
    if host != encode_percent(&host, HOSTNAME_VERIFY_SET, true)? {
        return fail(input, 0);
    }
    Ok(host)
}

fn encode_port(input: &str) -> PatternResult<String> {
    let Ok(port) = input.parse::<u32>() else {
        return fail(input, 0);
    };
    if port > 0xFFFF {
        return fail(input, 0);
    }
    Ok(port.to_string())
}

fn encode_path(input: &str) -> PatternResult<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut start = 0;
    let mut first_segment = true;
    for slash in memchr_iter(b'/', input.as_bytes()) {
        let segment = &input[start..slash];
        start = slash + 1;
        if !first_segment {
            match segment.to_ascii_lowercase().as_str() {
                ".." | ".%2e" | "%2e." | "%2e%2e" => {
                    segments.pop();
                    continue;
                }
                "." | "%2e" => continue,
                _ => {}
            }
        }
        first_segment = false;
        segments.push(encode_percent(segment, PATH_SEGMENT_ESCAPE_SET, false)?);
    }
    let last = encode_percent(&input[start..], PATH_SEGMENT_ESCAPE_SET, false)?;
    let mut out = String::with_capacity(input.len());
    for segment in &segments {
        out.push_str(segment);
        out.push('/');
    }
    out.push_str(&last);
    Ok(out)
}

// Operates on the UTF-8 byte sequence: controls and non-ASCII bytes are
// always escaped, plus whatever `escape_set` names. With `percent_check`,
// `%` must be followed by two hex digits and is passed through.
fn encode_percent(input: &str, escape_set: &str, percent_check: bool) -> PatternResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut pending_hex = 0u8;
    for b in input.bytes() {
        if pending_hex > 0 {
            if !b.is_ascii_hexdigit() {
                return fail(input, 0);
            }
            pending_hex -= 1;
            out.push(b as char);
        } else if b < 0x20 || b >= 0x80 || escape_set.as_bytes().contains(&b) {
            out.push('%');
            out.push(HEX_DIGITS[usize::from(b >> 4)] as char);
            out.push(HEX_DIGITS[usize::from(b & 0x0F)] as char);
        } else if b == b'%' && percent_check {
            pending_hex = 2;
            out.push('%');
        } else {
            out.push(b as char);
        }
    }
    if pending_hex > 0 {
        return fail(input, 0);
    }
    Ok(out)
}
