//! Small text encoders used when building gateway requests.
//!
//! Kept dependency-free: the firmware only ever needs to *encode* (never
//! decode) these formats, and each routine is a few lines.

/// Returns `true` if every byte of `s` is in the printable ASCII range
/// `0x20..=0x7E` (space through tilde, inclusive).
pub fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Standard base64 (RFC 4648 §4) with `=` padding.
pub fn base64_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);

        let i0 = (b0 >> 2) as usize;
        let i1 = (((b0 & 0x03) << 4) | (b1 >> 4)) as usize;
        let i2 = (((b1 & 0x0F) << 2) | (b2 >> 6)) as usize;
        let i3 = (b2 & 0x3F) as usize;

        out.push(ALPHABET[i0] as char);
        out.push(ALPHABET[i1] as char);
        out.push(if chunk.len() > 1 { ALPHABET[i2] as char } else { '=' });
        out.push(if chunk.len() > 2 { ALPHABET[i3] as char } else { '=' });
    }

    out
}

/// Append `value` to `out` using `application/x-www-form-urlencoded`
/// byte serialisation: `A-Za-z0-9*-._` pass through, space becomes `+`,
/// everything else is `%XX` (uppercase hex).
pub fn form_urlencode_into(out: &mut String, value: &str) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0F) as usize] as char);
            }
        }
    }
}

/// Serialise `pairs` as a form body (`k1=v1&k2=v2`).
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            body.push('&');
        }
        form_urlencode_into(&mut body, key);
        body.push('=');
        form_urlencode_into(&mut body, value);
    }
    body
}
