//! Quick-access share links.
//!
//! The `/2fa` page offers a "copy quick-access link" button producing
//! `<origin>/2fa/2fa/<secret>`, and the dynamic routes receive the secret
//! as a percent-encoded path segment. This module builds those paths and
//! recovers secrets from them; the decoded string then flows into
//! [`crate::totp::core::decode_secret`] like any typed input.

use crate::totp::core;
use crate::totp::types::*;

/// Fixed route prefix of the quick-access page.
pub const SHARE_PREFIX: &str = "/2fa/2fa/";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Build
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build the share path for a secret.
///
/// The secret is cleaned the same way the input field cleans it and must
/// actually decode — the page only offers the link once a live code is
/// showing, and a link to a broken secret helps nobody.
pub fn build_share_path(secret: &str) -> Result<String, TotpError> {
    core::decode_secret(secret)?;
    let cleaned = core::normalise_secret(secret);
    Ok(format!("{}{}", SHARE_PREFIX, encode_segment(&cleaned)))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Parse
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Recover the secret from a full share URL.
pub fn secret_from_url(link: &str) -> Result<String, TotpError> {
    let parsed = url::Url::parse(link)
        .map_err(|e| TotpError::new(TotpErrorKind::InvalidLink, format!("Invalid URL: {}", e)))?;
    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(|| TotpError::new(TotpErrorKind::InvalidLink, "URL has no path segments"))?;
    secret_from_path_segment(segment)
}

/// Percent-decode a bare path segment into a raw secret string.
///
/// Routers hand segments over still encoded; the original pages ran them
/// through `decodeURIComponent` before generating.
pub fn secret_from_path_segment(raw: &str) -> Result<String, TotpError> {
    let decoded = decode_segment(raw);
    if decoded.trim().is_empty() {
        return Err(TotpError::new(TotpErrorKind::InvalidLink, "Empty secret segment"));
    }
    Ok(decoded)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Percent-coding helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn encode_segment(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            _ => output.push_str(&format!("%{:02X}", byte)),
        }
    }
    output
}

// Note: '+' stays literal — path segments are not form-encoded.
fn decode_segment(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            } else {
                result.push('%');
                result.push_str(&hex);
            }
        } else {
            result.push(c);
        }
    }
    result
}
