//! Core code derivation — RFC 4226 (HOTP primitive) and RFC 6238 (TOTP).
//!
//! Every function here is a pure function of its arguments: the current
//! instant is always passed in explicitly (one read per evaluation, so a
//! render can never see two different "nows" across a step boundary).
//! Wall-clock reads live behind [`crate::totp::clock::Clock`].

use crate::totp::types::*;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Secret decoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Normalise a pasted secret: drop ASCII whitespace and grouping dashes,
/// uppercase the rest. Padding `=` is kept.
pub fn normalise_secret(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Decode a Base32 secret (RFC 4648, case-insensitive, padding optional).
///
/// Empty input after cleaning is `EmptySecret` — the "nothing typed yet"
/// state the display layer shows as a neutral placeholder. Everything else
/// that fails to decode, or decodes to zero bytes, is `InvalidSecret`.
pub fn decode_secret(raw: &str) -> Result<Vec<u8>, TotpError> {
    let cleaned = normalise_secret(raw);
    if cleaned.is_empty() {
        return Err(TotpError::new(TotpErrorKind::EmptySecret, "No secret provided"));
    }
    let unpadded = cleaned.trim_end_matches('=');
    let bytes = base32::decode(base32::Alphabet::Rfc4648 { padding: true }, &pad_base32(unpadded))
        .or_else(|| base32::decode(base32::Alphabet::Rfc4648 { padding: false }, unpadded))
        .ok_or_else(|| TotpError::new(TotpErrorKind::InvalidSecret, "Invalid base-32 secret"))?;
    if bytes.is_empty() {
        return Err(TotpError::new(
            TotpErrorKind::InvalidSecret,
            "Secret decodes to zero bytes",
        ));
    }
    Ok(bytes)
}

/// Pad a base-32 string to a multiple of 8 with '='.
fn pad_base32(s: &str) -> String {
    let remainder = s.len() % 8;
    if remainder == 0 {
        s.to_string()
    } else {
        let pad_count = 8 - remainder;
        format!("{}{}", s, "=".repeat(pad_count))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Counter-to-code derivation (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Derive a fixed-width decimal code from raw key bytes and a counter.
///
/// Total for any key/counter: the counter is encoded as 8 bytes big-endian,
/// HMAC'd, dynamically truncated, and reduced modulo `10^digits` with
/// leading zeros preserved.
pub fn generate_code(key: &[u8], counter: u64, digits: u8, algo: Algorithm) -> String {
    let hmac_result = compute_hmac(key, &counter.to_be_bytes(), algo);
    truncate(&hmac_result, digits)
}

/// Compute HMAC(key, message) using the specified algorithm.
fn compute_hmac(key: &[u8], data: &[u8], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Dynamic truncation per RFC 4226 §5.3.
fn truncate(hmac_result: &[u8], digits: u8) -> String {
    let offset = (hmac_result[hmac_result.len() - 1] & 0x0f) as usize;
    let binary = ((hmac_result[offset] as u32 & 0x7f) << 24)
        | ((hmac_result[offset + 1] as u32) << 16)
        | ((hmac_result[offset + 2] as u32) << 8)
        | (hmac_result[offset + 3] as u32);
    let modulus = 10u32.pow(digits as u32);
    let code = binary % modulus;
    format!("{:0>width$}", code, width = digits as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time-window bookkeeping (RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Time-step counter for a unix timestamp: `floor(t / period)`.
///
/// Monotonically non-decreasing in `t`; increments exactly on period
/// boundaries aligned to the epoch.
pub fn time_step_at(unix_seconds: u64, period: u32) -> u64 {
    unix_seconds / period as u64
}

/// Seconds remaining until the current time-step expires.
///
/// Range `[1, period]`: at an exact boundary the *new* window has just
/// opened, so the value is `period`, never 0.
pub fn seconds_remaining_at(unix_seconds: u64, period: u32) -> u32 {
    let p = period as u64;
    (p - (unix_seconds % p)) as u32
}

/// Elapsed fraction of the current window (0.0 = fresh, → 1.0 = expiring).
/// Drives the countdown ring / progress bar.
pub fn progress_fraction_at(unix_seconds: u64, period: u32) -> f64 {
    let elapsed = (unix_seconds % period as u64) as f64;
    elapsed / period as f64
}

/// Generate a TOTP code from a base-32 secret at an explicit instant.
pub fn generate_totp_at(
    secret_b32: &str,
    config: &TotpConfig,
    unix_seconds: u64,
) -> Result<String, TotpError> {
    let key = decode_secret(secret_b32)?;
    let step = time_step_at(unix_seconds, config.period);
    Ok(generate_code(&key, step, config.digits, config.algorithm))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Display formatting
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Format a code with a space in the middle (e.g. "123 456").
pub fn format_code_display(code: &str) -> String {
    if code.len() <= 4 {
        return code.to_string();
    }
    let mid = code.len() / 2;
    format!("{} {}", &code[..mid], &code[mid..])
}
